//! Built-in valuation sources.

use crate::domain::config::ValuationConfig;
use crate::domain::error::AttestorError;
use crate::ports::outbound::{Valuation, ValuationSource, ValuationSubject};
use rand::Rng;
use shared_types::{units_to_wei, U256, STABLECOIN_DECIMALS};
use std::sync::Arc;

/// Values every asset at the same amount.
#[derive(Debug, Clone, Copy)]
pub struct FixedValuation {
    wei: U256,
}

impl FixedValuation {
    pub fn new(wei: U256) -> Self {
        Self { wei }
    }

    pub fn from_dai(dai: u64) -> Self {
        Self::new(units_to_wei(dai))
    }
}

impl ValuationSource for FixedValuation {
    fn valuate(&self, _subject: ValuationSubject<'_>) -> Result<Valuation, AttestorError> {
        Ok(Valuation {
            wei: self.wei,
            dai: whole_units(self.wei),
        })
    }
}

/// Uniform random whole-DAI valuation in an inclusive range.
#[derive(Debug, Clone, Copy)]
pub struct RandomRangeValuation {
    min_dai: u64,
    max_dai: u64,
}

impl RandomRangeValuation {
    pub fn new(min_dai: u64, max_dai: u64) -> Result<Self, AttestorError> {
        if min_dai > max_dai {
            return Err(AttestorError::Valuation(format!(
                "empty range {}..={}",
                min_dai, max_dai
            )));
        }
        Ok(Self { min_dai, max_dai })
    }
}

impl ValuationSource for RandomRangeValuation {
    fn valuate(&self, _subject: ValuationSubject<'_>) -> Result<Valuation, AttestorError> {
        let dai = rand::thread_rng().gen_range(self.min_dai..=self.max_dai);
        Ok(Valuation {
            wei: units_to_wei(dai),
            dai,
        })
    }
}

/// Build the source named by the configuration.
pub fn source_from_config(
    config: &ValuationConfig,
) -> Result<Arc<dyn ValuationSource>, AttestorError> {
    Ok(match config {
        ValuationConfig::Fixed { wei } => Arc::new(FixedValuation::new(*wei)),
        ValuationConfig::Random { min_dai, max_dai } => {
            Arc::new(RandomRangeValuation::new(*min_dai, *max_dai)?)
        }
    })
}

/// Whole stablecoin units in a wei amount, saturating at `u64::MAX`.
fn whole_units(wei: U256) -> u64 {
    let units = wei / U256::exp10(STABLECOIN_DECIMALS as usize);
    if units > U256::from(u64::MAX) {
        u64::MAX
    } else {
        units.as_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_valuation() {
        let source = FixedValuation::from_dai(100);
        let v = source.valuate(ValuationSubject::Asset(U256::one())).unwrap();
        assert_eq!(v.wei, units_to_wei(100));
        assert_eq!(v.dai, 100);
    }

    #[test]
    fn test_fixed_valuation_rounds_down_to_whole_dai() {
        let source = FixedValuation::new(units_to_wei(3) + U256::from(5u64));
        let v = source.valuate(ValuationSubject::Description("x")).unwrap();
        assert_eq!(v.dai, 3);
    }

    #[test]
    fn test_random_valuation_within_range() {
        let source = RandomRangeValuation::new(10, 20).unwrap();
        for _ in 0..100 {
            let v = source.valuate(ValuationSubject::Asset(U256::one())).unwrap();
            assert!((10..=20).contains(&v.dai));
            assert_eq!(v.wei, units_to_wei(v.dai));
        }
    }

    #[test]
    fn test_random_degenerate_range() {
        let source = RandomRangeValuation::new(7, 7).unwrap();
        let v = source.valuate(ValuationSubject::Description("vase")).unwrap();
        assert_eq!(v.dai, 7);
    }

    #[test]
    fn test_random_empty_range_rejected() {
        assert!(RandomRangeValuation::new(8, 7).is_err());
    }

    #[test]
    fn test_source_from_config() {
        let source = source_from_config(&ValuationConfig::fixed_dai(42)).unwrap();
        let v = source.valuate(ValuationSubject::Asset(U256::zero())).unwrap();
        assert_eq!(v.dai, 42);
    }
}
