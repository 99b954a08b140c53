//! Attestor configuration with validation.
//!
//! Defaults suit a local development oracle; every field can be overridden
//! from `RL_*` environment variables via [`AttestorConfig::from_env`].

use serde::{Deserialize, Serialize};
use shared_types::{parse_u256_dec, units_to_wei, U256};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default upper bound on a dated attestation's lifetime (one day).
pub const DEFAULT_MAX_TTL_SECS: u64 = 86_400;

/// Main attestor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestorConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// How valuations are produced
    pub valuation: ValuationConfig,
    /// Upper bound on the `ttl` of a dated attestation, in seconds
    pub max_ttl_secs: u64,
}

impl Default for AttestorConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            cors: CorsConfig::default(),
            valuation: ValuationConfig::default(),
            max_ttl_secs: DEFAULT_MAX_TTL_SECS,
        }
    }
}

impl AttestorConfig {
    /// Build a configuration from defaults overridden by environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `RL_ORACLE_HOST` | `http.host` |
    /// | `RL_ORACLE_PORT` | `http.port` |
    /// | `RL_VALUATION_MODE` | `fixed` or `random` |
    /// | `RL_VALUATION_FIXED_WEI` | fixed valuation (base-10 wei) |
    /// | `RL_VALUATION_MIN_DAI` / `RL_VALUATION_MAX_DAI` | random range |
    /// | `RL_MAX_TTL_SECS` | `max_ttl_secs` |
    /// | `RL_CORS_ORIGINS` | comma-separated origins |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("RL_ORACLE_HOST") {
            config.http.host = host
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RL_ORACLE_HOST", host))?;
        }
        if let Some(port) = lookup("RL_ORACLE_PORT") {
            config.http.port = parse_num("RL_ORACLE_PORT", port)?;
        }
        if let Some(ttl) = lookup("RL_MAX_TTL_SECS") {
            config.max_ttl_secs = parse_num("RL_MAX_TTL_SECS", ttl)?;
        }
        if let Some(origins) = lookup("RL_CORS_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        let mode = lookup("RL_VALUATION_MODE").unwrap_or_else(|| "random".to_string());
        config.valuation = match mode.as_str() {
            "fixed" => {
                let raw = lookup("RL_VALUATION_FIXED_WEI")
                    .ok_or(ConfigError::MissingValue("RL_VALUATION_FIXED_WEI"))?;
                let wei = parse_u256_dec(&raw)
                    .map_err(|_| ConfigError::InvalidValue("RL_VALUATION_FIXED_WEI", raw))?;
                ValuationConfig::Fixed { wei }
            }
            "random" => {
                let min_dai = match lookup("RL_VALUATION_MIN_DAI") {
                    Some(v) => parse_num("RL_VALUATION_MIN_DAI", v)?,
                    None => DEFAULT_MIN_DAI,
                };
                let max_dai = match lookup("RL_VALUATION_MAX_DAI") {
                    Some(v) => parse_num("RL_VALUATION_MAX_DAI", v)?,
                    None => DEFAULT_MAX_DAI,
                };
                ValuationConfig::Random { min_dai, max_dai }
            }
            _ => return Err(ConfigError::InvalidValue("RL_VALUATION_MODE", mode)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http port cannot be 0".into()));
        }

        if self.max_ttl_secs == 0 {
            return Err(ConfigError::Invalid("max_ttl_secs cannot be 0".into()));
        }

        match &self.valuation {
            ValuationConfig::Fixed { wei } if wei.is_zero() => {
                return Err(ConfigError::InvalidValuation(
                    "fixed valuation cannot be 0".into(),
                ));
            }
            ValuationConfig::Random { min_dai, max_dai } if min_dai > max_dai || *max_dai == 0 => {
                return Err(ConfigError::InvalidValuation(format!(
                    "empty random range {}..={}",
                    min_dai, max_dai
                )));
            }
            _ => {}
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw))
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
            max_age: 86400,
        }
    }
}

const DEFAULT_MIN_DAI: u64 = 10_000;
const DEFAULT_MAX_DAI: u64 = 99_999;

/// Valuation source selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ValuationConfig {
    /// Every asset is valued at the same amount.
    Fixed { wei: U256 },
    /// Uniform draw of whole DAI in `min_dai..=max_dai`.
    Random { min_dai: u64, max_dai: u64 },
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self::Random {
            min_dai: DEFAULT_MIN_DAI,
            max_dai: DEFAULT_MAX_DAI,
        }
    }
}

impl ValuationConfig {
    /// Fixed valuation of a whole number of DAI.
    pub fn fixed_dai(dai: u64) -> Self {
        Self::Fixed {
            wei: units_to_wei(dai),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),

    #[error("missing required variable {0}")]
    MissingValue(&'static str),

    #[error("invalid valuation: {0}")]
    InvalidValuation(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
