//! # Lending Lifecycle Scenarios
//!
//! The reference lifecycle, run in order against one market:
//!
//! 1. Alice borrows 70 DAI against asset #1 valued at 100 DAI → loan 2
//! 2. Alice repays loan 2 → asset #1 returns to Alice
//! 3. Alice borrows 140 DAI against asset #2 valued at 200 DAI → loan 3;
//!    Bob liquidates loan 3 → asset #2 goes to Bob
//! 4. Liquidating a token with no active loan → `"Loan not active"`
//! 5. `get_user_loans(alice)` → `[2, 3]`
//!
//! Valuations and signatures come from the attestor's HTTP surface, never
//! from a key held by the test.

#[cfg(test)]
mod tests {
    use crate::integration::fixture::{Market, PriceTable, ALICE, BOB, POOL};
    use rl_03_loan_ledger::{
        CollateralCapability, ErrorKind, LedgerError, LendingEvent, LendingPoolApi, LoanStatus,
        StablecoinCapability,
    };
    use shared_types::{units_to_wei, U256};

    fn market() -> Market {
        Market::new(PriceTable::new(50).with_price(1, 100).with_price(2, 200))
    }

    // =============================================================================
    // SCENARIO 1: BORROW
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_1_borrow_opens_loan_two() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        assert_eq!(token, U256::one());

        let quote = m.quote(token).await;
        assert_eq!(quote.valuation_wei, units_to_wei(100));

        let receipt = m
            .ledger
            .borrow(ALICE, token, units_to_wei(70), quote.valuation_wei, &quote.signature)
            .unwrap();

        assert_eq!(
            receipt.events,
            vec![LendingEvent::LoanCreated {
                loan_id: 2,
                token_id: token,
                amount: units_to_wei(70),
            }]
        );
        assert_eq!(m.nft.owner_of(token).unwrap(), POOL);
        assert_eq!(m.coin.balance_of(ALICE), units_to_wei(70));
        assert_eq!(m.ledger.token_to_loan_id(token), Some(2));
    }

    // =============================================================================
    // SCENARIOS 1-5 IN SEQUENCE
    // =============================================================================

    #[tokio::test]
    async fn test_full_lifecycle() {
        let m = market();

        // Scenario 1
        let first = m.mint_collateral(ALICE);
        let quote = m.quote(first).await;
        let loan_a = m
            .ledger
            .borrow(ALICE, first, units_to_wei(70), quote.valuation_wei, &quote.signature)
            .unwrap()
            .created_loan_id()
            .unwrap();
        assert_eq!(loan_a, 2);

        // Scenario 2: 5% of 70 DAI is 3.5 DAI
        let total = m.ledger.loan(loan_a).unwrap().total_due().unwrap();
        assert_eq!(total, units_to_wei(73) + units_to_wei(1) / 2);
        m.fund(ALICE, total - units_to_wei(70));
        m.coin.approve(ALICE, POOL, total);

        let receipt = m.ledger.repay(ALICE, loan_a).unwrap();
        assert_eq!(
            receipt.events,
            vec![LendingEvent::LoanRepaid {
                loan_id: loan_a,
                total_paid: total,
            }]
        );
        assert_eq!(m.nft.owner_of(first).unwrap(), ALICE);
        assert_eq!(m.coin.balance_of(ALICE), U256::zero());
        assert_eq!(m.ledger.loan(loan_a).unwrap().status, LoanStatus::Repaid);
        assert_eq!(m.ledger.token_to_loan_id(first), None);

        // Scenario 3
        let second = m.mint_collateral(ALICE);
        let quote = m.quote(second).await;
        assert_eq!(quote.valuation_dai, 200);
        let loan_b = m
            .ledger
            .borrow(ALICE, second, units_to_wei(140), quote.valuation_wei, &quote.signature)
            .unwrap()
            .created_loan_id()
            .unwrap();
        assert_eq!(loan_b, 3);

        let receipt = m.ledger.liquidate(BOB, loan_b).unwrap();
        assert_eq!(
            receipt.events,
            vec![LendingEvent::LoanLiquidated { loan_id: loan_b }]
        );
        assert_eq!(m.nft.owner_of(second).unwrap(), BOB);
        assert_eq!(m.ledger.loan(loan_b).unwrap().status, LoanStatus::Liquidated);
        // No settlement: Alice keeps the disbursed funds
        assert_eq!(m.coin.balance_of(ALICE), units_to_wei(140));

        // Scenario 4
        let err = m.ledger.liquidate(BOB, loan_b).unwrap_err();
        assert_eq!(err.to_string(), "Loan not active");
        assert_eq!(err.kind(), ErrorKind::State);
        let err = m.ledger.liquidate(BOB, loan_a).unwrap_err();
        assert_eq!(err, LedgerError::LoanNotActive(loan_a));

        // Scenario 5
        assert_eq!(m.ledger.get_user_loans(ALICE), vec![2, 3]);
        assert!(m.ledger.get_user_loans(BOB).is_empty());

        let events = m.ledger.events();
        assert_eq!(events.len(), 4);
        assert_eq!(m.ledger.loan_id_counter(), 3);
    }

    // =============================================================================
    // SCENARIO 4: NOTHING TO LIQUIDATE
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_4_liquidate_without_loan() {
        let m = market();
        let token = m.mint_collateral(ALICE);

        // No loan was ever opened on the token
        assert_eq!(m.ledger.token_to_loan_id(token), None);
        let err = m.ledger.liquidate(BOB, 2).unwrap_err();

        assert_eq!(err.to_string(), "Loan not active");
        assert_eq!(m.nft.owner_of(token).unwrap(), ALICE);
        assert!(m.ledger.events().is_empty());
    }

    // =============================================================================
    // REJECTIONS ALONG THE WAY
    // =============================================================================

    #[tokio::test]
    async fn test_quote_for_other_token_is_rejected() {
        let m = market();
        let first = m.mint_collateral(ALICE);
        let second = m.mint_collateral(ALICE);

        // Signature over asset #1 presented for asset #2
        let quote = m.quote(first).await;
        let err = m
            .ledger
            .borrow(ALICE, second, units_to_wei(10), quote.valuation_wei, &quote.signature)
            .unwrap_err();

        assert_eq!(err, LedgerError::InvalidSignature);
        assert_eq!(err.kind(), ErrorKind::Signature);
        assert_eq!(m.nft.owner_of(second).unwrap(), ALICE);
    }

    #[tokio::test]
    async fn test_inflated_valuation_is_rejected() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.quote(token).await;

        let err = m
            .ledger
            .borrow(
                ALICE,
                token,
                units_to_wei(140),
                units_to_wei(200),
                &quote.signature,
            )
            .unwrap_err();

        assert_eq!(err, LedgerError::InvalidSignature);
    }

    #[tokio::test]
    async fn test_borrow_above_ltv_is_rejected() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.quote(token).await;

        let over = units_to_wei(70) + U256::one();
        let err = m
            .ledger
            .borrow(ALICE, token, over, quote.valuation_wei, &quote.signature)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Policy);
        assert_eq!(m.ledger.loan_id_counter(), 1);
        assert_eq!(m.coin.balance_of(ALICE), U256::zero());
    }

    #[tokio::test]
    async fn test_undated_quote_replays_after_repay() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.quote(token).await;

        let loan = m
            .ledger
            .borrow(ALICE, token, units_to_wei(70), quote.valuation_wei, &quote.signature)
            .unwrap()
            .created_loan_id()
            .unwrap();
        let total = m.ledger.loan(loan).unwrap().total_due().unwrap();
        m.fund(ALICE, total);
        m.ledger.repay(ALICE, loan).unwrap();

        // Same attestation, fresh approval: accepted again
        m.nft.approve(ALICE, POOL, token).unwrap();
        let again = m
            .ledger
            .borrow(ALICE, token, units_to_wei(70), quote.valuation_wei, &quote.signature)
            .unwrap();
        assert_eq!(again.created_loan_id(), Some(loan + 1));
    }
}
