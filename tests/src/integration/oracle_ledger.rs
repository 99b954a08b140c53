//! # Oracle → Ledger Flows
//!
//! Tests that rl-02-oracle-attestor, rl-01-signature-verification and
//! rl-03-loan-ledger agree on the attestation formats, and that accepted
//! ledger transactions reach shared-bus subscribers.
//!
//! ## Flows Tested:
//!
//! 1. **Attestor (2) → Verifier (1)**: every schema the attestor signs recovers
//!    to the address it reports
//! 2. **Attestor (2) → Ledger (3)**: undated and dated attestations are
//!    accepted by the ledger that registered the attestor's key
//! 3. **Ledger (3) → Bus**: receipts are forwarded to topic, loan and token
//!    subscribers

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use axum::http::StatusCode;
    use rl_01_signature_verification::{verify_attestation, AttestationPayload, EcdsaSignature};
    use rl_03_loan_ledger::{
        ErrorKind, LedgerBusAdapter, LedgerError, LendingPoolApi, StablecoinCapability,
    };
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, LendingEvent};
    use shared_types::{parse_address, to_checksum_address, units_to_wei, U256, ZERO_ADDRESS};

    use crate::integration::fixture::{Market, PriceTable, ADMIN, ALICE, BOB, POOL, START};

    fn market() -> Market {
        Market::new(PriceTable::new(1_000).with_price(1, 100))
    }

    // =============================================================================
    // ATTESTOR → VERIFIER
    // =============================================================================

    #[tokio::test]
    async fn test_health_reports_registered_signer() {
        let m = market();
        let (status, body) = m.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(
            body["oracleSignerAddress"],
            to_checksum_address(&m.ledger.oracle_signer())
        );
    }

    #[tokio::test]
    async fn test_description_attestation_recovers_to_signer() {
        let m = market();
        let (status, body) = m
            .post_description(r#"{"description":"Warehouse receipt #77"}"#)
            .await;
        assert_eq!(status, StatusCode::OK);

        let signature = EcdsaSignature::from_hex(body["signature"].as_str().unwrap()).unwrap();
        let signer = parse_address(body["oracleSignerAddress"].as_str().unwrap()).unwrap();
        let payload = AttestationPayload::described("Warehouse receipt #77", units_to_wei(1_000));

        assert_eq!(signer, m.ledger.oracle_signer());
        assert!(verify_attestation(&payload, &signature, signer));

        // A description attestation is not an asset attestation
        let as_asset = AttestationPayload::undated(U256::one(), units_to_wei(1_000));
        assert!(!verify_attestation(&as_asset, &signature, signer));
    }

    // =============================================================================
    // ATTESTOR → LEDGER
    // =============================================================================

    #[tokio::test]
    async fn test_ledger_verifies_attestor_quote() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.quote(token).await;

        assert!(m
            .ledger
            .verify_valuation_signature(token, quote.valuation_wei, &quote.signature));
        assert!(!m
            .ledger
            .verify_valuation_signature(token, quote.valuation_wei + U256::one(), &quote.signature));
        assert!(!m
            .ledger
            .verify_valuation_signature(token, quote.valuation_wei, &[0u8; 10]));
    }

    #[tokio::test]
    async fn test_signer_rotation_invalidates_quotes() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.quote(token).await;

        m.ledger.set_oracle_signer(ADMIN, [0x51; 20]).unwrap();

        let err = m
            .ledger
            .borrow(ALICE, token, units_to_wei(10), quote.valuation_wei, &quote.signature)
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidSignature);

        // Only the admin may rotate
        let err = m.ledger.set_oracle_signer(BOB, ZERO_ADDRESS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_invalid_asset_id_never_reaches_ledger() {
        let m = market();
        let (status, body) = m.get("/api/valuation/not-a-number").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid tokenId");
        assert!(m.ledger.events().is_empty());
    }

    #[tokio::test]
    async fn test_dated_quote_signals_valuation_without_loan() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.dated_quote(token, 600).await;
        let deadline = quote.deadline.unwrap();
        assert_eq!(deadline, START + 600);

        let receipt = m
            .ledger
            .borrow_with_signature(
                ALICE,
                token,
                units_to_wei(50),
                quote.valuation_wei,
                deadline,
                &quote.signature,
            )
            .unwrap();

        assert_eq!(
            receipt.events,
            vec![LendingEvent::ValuationUsed {
                token_id: token,
                valuation_wei: units_to_wei(100),
                amount: units_to_wei(50),
            }]
        );
        assert_eq!(m.ledger.loan_id_counter(), 1);
        assert_eq!(m.coin.balance_of(ALICE), U256::zero());

        // The regular borrow still opens loan 2 and pays only its own amount
        let undated = m.quote(token).await;
        let loan = m
            .ledger
            .borrow(ALICE, token, units_to_wei(50), undated.valuation_wei, &undated.signature)
            .unwrap();
        assert_eq!(loan.created_loan_id(), Some(2));
        assert_eq!(m.coin.balance_of(ALICE), units_to_wei(50));
    }

    #[tokio::test]
    async fn test_dated_quote_expires_on_shared_clock() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.dated_quote(token, 60).await;
        let deadline = quote.deadline.unwrap();

        // Still valid at the deadline itself
        m.clock.set(deadline);
        assert!(m
            .ledger
            .borrow_with_signature(
                ALICE,
                token,
                units_to_wei(10),
                quote.valuation_wei,
                deadline,
                &quote.signature,
            )
            .is_ok());

        m.clock.advance(1);
        let err = m
            .ledger
            .borrow_with_signature(
                ALICE,
                token,
                units_to_wei(10),
                quote.valuation_wei,
                deadline,
                &quote.signature,
            )
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::SignatureExpired {
                deadline,
                now: deadline + 1
            }
        );
        assert_eq!(err.kind(), ErrorKind::Expiry);
    }

    #[tokio::test]
    async fn test_dated_signature_rejected_as_undated() {
        let m = market();
        let token = m.mint_collateral(ALICE);
        let quote = m.dated_quote(token, 600).await;

        let err = m
            .ledger
            .borrow(ALICE, token, units_to_wei(10), quote.valuation_wei, &quote.signature)
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidSignature);
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_borrows_get_distinct_ids() {
        let m = market();
        let mut quotes = Vec::new();
        for _ in 0..16 {
            let token = m.mint_collateral(ALICE);
            quotes.push((token, m.quote(token).await));
        }

        let mut handles = Vec::new();
        for (token, quote) in quotes {
            let ledger = Arc::clone(&m.ledger);
            handles.push(tokio::task::spawn_blocking(move || {
                ledger.borrow(ALICE, token, units_to_wei(70), quote.valuation_wei, &quote.signature)
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().created_loan_id().unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (2..18).collect::<Vec<_>>());
        assert_eq!(m.ledger.get_user_loans(ALICE).len(), 16);
        assert_eq!(m.coin.balance_of(ALICE), units_to_wei(1_120));
    }

    // =============================================================================
    // LEDGER → BUS
    // =============================================================================

    #[tokio::test]
    async fn test_receipts_reach_bus_subscribers() {
        let m = market();
        let bus = Arc::new(InMemoryEventBus::new());
        let adapter = LedgerBusAdapter::new(bus.clone());
        let mut dashboard = bus.subscribe(EventFilter::all());
        let mut valuations = bus.subscribe(EventFilter::topics(vec![EventTopic::Valuations]));

        let token = m.mint_collateral(ALICE);
        let dated = m.dated_quote(token, 600).await;
        let used = m
            .ledger
            .borrow_with_signature(
                ALICE,
                token,
                units_to_wei(70),
                dated.valuation_wei,
                dated.deadline.unwrap(),
                &dated.signature,
            )
            .unwrap();
        adapter.forward(&used).await;

        let quote = m.quote(token).await;
        let created = m
            .ledger
            .borrow(ALICE, token, units_to_wei(70), quote.valuation_wei, &quote.signature)
            .unwrap();
        adapter.forward(&created).await;

        let first = timeout(Duration::from_millis(100), dashboard.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        assert!(matches!(first, LendingEvent::ValuationUsed { .. }));

        let second = timeout(Duration::from_millis(100), dashboard.recv())
            .await
            .expect("timeout waiting for event")
            .expect("should receive event");
        assert_eq!(
            second,
            LendingEvent::LoanCreated {
                loan_id: 2,
                token_id: token,
                amount: units_to_wei(70),
            }
        );

        assert!(matches!(
            valuations.try_recv(),
            Ok(Some(LendingEvent::ValuationUsed { .. }))
        ));
        assert_eq!(valuations.try_recv(), Ok(None));
    }

    #[tokio::test]
    async fn test_token_watch_follows_collateral_across_loans() {
        let m = market();
        let bus = Arc::new(InMemoryEventBus::new());
        let adapter = LedgerBusAdapter::new(bus.clone());

        let token = m.mint_collateral(ALICE);
        let other = m.mint_collateral(BOB);
        let mut watch = bus.subscribe(EventFilter::token(token));
        let mut first_loan = bus.subscribe(EventFilter::loan(2));

        let quote = m.quote(token).await;
        let opened = m
            .ledger
            .borrow(ALICE, token, units_to_wei(70), quote.valuation_wei, &quote.signature)
            .unwrap();
        adapter.forward(&opened).await;

        // A loan on another token is invisible to the watch
        let other_quote = m.quote(other).await;
        let unrelated = m
            .ledger
            .borrow(BOB, other, units_to_wei(70), other_quote.valuation_wei, &other_quote.signature)
            .unwrap();
        adapter.forward(&unrelated).await;

        let total = m.ledger.loan(2).unwrap().total_due().unwrap();
        m.fund(ALICE, total - units_to_wei(70));
        m.coin.approve(ALICE, POOL, total);
        let repaid = m.ledger.repay(ALICE, 2).unwrap();
        adapter.forward(&repaid).await;

        assert_eq!(watch.try_recv(), Ok(Some(opened.events[0].clone())));
        assert_eq!(watch.open_loans(), vec![2]);
        assert_eq!(watch.try_recv(), Ok(Some(repaid.events[0].clone())));
        assert_eq!(watch.try_recv(), Ok(None));
        assert!(watch.open_loans().is_empty());

        // The ledger log and the loan watch agree on loan 2's lifecycle
        let delivered = vec![
            first_loan.recv().await.unwrap(),
            first_loan.recv().await.unwrap(),
        ];
        let logged: Vec<_> = m
            .ledger
            .events()
            .into_iter()
            .filter(|e| e.loan_id() == Some(2))
            .collect();
        assert_eq!(delivered, logged);
        assert_eq!(first_loan.recv().await, None);
    }
}
