//! # RWA-Lending Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | rl-01 Signature Verification | attestation recover + compare | < 1ms |
//! | rl-03 Loan Ledger | borrow → repay cycle | < 2ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rl_01_signature_verification::{
    address_from_pubkey, sign_attestation, verify_attestation, AttestationPayload, SigningKey,
};
use rl_03_loan_ledger::{
    InMemoryAssetToken, InMemoryStablecoin, LedgerConfig, LendingPoolApi, LendingPoolService,
    StablecoinCapability,
};
use shared_types::{units_to_wei, Address, U256};
use std::sync::Arc;
use std::time::Duration;

const ADMIN: Address = [0xAD; 20];
const POOL: Address = [0x9F; 20];
const ALICE: Address = [0xA1; 20];

// ============================================================================
// rl-01: Attestation Verification
// ============================================================================

fn bench_attestation_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-01-attestation");
    group.measurement_time(Duration::from_secs(5));

    let key = SigningKey::random(&mut rand::thread_rng());
    let signer = address_from_pubkey(key.verifying_key());

    let payloads = [
        ("undated", AttestationPayload::undated(U256::one(), units_to_wei(100))),
        (
            "dated",
            AttestationPayload::dated(U256::one(), units_to_wei(100), 1_700_000_000),
        ),
        (
            "described",
            AttestationPayload::described("Warehouse receipt #77", units_to_wei(100)),
        ),
    ];

    for (name, payload) in payloads {
        let signature = sign_attestation(&key, &payload).expect("sign");
        group.bench_with_input(BenchmarkId::new("verify", name), &payload, |b, payload| {
            b.iter(|| black_box(verify_attestation(payload, &signature, signer)))
        });
    }

    let payload = AttestationPayload::undated(U256::one(), units_to_wei(100));
    group.bench_function("sign_undated", |b| {
        b.iter(|| black_box(sign_attestation(&key, &payload).expect("sign")))
    });

    group.finish();
}

// ============================================================================
// rl-03: Loan Lifecycle
// ============================================================================

fn bench_borrow_repay_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("rl-03-loan-ledger");
    group.measurement_time(Duration::from_secs(5));

    let key = SigningKey::random(&mut rand::thread_rng());
    let nft = Arc::new(InMemoryAssetToken::new());
    let coin = Arc::new(InMemoryStablecoin::new());
    let ledger = LendingPoolService::new(
        LedgerConfig::default(),
        ADMIN,
        POOL,
        nft.clone(),
        coin.clone(),
    )
    .expect("default config");
    ledger
        .set_oracle_signer(ADMIN, address_from_pubkey(key.verifying_key()))
        .expect("admin");
    coin.mint(POOL, units_to_wei(1_000_000)).expect("fund pool");
    // Repayments only ever cost interest; an unbounded allowance covers them all
    coin.mint(ALICE, units_to_wei(1_000_000)).expect("fund borrower");
    coin.approve(ALICE, POOL, U256::MAX);

    let token = nft.mint(ALICE).expect("mint");
    let valuation = units_to_wei(100);
    let signature = sign_attestation(&key, &AttestationPayload::undated(token, valuation))
        .expect("sign")
        .to_bytes();

    group.bench_function("borrow_then_repay", |b| {
        b.iter(|| {
            nft.approve(ALICE, POOL, token).expect("approve");
            let receipt = ledger
                .borrow(ALICE, token, units_to_wei(70), valuation, &signature)
                .expect("borrow");
            let loan_id = receipt.created_loan_id().expect("loan id");
            black_box(ledger.repay(ALICE, loan_id).expect("repay"))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_attestation_verification,
    bench_borrow_repay_cycle
);
criterion_main!(benches);
