//! # Integration Fixture
//!
//! A complete lending market in one process: the oracle attestor (driven
//! in-process through its axum router), the loan ledger, and in-memory
//! collateral and stablecoin tokens. Attestor and ledger read the same
//! settable clock, so deadline expiry can be exercised end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rl_01_signature_verification::SigningKey;
use rl_02_oracle_attestor::{
    AttestorConfig, AttestorError, AttestorService, OracleSigner, Valuation, ValuationSource,
    ValuationSubject,
};
use rl_03_loan_ledger::{
    InMemoryAssetToken, InMemoryStablecoin, LedgerConfig, LendingPoolApi, LendingPoolService,
    MockTimeSource, StablecoinCapability, TimeSource,
};
use shared_types::{decode_hex, parse_u256_dec, units_to_wei, Address, Timestamp, TokenId, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN: Address = [0xAD; 20];
pub const POOL: Address = [0x9F; 20];
pub const ALICE: Address = [0xA1; 20];
pub const BOB: Address = [0xB0; 20];

/// Clock start for every market.
pub const START: Timestamp = 1_700_000_000;

/// Stablecoin seeded into the pool, in whole DAI.
pub const POOL_LIQUIDITY_DAI: u64 = 1_000_000;

/// Lets the attestor read the ledger's test clock.
pub struct SharedClock(pub Arc<MockTimeSource>);

impl rl_02_oracle_attestor::TimeSource for SharedClock {
    fn now(&self) -> Timestamp {
        TimeSource::now(self.0.as_ref())
    }
}

/// Per-token price table. Descriptions are valued at `default_dai`.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<TokenId, u64>,
    default_dai: u64,
}

impl PriceTable {
    pub fn new(default_dai: u64) -> Self {
        Self {
            prices: HashMap::new(),
            default_dai,
        }
    }

    pub fn with_price(mut self, token_id: u64, dai: u64) -> Self {
        self.prices.insert(U256::from(token_id), dai);
        self
    }
}

impl ValuationSource for PriceTable {
    fn valuate(&self, subject: ValuationSubject<'_>) -> Result<Valuation, AttestorError> {
        let dai = match subject {
            ValuationSubject::Asset(token_id) => {
                self.prices.get(&token_id).copied().unwrap_or(self.default_dai)
            }
            ValuationSubject::Description(_) => self.default_dai,
        };
        Ok(Valuation {
            wei: units_to_wei(dai),
            dai,
        })
    }
}

/// A signed valuation as the borrower receives it from the attestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub valuation_wei: U256,
    pub valuation_dai: u64,
    pub signature: Vec<u8>,
    pub deadline: Option<Timestamp>,
    pub oracle_signer_address: String,
}

impl Quote {
    /// Parse the JSON body of a successful attestation response.
    pub fn from_json(body: &serde_json::Value) -> Self {
        let valuation_wei = body["valuationWei"]
            .as_str()
            .and_then(|s| parse_u256_dec(s).ok())
            .expect("valuationWei is a decimal string");
        let signature = body["signature"]
            .as_str()
            .and_then(|s| decode_hex(s).ok())
            .expect("signature is hex");

        Self {
            valuation_wei,
            valuation_dai: body["randomDai"].as_u64().expect("randomDai is a number"),
            signature,
            deadline: body["deadline"].as_u64(),
            oracle_signer_address: body["oracleSignerAddress"]
                .as_str()
                .expect("oracleSignerAddress is a string")
                .to_string(),
        }
    }
}

/// Attestor, ledger and tokens wired together.
pub struct Market {
    pub attestor: AttestorService,
    pub ledger: Arc<LendingPoolService>,
    pub nft: Arc<InMemoryAssetToken>,
    pub coin: Arc<InMemoryStablecoin>,
    pub clock: Arc<MockTimeSource>,
}

impl Market {
    /// Market whose attestor prices assets from `prices`.
    ///
    /// The ledger trusts the attestor's key and the pool holds
    /// [`POOL_LIQUIDITY_DAI`].
    pub fn new(prices: PriceTable) -> Self {
        let key = SigningKey::random(&mut rand::thread_rng());
        let signer = OracleSigner::new(key);
        let signer_address = signer.address();

        let clock = Arc::new(MockTimeSource::new(START));
        let attestor = AttestorService::with_parts(
            AttestorConfig::default(),
            Arc::new(signer),
            Arc::new(prices),
            Arc::new(SharedClock(clock.clone())),
        )
        .expect("default attestor config is valid");

        let nft = Arc::new(InMemoryAssetToken::new());
        let coin = Arc::new(InMemoryStablecoin::new());
        let ledger = LendingPoolService::new(
            LedgerConfig::default(),
            ADMIN,
            POOL,
            nft.clone(),
            coin.clone(),
        )
        .expect("default ledger config is valid")
        .with_time_source(clock.clone());

        ledger
            .set_oracle_signer(ADMIN, signer_address)
            .expect("admin registers the signer");
        coin.mint(POOL, units_to_wei(POOL_LIQUIDITY_DAI))
            .expect("pool is funded");

        Self {
            attestor,
            ledger: Arc::new(ledger),
            nft,
            coin,
            clock,
        }
    }

    /// Mint the next asset token to `owner` and approve the pool for it.
    pub fn mint_collateral(&self, owner: Address) -> TokenId {
        let token_id = self.nft.mint(owner).expect("mint");
        self.nft.approve(owner, POOL, token_id).expect("approve");
        token_id
    }

    /// Issue `GET uri` against the attestor router.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.call(
            Request::get(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    /// Issue `POST /api/valuation` with a raw JSON body.
    pub async fn post_description(&self, body: &str) -> (StatusCode, serde_json::Value) {
        self.call(
            Request::post("/api/valuation")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .attestor
            .router()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Fetch an undated attestation for `token_id`.
    pub async fn quote(&self, token_id: TokenId) -> Quote {
        let (status, body) = self.get(&format!("/api/valuation/{}", token_id)).await;
        assert_eq!(status, StatusCode::OK, "attestor rejected: {body}");
        Quote::from_json(&body)
    }

    /// Fetch a dated attestation for `token_id` valid for `ttl` seconds.
    pub async fn dated_quote(&self, token_id: TokenId, ttl: u64) -> Quote {
        let (status, body) = self
            .get(&format!("/api/valuation/{}?ttl={}", token_id, ttl))
            .await;
        assert_eq!(status, StatusCode::OK, "attestor rejected: {body}");
        Quote::from_json(&body)
    }

    /// Mint `total` to `payer` and approve the pool to pull it.
    pub fn fund(&self, payer: Address, total: U256) {
        self.coin.mint(payer, total).expect("mint");
        self.coin.approve(payer, POOL, total);
    }
}
