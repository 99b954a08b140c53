//! Oracle Attestor service: HTTP surface and server lifecycle.
//!
//! Handlers are stateless. The only shared data is the read-only signing
//! key, the valuation source and the clock, all behind `Arc`.

use crate::adapters::source_from_config;
use crate::domain::config::AttestorConfig;
use crate::domain::error::{ApiError, ApiResult, AttestorError};
use crate::domain::signer::OracleSigner;
use crate::domain::types::{
    DescriptionRequest, HealthResponse, ValuationQuery, ValuationResponse,
};
use crate::middleware::create_cors_layer;
use crate::ports::outbound::{SystemTimeSource, TimeSource, ValuationSource, ValuationSubject};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use rl_01_signature_verification::AttestationPayload;
use shared_types::{parse_u256_dec, Address, Timestamp};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Oracle Attestor service
pub struct AttestorService {
    config: AttestorConfig,
    state: AppState,
}

impl AttestorService {
    /// Create a service using the configured valuation source and the system clock.
    pub fn new(config: AttestorConfig, signer: OracleSigner) -> Result<Self, AttestorError> {
        config.validate()?;
        let valuation = source_from_config(&config.valuation)?;
        Self::with_parts(
            config,
            Arc::new(signer),
            valuation,
            Arc::new(SystemTimeSource),
        )
    }

    /// Create a service from explicit collaborators.
    pub fn with_parts(
        config: AttestorConfig,
        signer: Arc<OracleSigner>,
        valuation: Arc<dyn ValuationSource>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, AttestorError> {
        config.validate()?;
        let state = AppState {
            signer,
            valuation,
            clock,
            max_ttl_secs: config.max_ttl_secs,
        };
        Ok(Self { config, state })
    }

    /// Address the ledger must register as its oracle signer.
    pub fn signer_address(&self) -> Address {
        self.state.signer.address()
    }

    pub fn config(&self) -> &AttestorConfig {
        &self.config
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors));

        Router::new()
            .route("/api/valuation/:asset_id", get(attest_asset))
            .route("/api/valuation", post(attest_description))
            .route("/health", get(health_check))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), AttestorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AttestorError::Bind(format!("{}: {}", addr, e)))?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), AttestorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        info!(
            addr = %local,
            oracle_signer = %self.state.signer.checksum_address(),
            "Oracle attestor listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Oracle attestor stopped");
        Ok(())
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    signer: Arc<OracleSigner>,
    valuation: Arc<dyn ValuationSource>,
    clock: Arc<dyn TimeSource>,
    max_ttl_secs: u64,
}

impl AppState {
    /// Resolve a `ttl` query value into an absolute deadline.
    fn deadline_for(&self, raw_ttl: &str) -> ApiResult<Timestamp> {
        let ttl: u64 = raw_ttl.parse().map_err(|_| ApiError::invalid_ttl())?;
        if ttl == 0 || ttl > self.max_ttl_secs {
            return Err(ApiError::invalid_ttl());
        }
        self.clock
            .now()
            .checked_add(ttl)
            .ok_or_else(ApiError::invalid_ttl)
    }

    fn respond(
        &self,
        payload: &AttestationPayload,
        valuation_dai: u64,
    ) -> ApiResult<Json<ValuationResponse>> {
        let signature = self.signer.sign(payload)?;

        let (description, deadline) = match payload {
            AttestationPayload::Described { description, .. } => (Some(description.clone()), None),
            AttestationPayload::Dated { deadline, .. } => (None, Some(*deadline)),
            AttestationPayload::Undated { .. } => (None, None),
        };

        Ok(Json(ValuationResponse {
            valuation_wei: payload.valuation_wei().to_string(),
            valuation_dai,
            signature: signature.to_hex(),
            oracle_signer_address: self.signer.checksum_address(),
            description,
            deadline,
        }))
    }
}

/// `GET /api/valuation/{assetId}[?ttl=secs]`
async fn attest_asset(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    query: Result<Query<ValuationQuery>, QueryRejection>,
) -> ApiResult<Json<ValuationResponse>> {
    let asset_id = parse_u256_dec(&raw_id).map_err(|_| {
        debug!(asset_id = %raw_id, "rejecting non-integer asset id");
        ApiError::invalid_token_id()
    })?;

    let Query(query) = query.map_err(|_| ApiError::invalid_ttl())?;
    let deadline = query
        .ttl
        .as_deref()
        .map(|raw| state.deadline_for(raw))
        .transpose()?;

    let valuation = state.valuation.valuate(ValuationSubject::Asset(asset_id))?;
    let payload = match deadline {
        Some(deadline) => AttestationPayload::dated(asset_id, valuation.wei, deadline),
        None => AttestationPayload::undated(asset_id, valuation.wei),
    };

    info!(
        asset_id = %asset_id,
        valuation_wei = %valuation.wei,
        deadline = ?deadline,
        "Valuation attested"
    );
    state.respond(&payload, valuation.dai)
}

/// `POST /api/valuation` with `{ "description": .. }`
async fn attest_description(
    State(state): State<AppState>,
    body: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<Json<ValuationResponse>> {
    let Json(request) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let description = request
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(ApiError::missing_description)?;

    let valuation = state
        .valuation
        .valuate(ValuationSubject::Description(&description))?;
    let payload = AttestationPayload::described(description, valuation.wei);

    info!(valuation_wei = %valuation.wei, "Description valuation attested");
    state.respond(&payload, valuation.dai)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        oracle_signer_address: state.signer.checksum_address(),
    })
}
