//! Request and response bodies for the attestation endpoints.
//!
//! Field names are camelCase on the wire. Amounts are base-10 strings because
//! a `uint256` does not fit in a JSON number.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/valuation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// Query string of `GET /api/valuation/{assetId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationQuery {
    /// Lifetime of a dated attestation in seconds. Absent means undated.
    #[serde(default)]
    pub ttl: Option<String>,
}

/// A signed valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResponse {
    /// Valuation in wei (base-10)
    pub valuation_wei: String,
    /// Whole-DAI figure the valuation was derived from. Clients read it as
    /// `randomDai`.
    #[serde(rename = "randomDai")]
    pub valuation_dai: u64,
    /// `0x`-prefixed 65-byte `r || s || v` signature
    pub signature: String,
    /// EIP-55 checksummed address of the signing key
    pub oracle_signer_address: String,
    /// Echo of the description for pre-mint attestations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expiry (Unix seconds) for dated attestations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub oracle_signer_address: String,
}
