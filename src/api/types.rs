//! API response and query types.
//!
//! Chain records pass through in their ledger form; the state response
//! adds derived summary fields on top.

use serde::{Deserialize, Serialize};

use crate::chain::record::Record;
use crate::chain::validator::ValidationResult;
use crate::config::ScenarioConfig;

/// Combined state response: scenario, chain summary, and latest record.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Scenario configuration.
    pub scenario: ScenarioConfig,
    /// Number of records in the chain.
    pub chain_length: usize,
    /// Digest of the most recent record, if any.
    pub head_digest: Option<String>,
    /// Audit verdict for the served chain.
    pub validation: ValidationResult,
    /// Most recent record, if any.
    pub latest: Option<Record>,
}

/// Optional range query parameters for the chain endpoint.
#[derive(Debug, Deserialize)]
pub struct ChainQuery {
    /// Start record index (inclusive).
    pub from: Option<u64>,
    /// End record index (inclusive).
    pub to: Option<u64>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
