//! Chain audit pass.
//!
//! Validation walks the chain from the front, trusting the genesis record,
//! and re-derives every link and digest. Integrity violations are ordinary
//! return values, never errors: a corrupted chain is a normal domain state
//! for an auditor to report.

use serde::Serialize;

use super::fingerprint;
use super::record::Record;

/// Why a chain failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationReason {
    /// A record's stored `prev_digest` does not equal the predecessor's
    /// stored digest.
    LinkBroken,
    /// A record's recomputed fingerprint does not equal its stored digest.
    DataTampered,
}

impl std::fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationReason::LinkBroken => write!(f, "broken link: previous digest mismatch"),
            ViolationReason::DataTampered => write!(f, "data tampered: digest mismatch"),
        }
    }
}

/// Verdict of one audit pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Chain position of the earliest violation.
    pub error_index: Option<u64>,
    pub reason: Option<ViolationReason>,
}

impl ValidationResult {
    fn valid_chain() -> Self {
        Self { valid: true, error_index: None, reason: None }
    }

    fn violation(index: u64, reason: ViolationReason) -> Self {
        Self { valid: false, error_index: Some(index), reason: Some(reason) }
    }
}

/// Audits a chain for link and content integrity.
///
/// Records are checked in order starting at index 1; the genesis record is
/// trusted as the anchor. At each position the link check runs first, then
/// the content check, and the walk stops at the earliest violation. Empty
/// and single-record chains are valid.
pub fn validate(chain: &[Record]) -> ValidationResult {
    for i in 1..chain.len() {
        let current = &chain[i];
        let previous = &chain[i - 1];

        if current.prev_digest != previous.digest {
            return ValidationResult::violation(i as u64, ViolationReason::LinkBroken);
        }

        // A payload that no longer serializes cannot match its stored digest.
        let serialized = current.payload.to_canonical_json().unwrap_or_default();
        let recomputed = fingerprint::digest(
            current.index,
            &current.prev_digest,
            &current.timestamp,
            &serialized,
        );
        if recomputed != current.digest {
            return ValidationResult::violation(i as u64, ViolationReason::DataTampered);
        }
    }
    ValidationResult::valid_chain()
}
