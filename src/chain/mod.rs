//! Tamper-evident record chain: fingerprints, records, ledger, and audit.

/// Deterministic digest function for record identity fields.
pub mod fingerprint;
pub mod ledger;
pub mod record;
/// Forward-walking integrity audit.
pub mod validator;

// Re-export the main types for convenience
pub use ledger::{FixedClock, Ledger, LedgerError, SystemClock, TamperOutcome, TimeSource};
pub use record::{GENESIS_SENTINEL, Payload, Record};
pub use validator::{ValidationResult, ViolationReason, validate};
