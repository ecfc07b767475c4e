//! Append-only record chain with an explicit tamper operation.
//!
//! The [`Ledger`] owns the ordered record sequence and is its single
//! mutation point. Appending fixes a record's index, timestamp, previous
//! digest, and digest permanently. The tamper operation rewrites only a
//! payload, leaving the stored digests stale so the audit pass has
//! something to catch.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use super::fingerprint;
use super::record::{GENESIS_SENTINEL, Payload, Record};

/// Wall-clock abstraction so record timestamps can be pinned in tests.
pub trait TimeSource: fmt::Debug {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&mut self) -> i64;

    /// RFC 3339 rendering of the current instant, used for record
    /// timestamps.
    fn now_rfc3339(&mut self) -> String {
        let millis = self.now_millis();
        DateTime::<Utc>::from_timestamp_millis(millis)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// System UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_millis(&mut self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock that advances a fixed amount per reading.
///
/// With a fixed clock and a fixed load seed, an entire chain (digests
/// included) reproduces exactly across runs.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current_ms: i64,
    step_ms: i64,
}

impl FixedClock {
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self { current_ms: start_ms, step_ms }
    }
}

impl TimeSource for FixedClock {
    fn now_millis(&mut self) -> i64 {
        let now = self.current_ms;
        self.current_ms += self.step_ms;
        now
    }
}

/// Errors from ledger mutations.
///
/// A failed operation leaves the chain exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The payload has no deterministic serialized form.
    #[error("payload cannot be serialized: {0}")]
    Serialization(String),
    /// The tamper target index is outside the chain.
    #[error("no record at index {index} (chain length {len})")]
    NotFound { index: u64, len: usize },
}

/// Outcome of a tamper call that found its target record.
#[derive(Debug)]
pub enum TamperOutcome<'a> {
    /// The replacement payload serialized identically to the stored one;
    /// nothing was written and the tamper flag was left alone.
    Unchanged,
    /// The payload was rewritten in place.
    Tampered(&'a Record),
}

/// Hash-linked, append-only record chain.
#[derive(Debug)]
pub struct Ledger {
    records: Vec<Record>,
    clock: Box<dyn TimeSource>,
}

impl Ledger {
    /// Creates an empty ledger stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Creates an empty ledger stamped by the given clock.
    pub fn with_clock(clock: Box<dyn TimeSource>) -> Self {
        Self { records: Vec::new(), clock }
    }

    /// Appends a payload as the next record in the chain.
    ///
    /// The new record links to the digest of the current last record, or to
    /// the genesis sentinel when the chain is empty. On error the chain is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Serialization`] when the payload cannot be
    /// serialized to canonical JSON.
    pub fn append(&mut self, payload: Payload) -> Result<&Record, LedgerError> {
        let serialized = payload
            .to_canonical_json()
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        let index = self.records.len() as u64;
        let prev_digest = match self.records.last() {
            Some(last) => last.digest.clone(),
            None => GENESIS_SENTINEL.to_string(),
        };
        let timestamp = self.clock.now_rfc3339();
        let digest = fingerprint::digest(index, &prev_digest, &timestamp, &serialized);
        tracing::debug!(index, %digest, "record appended");

        let slot = self.records.len();
        self.records.push(Record {
            index,
            timestamp,
            payload,
            prev_digest,
            digest,
            tampered: false,
        });
        Ok(&self.records[slot])
    }

    /// Rewrites the payload of an existing record without touching its
    /// digest fields, marking the record as tampered.
    ///
    /// A replacement payload that serializes identically to the stored one
    /// is a no-op: nothing is written and the tamper flag is not set.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when `index` is outside the chain,
    /// or [`LedgerError::Serialization`] when either payload cannot be
    /// serialized. Both leave the chain untouched.
    pub fn tamper(
        &mut self,
        index: u64,
        new_payload: Payload,
    ) -> Result<TamperOutcome<'_>, LedgerError> {
        let len = self.records.len();
        let slot = usize::try_from(index).ok().and_then(|i| self.records.get_mut(i));
        let Some(record) = slot else {
            return Err(LedgerError::NotFound { index, len });
        };

        let existing = record
            .payload
            .to_canonical_json()
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let incoming = new_payload
            .to_canonical_json()
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        if existing == incoming {
            return Ok(TamperOutcome::Unchanged);
        }

        record.payload = new_payload;
        record.tampered = true;
        tracing::warn!(index, "record payload rewritten in place");
        Ok(TamperOutcome::Tampered(&*record))
    }

    /// Discards every record. The next append starts a new chain at index 0
    /// with the genesis sentinel.
    pub fn reset(&mut self) {
        self.records.clear();
        tracing::info!("chain reset");
    }

    /// Records in chain order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Owned copy of the chain, for consumers that outlive the ledger
    /// borrow such as the API state.
    pub fn snapshot_chain(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
