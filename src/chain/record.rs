//! Chain record and payload types.

use std::fmt;

use serde::ser::Error as _;
use serde::{Deserialize, Serialize};

use crate::sim::types::Snapshot;

/// Placeholder previous-digest of the genesis record.
///
/// Fixed, and distinct from every digest the fingerprint function can emit
/// for real input.
pub const GENESIS_SENTINEL: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Payload carried by one record: an energy snapshot on the normal tick
/// path, or an arbitrary JSON value for manually injected records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Snapshot(Snapshot),
    Raw(serde_json::Value),
}

impl Payload {
    /// Canonical JSON form used for fingerprinting and change detection.
    ///
    /// Struct fields serialize in declaration order and JSON objects in
    /// sorted key order, so equal payloads always yield equal strings.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` when the payload holds a value JSON
    /// cannot represent, such as a non-finite float.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Payload::Snapshot(snapshot) => {
                // serde_json writes non-finite floats as null rather than
                // failing, so the finiteness check has to happen here.
                let finite = snapshot.solar_kw.is_finite()
                    && snapshot.load_kw.is_finite()
                    && snapshot.battery.soc.is_finite()
                    && snapshot.grid_kw.is_finite();
                if !finite {
                    return Err(serde_json::Error::custom(
                        "snapshot contains a non-finite number",
                    ));
                }
                serde_json::to_string(snapshot)
            }
            Payload::Raw(value) => serde_json::to_string(value),
        }
    }
}

impl From<Snapshot> for Payload {
    fn from(snapshot: Snapshot) -> Self {
        Payload::Snapshot(snapshot)
    }
}

/// One entry of the hash-linked chain.
///
/// Identity fields (`index`, `timestamp`, `prev_digest`, `digest`) are fixed
/// at append time and never recomputed afterwards. `tampered` marks records
/// whose payload was rewritten in place after appending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Zero-based position in the chain.
    pub index: u64,
    /// RFC 3339 creation timestamp.
    pub timestamp: String,
    pub payload: Payload,
    /// Digest of the preceding record, or [`GENESIS_SENTINEL`] at index 0.
    pub prev_digest: String,
    /// Fingerprint over index, previous digest, timestamp, and payload.
    pub digest: String,
    pub tampered: bool,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digest_short = self.digest.get(..12).unwrap_or(&self.digest);
        let flag = if self.tampered { " [tampered]" } else { "" };
        match &self.payload {
            Payload::Snapshot(snapshot) => write!(
                f,
                "#{:>4}  {}  {}  digest={}..{}",
                self.index, self.timestamp, snapshot, digest_short, flag
            ),
            Payload::Raw(_) => write!(
                f,
                "#{:>4}  {}  <injected payload>  digest={}..{}",
                self.index, self.timestamp, digest_short, flag
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::fingerprint::DIGEST_HEX_LEN;
    use crate::sim::types::{BatteryState, BatteryStatus};

    fn snapshot() -> Snapshot {
        Snapshot {
            solar_kw: 3.97,
            load_kw: 0.52,
            battery: BatteryState::new(57.5, BatteryStatus::Charging),
            grid_kw: 0.0,
            produced_at_ms: 1_704_067_200_000,
        }
    }

    #[test]
    fn sentinel_has_digest_width() {
        assert_eq!(GENESIS_SENTINEL.len(), DIGEST_HEX_LEN);
        assert!(GENESIS_SENTINEL.chars().all(|c| c == '0'));
    }

    #[test]
    fn snapshot_payload_serializes_as_plain_object() {
        let json = Payload::Snapshot(snapshot()).to_canonical_json().unwrap();
        assert!(json.starts_with(r#"{"solar_kw":3.97"#));
        assert!(json.contains(r#""status":"CHARGING""#));
        assert!(!json.contains("Snapshot"));
    }

    #[test]
    fn raw_payload_serializes_with_sorted_keys() {
        let value = serde_json::json!({"zulu": 1, "alpha": 2});
        let json = Payload::Raw(value).to_canonical_json().unwrap();
        assert_eq!(json, r#"{"alpha":2,"zulu":1}"#);
    }

    #[test]
    fn equal_payloads_share_canonical_form() {
        let a = Payload::Snapshot(snapshot()).to_canonical_json().unwrap();
        let b = Payload::Snapshot(snapshot()).to_canonical_json().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_snapshot_fails_to_serialize() {
        let mut bad = snapshot();
        bad.solar_kw = f64::NAN;
        assert!(Payload::Snapshot(bad).to_canonical_json().is_err());
    }

    #[test]
    fn record_round_trips_through_serde() {
        let record = Record {
            index: 4,
            timestamp: "2024-01-01T00:00:01.000Z".to_string(),
            payload: Payload::Snapshot(snapshot()),
            prev_digest: "ab".repeat(32),
            digest: "cd".repeat(32),
            tampered: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn display_marks_tampered_records() {
        let record = Record {
            index: 2,
            timestamp: "2024-01-01T00:00:01.000Z".to_string(),
            payload: Payload::Raw(serde_json::json!({"solar_kw": 500.0})),
            prev_digest: "ab".repeat(32),
            digest: "cd".repeat(32),
            tampered: true,
        };
        let line = record.to_string();
        assert!(line.contains("[tampered]"));
        assert!(line.contains("<injected payload>"));
    }
}
