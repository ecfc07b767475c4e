//! Deterministic record fingerprints.
//!
//! Digests are integrity indicators for the record chain, not a security
//! primitive. They must be identical across runs, platforms, and toolchain
//! versions, so bytes are mixed through two fixed multiply-xor lanes and a
//! xorshift finalizer rather than any hasher with an unspecified algorithm.

/// Digest width in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Multiplier for the first mixing lane (64-bit golden ratio).
const LANE_A_PRIME: u64 = 0x9e37_79b9_7f4a_7c15;
/// Multiplier for the second mixing lane.
const LANE_B_PRIME: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Computes the fingerprint of a record's identity fields.
///
/// The digest covers the record index, the previous record's digest, the
/// creation timestamp, and the canonical serialized payload, in that order.
/// Equal inputs always produce equal output, and a single-character change
/// to any field changes the output.
///
/// # Arguments
///
/// * `index` - Position of the record in the chain.
/// * `prev_digest` - Digest of the preceding record, or the genesis sentinel.
/// * `timestamp` - RFC 3339 creation timestamp of the record.
/// * `payload_json` - Canonical JSON form of the record payload.
///
/// # Returns
///
/// A lowercase hex string of exactly [`DIGEST_HEX_LEN`] characters.
pub fn digest(index: u64, prev_digest: &str, timestamp: &str, payload_json: &str) -> String {
    let mut lane_a: u64 = 0xdead_beef;
    let mut lane_b: u64 = 0x41c6_ce57;

    let index_digits = index.to_string();
    for part in [index_digits.as_str(), prev_digest, timestamp, payload_json] {
        for &byte in part.as_bytes() {
            lane_a = (lane_a ^ u64::from(byte)).wrapping_mul(LANE_A_PRIME);
            lane_b = (lane_b ^ u64::from(byte)).wrapping_mul(LANE_B_PRIME);
        }
    }

    let word_a = scramble(lane_a ^ lane_b.rotate_left(32));
    let word_b = scramble(lane_b ^ word_a);
    let word_c = scramble(word_a ^ word_b.rotate_left(16));
    let word_d = scramble(word_b ^ word_c);
    format!("{word_a:016x}{word_b:016x}{word_c:016x}{word_d:016x}")
}

/// Avalanche pass over one 64-bit word.
fn scramble(mut word: u64) -> u64 {
    word ^= word >> 30;
    word = word.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    word ^= word >> 27;
    word = word.wrapping_mul(0x94d0_49bb_1331_11eb);
    word ^ (word >> 31)
}
