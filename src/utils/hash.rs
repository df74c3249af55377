//! Content fingerprints.
//!
//! Fingerprints name cache artifacts: stable, short, blake3-based.

/// Number of digest bytes kept in a fingerprint (16 hex characters).
const FINGERPRINT_BYTES: usize = 8;

/// Compute a short hex fingerprint of `content`.
///
/// ```ignore
/// fingerprint("Article,Book") // → "3f1c9a0e5b7d2c41"
/// ```
pub fn fingerprint(content: &str) -> String {
    let digest = blake3::hash(content.as_bytes());
    hex::encode(&digest.as_bytes()[..FINGERPRINT_BYTES])
}
