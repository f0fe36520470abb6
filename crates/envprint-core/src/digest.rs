//! One-way digest applied to every identifier and attribute before persistence.

use sha2::{Digest, Sha256};

/// Length of a digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// SHA-256 of the UTF-8 bytes of `input`, as lowercase hex.
///
/// # Examples
///
/// ```
/// use envprint_core::digest;
///
/// let hash = digest("AA:BB");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, digest("AA:BB"));
/// ```
pub fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}
