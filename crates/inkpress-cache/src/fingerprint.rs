//! Cache key generation.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of an ordered list of semantic inputs.
///
/// Each part is hashed followed by a NUL separator, so the digest is
/// sensitive to both order and part boundaries: `["ab", "c"]` and
/// `["a", "bc"]` never alias.
pub fn fingerprint<S: AsRef<str>>(parts: &[S]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref().as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
