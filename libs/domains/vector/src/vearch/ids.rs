use sha2::{Digest, Sha256};

/// Content-addressed record id: SHA-256 of the UTF-8 text, lowercase hex.
///
/// Identical texts map to the same id, so re-inserting a text without an
/// explicit id overwrites the earlier record.
pub fn derive_id(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
