use sha2::{Digest, Sha256};

/// Stable content fingerprint for a feed item.
///
/// SHA-256 over `url || NUL || title`, hex-encoded. Identical inputs always
/// produce the same 64-character key; callers check uniqueness before insert.
#[must_use]
pub fn compute_dedupe_key(url: &str, title: &str) -> String {
    let input = format!("{url}\x00{title}");
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
