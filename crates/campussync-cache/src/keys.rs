use sha2::{Digest, Sha256};

/// Redis key of the session for `token`: `session:<sha256(token) hex>`.
///
/// Anyone able to list keys sees digests, not usable bearer tokens.
pub fn session_key(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("session:{}", hex::encode(digest))
}
