use sha2::{Digest, Sha256};

/// Sha-256 of `input` as lowercase hex. Idempotency key hashes and request
/// body hashes are stored and compared in this form.
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
