//! Random token generation for issued credentials.
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub struct TokenGenerator;

impl TokenGenerator {
    /// 64 lowercase hex chars: SHA-256 over a fresh v4 UUID.
    pub fn generate() -> String {
        hex::encode(Sha256::digest(Uuid::new_v4().as_bytes()))
    }
}
