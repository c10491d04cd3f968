//! Remember token generation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Source of opaque session tokens
pub trait TokenGenerator: Send + Sync + Debug {
    fn generate(&self) -> Result<String, DomainError>;
}

/// Generates URL-safe remember tokens from the OS random source
#[derive(Debug, Clone)]
pub struct RememberTokenGenerator {
    /// Number of random bytes per token
    token_bytes: usize,
}

impl RememberTokenGenerator {
    pub const DEFAULT_TOKEN_BYTES: usize = 16;

    pub fn new() -> Self {
        Self {
            token_bytes: Self::DEFAULT_TOKEN_BYTES,
        }
    }

    /// Set the number of random bytes (at least one)
    pub fn with_token_bytes(mut self, bytes: usize) -> Self {
        self.token_bytes = bytes.max(1);
        self
    }
}

impl Default for RememberTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator for RememberTokenGenerator {
    fn generate(&self) -> Result<String, DomainError> {
        let mut random_bytes = vec![0u8; self.token_bytes];

        OsRng
            .try_fill_bytes(&mut random_bytes)
            .map_err(|e| DomainError::internal(format!("Random source unavailable: {}", e)))?;

        Ok(URL_SAFE_NO_PAD.encode(&random_bytes))
    }
}
