//! Idempotency key derivation.
//!
//! Mutation hooks key the cache by operation type and target identifier.
//! The target is hashed so keys stay short and do not leak identifiers
//! (ICCIDs, client ids) into logs.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// A caller-chosen identifier for one logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Wrap a caller-supplied key as is.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Derive a stable key from an operation name and its target.
    ///
    /// Format: `<operation>:<base64url(sha256(operation \0 target))>`.
    pub fn for_operation(operation: &str, target: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(operation.as_bytes());
        hasher.update([0u8]);
        hasher.update(target.as_bytes());
        let digest = URL_SAFE_NO_PAD.encode(hasher.finalize());
        Self(format!("{}:{}", operation, digest))
    }

    /// A fresh single-use key for submissions with no natural identity.
    pub fn random() -> Self {
        Self(format!("once:{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdempotencyKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for IdempotencyKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> Self {
        key.0
    }
}
