//! Signing key sources.

use client_blockchain_sui::keystore::KEYSTORE_ENV;
use client_blockchain_sui::{KeyFormatError, SignerKey};

pub trait KeyProvider: Send + Sync {
    /// Parses and checks the key. Called before any ledger interaction.
    fn signer(&self) -> Result<SignerKey, KeyFormatError>;
}

/// A base64 keystore entry held in memory.
#[derive(Clone)]
pub struct Base64Key(pub String);

impl KeyProvider for Base64Key {
    fn signer(&self) -> Result<SignerKey, KeyFormatError> {
        SignerKey::from_base64(&self.0)
    }
}

impl std::fmt::Debug for Base64Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Base64Key(..)")
    }
}

/// Keystore entry read from an environment variable.
#[derive(Clone, Debug)]
pub struct EnvKey {
    pub var: String,
}

impl EnvKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKey {
    fn default() -> Self {
        Self::new(KEYSTORE_ENV)
    }
}

impl KeyProvider for EnvKey {
    fn signer(&self) -> Result<SignerKey, KeyFormatError> {
        SignerKey::from_env(&self.var)
    }
}

impl KeyProvider for SignerKey {
    fn signer(&self) -> Result<SignerKey, KeyFormatError> {
        Ok(self.clone())
    }
}
