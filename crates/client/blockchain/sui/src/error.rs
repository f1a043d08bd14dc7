//! Error types for the Sui integration.

use thiserror::Error;

/// Keystore entry rejected before any use of the key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFormatError {
    #[error("keystore entry {0} is not set")]
    Missing(String),

    #[error("keystore entry is not valid base64: {0}")]
    Base64(String),

    #[error("keystore entry must decode to {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("unsupported key scheme flag {0:#04x}, expected 0x00 (ed25519)")]
    Scheme(u8),
}

/// Deployment configuration rejected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SuiError>;
