//! Ledger gateway trait and transport errors.

use async_trait::async_trait;

use crate::types::{CallDescriptor, ExecutionResult, GameId, OnChainGame};

// ============================================================================
// Error Types
// ============================================================================

/// Failures below the ledger's rules: the call never reached execution or
/// its result never came back. A rejected call is not a transport error; it
/// is an [`ExecutionResult`] with `accepted == false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend-specific error: {0}")]
    Backend(String),
}

impl TransportError {
    /// Whether resending the identical call may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Call/submit interface of the ledger.
///
/// Implementations execute the call atomically: either every effect of an
/// accepted call lands or none does.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Executes a call and reports the outcome.
    async fn call(&self, call: CallDescriptor) -> Result<ExecutionResult, TransportError>;

    /// Current authoritative state of `game`, if it exists.
    async fn query_game(&self, game: GameId) -> Result<Option<OnChainGame>, TransportError>;

    /// Connectivity check.
    async fn health_check(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
