//! Error types surfaced by the turn protocol.
//!
//! Every failure below the protocol (proving, key parsing, transport,
//! ledger rules) reaches the caller as a [`TurnError`]. Nothing is retried
//! silently except network failures, which are resent unchanged within the
//! configured [`RetryPolicy`](crate::RetryPolicy).

use client_blockchain_core::{GameId, TransportError};
use client_blockchain_sui::KeyFormatError;
use game_core::{BoardError, Phase, PlayerRole};
use thiserror::Error;
use zk::ProofError;

pub type Result<T> = std::result::Result<T, TurnError>;

#[derive(Debug, Error)]
pub enum TurnError {
    /// Proving, local verification or encoding failed. Nothing was
    /// submitted.
    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error(transparent)]
    KeyFormat(#[from] KeyFormatError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("ledger rejected {function}: {code} ({message})")]
    LedgerRejection {
        function: String,
        code: String,
        message: String,
    },

    #[error("nonce desync: ledger expects {expected}, protocol submitted {actual}")]
    Desync { expected: u64, actual: u64 },

    #[error("{action} is not allowed in phase {phase:?}")]
    OutOfOrder { action: &'static str, phase: Phase },

    #[error("{role:?} cannot {action}")]
    WrongRole {
        role: PlayerRole,
        action: &'static str,
    },

    #[error("game {0} does not exist on the ledger")]
    UnknownGame(GameId),

    #[error("ledger accepted new_game without reporting a game id")]
    MissingGameId,

    #[error("shot strategy ran out of shots")]
    ShotsExhausted,
}

impl TurnError {
    /// Whether the same turn can be attempted again after resynchronizing.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Desync { .. } => true,
            Self::Transport(err) => err.is_transient(),
            _ => false,
        }
    }

    /// Ledger abort code, if the ledger rejected the call.
    pub fn rejection_code(&self) -> Option<&str> {
        match self {
            Self::LedgerRejection { code, .. } => Some(code),
            _ => None,
        }
    }
}
