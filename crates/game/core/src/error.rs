//! Error types for board validation and session rule enforcement.
//!
//! Board errors mirror the constraints of the board circuit so invalid
//! layouts can be rejected before an expensive proving attempt. Session
//! errors are raised by the rules engine that owns the authoritative
//! [`GameSession`](crate::GameSession) (the ledger).

use crate::board::Coordinate;
use crate::session::{Phase, PlayerRole};

/// Placement rule violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("ship {ship} extends off the board at {cell}")]
    OutOfBounds { ship: usize, cell: Coordinate },

    #[error("ships {first} and {second} overlap at {cell}")]
    Overlap {
        first: usize,
        second: usize,
        cell: Coordinate,
    },

    #[error("expected {expected} ship placements, got {actual}")]
    ShipCount { expected: usize, actual: usize },

    #[error("could not place ships after {attempts} attempts")]
    PlacementExhausted { attempts: usize },
}

/// Session rule violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("operation requires phase {expected:?}, session is {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("it is not {0:?}'s turn")]
    NotYourTurn(PlayerRole),

    #[error("nonce mismatch: expected {expected}, got {actual}")]
    NonceMismatch { expected: u64, actual: u64 },

    #[error("shot {0} is off the board")]
    ShotOutOfBounds(Coordinate),

    #[error("{shooter:?} already fired at {coord}")]
    AlreadyShot { shooter: PlayerRole, coord: Coordinate },

    #[error("terminal turn submitted but {role:?} still has {remaining} unsunk cells")]
    GameNotOver { role: PlayerRole, remaining: usize },

    #[error("a player cannot join their own game")]
    SelfJoin,
}

impl RuleError {
    /// Stable status code used by the ledger when rejecting a call.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "E_WRONG_PHASE",
            Self::NotYourTurn(_) => "E_NOT_YOUR_TURN",
            Self::NonceMismatch { .. } => "E_NONCE_MISMATCH",
            Self::ShotOutOfBounds(_) => "E_SHOT_OUT_OF_BOUNDS",
            Self::AlreadyShot { .. } => "E_ALREADY_SHOT",
            Self::GameNotOver { .. } => "E_GAME_NOT_OVER",
            Self::SelfJoin => "E_SELF_JOIN",
        }
    }
}
