//! Deterministic board and session rules shared across the workspace.
//!
//! `game-core` defines the canonical game data (boards, shots, sessions) and
//! the pure turn rules. The prover consumes [`Board`] as private circuit
//! input, the ledger emulation owns an authoritative [`GameSession`], and the
//! turn protocol reads a projection of it to pick its next move.
pub mod board;
pub mod config;
pub mod error;
pub mod session;

pub use board::{Board, Coordinate, Orientation, ShipPlacement};
pub use config::GameConfig;
pub use error::{BoardError, RuleError};
pub use session::{GameSession, Phase, PlayerRole, Shot, ShotRecord};
