//! Turn protocol orchestration for the battleship game.
//!
//! This crate sequences one player's side of a game: commit to a board,
//! prove every outcome, package proofs as ledger calls and keep nonce and
//! hit bookkeeping in step with the ledger.
//!
//! Modules are organized by responsibility:
//! - [`protocol`] hosts the [`TurnProtocol`] state machine
//! - [`driver`] runs a protocol against the ledger projection until the game ends
//! - [`providers`] supplies the injected board, key and firing order
//! - [`config`] reads runtime tuning from the environment
//! - `workers` keeps proving off the async runtime
pub mod config;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod providers;

mod workers;

pub use config::{ArtifactSource, RetryPolicy, RuntimeConfig};
pub use driver::{GameOutcome, PlayerDriver, Seat};
pub use error::{Result, TurnError};
pub use protocol::{TurnOutcome, TurnProtocol};
pub use providers::{
    Base64Key, BoardProvider, EnvKey, FixedBoard, FixedShots, KeyProvider, RandomBoard,
    ShotStrategy, SweepShots,
};
pub use workers::{ProofMetrics, ProverWorker};
