//! Shared setup for protocol tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use client_blockchain_core::{LedgerGateway, RecordingLedger};
use client_blockchain_sui::{BattleshipContract, LocalLedger, SignerKey};
use game_core::{Board, Coordinate, PlayerRole};
use runtime::{
    ArtifactSource, FixedBoard, FixedShots, ProverWorker, RetryPolicy, RuntimeConfig, TurnProtocol,
};
use zk::test_helpers::test_engine;

pub const HOST_SECRET: [u8; 32] = [0x11; 32];
pub const GUEST_SECRET: [u8; 32] = [0x22; 32];

pub fn recording_ledger() -> RecordingLedger<LocalLedger> {
    RecordingLedger::new(LocalLedger::new(BattleshipContract::local(), test_engine()))
}

pub fn fast_config() -> RuntimeConfig {
    RuntimeConfig {
        poll_interval: Duration::from_millis(5),
        retry: RetryPolicy::new(3, Duration::from_millis(1)),
        artifacts: ArtifactSource::default(),
    }
}

pub fn protocol(
    role: PlayerRole,
    board: Board,
    shots: impl IntoIterator<Item = Coordinate>,
    ledger: Arc<dyn LedgerGateway>,
) -> TurnProtocol {
    let secret = match role {
        PlayerRole::Host => HOST_SECRET,
        PlayerRole::Guest => GUEST_SECRET,
    };
    TurnProtocol::new(
        role,
        &FixedBoard(board),
        &SignerKey::from_secret(secret),
        Box::new(FixedShots::new(shots)),
        ledger,
        BattleshipContract::local(),
        ProverWorker::new(test_engine()),
    )
    .expect("fixture board and key are valid")
    .with_retry(fast_config().retry)
}

/// Cells `board` leaves empty, row by row.
pub fn misses(board: &Board, count: usize) -> Vec<Coordinate> {
    (0..100u8)
        .map(|i| Coordinate::new(i % 10, i / 10))
        .filter(|coord| !board.occupies(*coord))
        .take(count)
        .collect()
}

pub fn no_shots() -> Vec<Coordinate> {
    Vec::new()
}
