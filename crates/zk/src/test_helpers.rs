//! Shared fixtures for tests across the workspace.
//!
//! Groth16 setup is the slowest step in any test, so every test in a process
//! shares one seeded set of artifacts.

use std::sync::{Arc, OnceLock};

use game_core::{Board, Coordinate, ShipPlacement};

use crate::circuit::CircuitArtifacts;
use crate::engine::ProofEngine;

/// Seed of the shared development setup.
pub const TEST_SETUP_SEED: u64 = 0x0b57_1e5e;

static TEST_ARTIFACTS: OnceLock<Arc<CircuitArtifacts>> = OnceLock::new();

/// Seeded artifacts, generated on first call.
pub fn test_artifacts() -> Arc<CircuitArtifacts> {
    TEST_ARTIFACTS
        .get_or_init(|| {
            Arc::new(
                CircuitArtifacts::dev_setup(TEST_SETUP_SEED)
                    .expect("development setup should succeed"),
            )
        })
        .clone()
}

pub fn test_engine() -> ProofEngine {
    ProofEngine::groth16(test_artifacts())
}

/// Host fleet: ships stacked in the top-left corner.
pub fn host_board() -> Board {
    Board::new([
        ShipPlacement::horizontal(0, 0),
        ShipPlacement::horizontal(0, 1),
        ShipPlacement::horizontal(0, 2),
        ShipPlacement::horizontal(0, 3),
        ShipPlacement::horizontal(0, 4),
    ])
}

/// Guest fleet: mixed orientations.
pub fn guest_board() -> Board {
    Board::new([
        ShipPlacement::vertical(9, 0),
        ShipPlacement::horizontal(1, 8),
        ShipPlacement::vertical(5, 2),
        ShipPlacement::horizontal(0, 0),
        ShipPlacement::vertical(2, 3),
    ])
}

/// Every cell of `board`, in placement order.
pub fn ship_cells(board: &Board) -> Vec<Coordinate> {
    board.cells().map(|(_, cell)| cell).collect()
}

/// A cell `board` leaves empty.
pub fn empty_cell(board: &Board) -> Coordinate {
    (0..100u8)
        .map(|i| Coordinate::new(i % 10, i / 10))
        .find(|coord| !board.occupies(*coord))
        .expect("a fleet covers only 17 cells")
}
