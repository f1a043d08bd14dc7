//! Firing order.

use std::collections::VecDeque;

use game_core::{Coordinate, GameConfig};

/// Pre-selected shot order. The protocol consumes shots in the order the
/// strategy yields them, skipping cells it has already fired at.
pub trait ShotStrategy: Send + Sync {
    fn next_shot(&mut self) -> Option<Coordinate>;
}

/// An explicit list of targets.
#[derive(Clone, Debug, Default)]
pub struct FixedShots {
    queue: VecDeque<Coordinate>,
}

impl FixedShots {
    pub fn new(shots: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            queue: shots.into_iter().collect(),
        }
    }
}

impl ShotStrategy for FixedShots {
    fn next_shot(&mut self) -> Option<Coordinate> {
        self.queue.pop_front()
    }
}

/// Every cell once, row by row. Never runs out before the opponent's fleet
/// is sunk.
#[derive(Clone, Debug, Default)]
pub struct SweepShots {
    next: usize,
}

impl ShotStrategy for SweepShots {
    fn next_shot(&mut self) -> Option<Coordinate> {
        let size = GameConfig::BOARD_SIZE as usize;
        if self.next >= GameConfig::cell_count() {
            return None;
        }
        let coord = Coordinate::new((self.next % size) as u8, (self.next / size) as u8);
        self.next += 1;
        Some(coord)
    }
}
