//! Fleet placement sources.

use std::sync::Mutex;

use game_core::{Board, BoardError};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub trait BoardProvider: Send + Sync {
    /// The fleet to commit to. Must satisfy [`Board::validate`].
    fn board(&self) -> Result<Board, BoardError>;
}

/// A fixed, pre-chosen fleet.
#[derive(Clone, Debug)]
pub struct FixedBoard(pub Board);

impl BoardProvider for FixedBoard {
    fn board(&self) -> Result<Board, BoardError> {
        self.0.validate()?;
        Ok(self.0.clone())
    }
}

/// Random valid fleet, reproducible when seeded.
#[derive(Debug)]
pub struct RandomBoard {
    rng: Mutex<StdRng>,
}

impl RandomBoard {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl BoardProvider for RandomBoard {
    fn board(&self) -> Result<Board, BoardError> {
        match self.rng.lock() {
            Ok(mut rng) => Board::random(&mut *rng),
            Err(poisoned) => Board::random(&mut *poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::ShipPlacement;

    #[test]
    fn fixed_board_is_validated() {
        let overlapping = Board::new([ShipPlacement::horizontal(0, 0); 5]);
        assert!(matches!(
            FixedBoard(overlapping).board(),
            Err(BoardError::Overlap { .. })
        ));
    }

    #[test]
    fn seeded_boards_are_reproducible_and_valid() {
        let first = RandomBoard::seeded(11).board().unwrap();
        let second = RandomBoard::seeded(11).board().unwrap();
        assert_eq!(first, second);
        assert!(first.validate().is_ok());
    }
}
