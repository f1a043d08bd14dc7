//! Board layout types.
//!
//! A [`Board`] is the private input of both circuits. Its flattening order
//! (`[x0, y0, z0, x1, y1, z1, ...]`) is part of the commitment scheme and must
//! never change: reordering produces a different hash and breaks the link
//! between the published commitment and later shot proofs.

use core::fmt;

use crate::config::GameConfig;
use crate::error::BoardError;

/// Cell coordinate on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub const fn in_bounds(&self) -> bool {
        self.x < GameConfig::BOARD_SIZE && self.y < GameConfig::BOARD_SIZE
    }

    /// Row-major cell index, the same value the circuits compare.
    pub const fn index(&self) -> usize {
        self.x as usize + self.y as usize * GameConfig::BOARD_SIZE as usize
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ship orientation. Encoded as the `z` bit of a placement triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Cells `(x + i, y)`.
    Horizontal,
    /// Cells `(x, y + i)`.
    Vertical,
}

impl Orientation {
    pub const fn as_bit(self) -> u8 {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Vertical } else { Self::Horizontal }
    }
}

/// Anchor cell plus orientation of one ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipPlacement {
    pub x: u8,
    pub y: u8,
    pub orientation: Orientation,
}

impl ShipPlacement {
    pub const fn new(x: u8, y: u8, orientation: Orientation) -> Self {
        Self { x, y, orientation }
    }

    pub const fn horizontal(x: u8, y: u8) -> Self {
        Self::new(x, y, Orientation::Horizontal)
    }

    pub const fn vertical(x: u8, y: u8) -> Self {
        Self::new(x, y, Orientation::Vertical)
    }

    /// Cells covered by a ship of `length` anchored here. Coordinates may
    /// fall off the board; validation is the caller's job.
    pub fn cells(&self, length: u8) -> impl Iterator<Item = Coordinate> + '_ {
        (0..length).map(move |i| match self.orientation {
            Orientation::Horizontal => Coordinate::new(self.x.saturating_add(i), self.y),
            Orientation::Vertical => Coordinate::new(self.x, self.y.saturating_add(i)),
        })
    }

    /// `[x, y, z]` triple in circuit order.
    pub const fn triple(&self) -> [u64; 3] {
        [
            self.x as u64,
            self.y as u64,
            self.orientation.as_bit() as u64,
        ]
    }
}

/// A full fleet placement, ships ordered by [`GameConfig::SHIP_LENGTHS`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    ships: [ShipPlacement; GameConfig::SHIP_COUNT],
}

impl Board {
    /// Builds a board without validating it. Invalid boards are useful as
    /// negative inputs to the prover; use [`Board::validated`] otherwise.
    pub const fn new(ships: [ShipPlacement; GameConfig::SHIP_COUNT]) -> Self {
        Self { ships }
    }

    pub fn validated(ships: [ShipPlacement; GameConfig::SHIP_COUNT]) -> Result<Self, BoardError> {
        let board = Self::new(ships);
        board.validate()?;
        Ok(board)
    }

    /// Builds a board from a slice, checking the ship count.
    pub fn from_slice(ships: &[ShipPlacement]) -> Result<Self, BoardError> {
        let ships: [ShipPlacement; GameConfig::SHIP_COUNT] =
            ships.try_into().map_err(|_| BoardError::ShipCount {
                expected: GameConfig::SHIP_COUNT,
                actual: ships.len(),
            })?;
        Self::validated(ships)
    }

    pub fn ships(&self) -> &[ShipPlacement; GameConfig::SHIP_COUNT] {
        &self.ships
    }

    /// Iterates `(ship_index, cell)` over every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, Coordinate)> + '_ {
        self.ships
            .iter()
            .zip(GameConfig::SHIP_LENGTHS)
            .enumerate()
            .flat_map(|(idx, (ship, len))| ship.cells(len).map(move |cell| (idx, cell)))
    }

    /// Whether a shot at `coord` hits this board.
    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.cells().any(|(_, cell)| cell == coord)
    }

    /// Checks the same placement rules the board circuit enforces.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut owner: [Option<usize>; GameConfig::cell_count()] = [None; GameConfig::cell_count()];
        for (ship, cell) in self.cells() {
            if !cell.in_bounds() || self.runs_off_edge(ship) {
                return Err(BoardError::OutOfBounds { ship, cell });
            }
            let slot = &mut owner[cell.index()];
            if let Some(first) = *slot {
                return Err(BoardError::Overlap {
                    first,
                    second: ship,
                    cell,
                });
            }
            *slot = Some(ship);
        }
        Ok(())
    }

    // saturating_add in `cells` can fold an overflowing coordinate back onto
    // the board edge for anchors near u8::MAX.
    fn runs_off_edge(&self, ship: usize) -> bool {
        let placement = &self.ships[ship];
        let extent = GameConfig::SHIP_LENGTHS[ship] as u16 - 1;
        match placement.orientation {
            Orientation::Horizontal => placement.x as u16 + extent >= GameConfig::BOARD_SIZE as u16,
            Orientation::Vertical => placement.y as u16 + extent >= GameConfig::BOARD_SIZE as u16,
        }
    }

    /// Flattened `[x, y, z]` triples in placement order.
    pub fn flatten(&self) -> [u64; GameConfig::FLATTENED_LEN] {
        let mut out = [0u64; GameConfig::FLATTENED_LEN];
        for (i, ship) in self.ships.iter().enumerate() {
            out[i * 3..i * 3 + 3].copy_from_slice(&ship.triple());
        }
        out
    }

    /// Random valid placement.
    #[cfg(feature = "rand")]
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Result<Self, BoardError> {
        const MAX_ATTEMPTS: usize = 1_000;

        for _ in 0..MAX_ATTEMPTS {
            let mut ships = [ShipPlacement::horizontal(0, 0); GameConfig::SHIP_COUNT];
            for (ship, len) in ships.iter_mut().zip(GameConfig::SHIP_LENGTHS) {
                let orientation = Orientation::from_bit(rng.gen_bool(0.5));
                let (max_x, max_y) = match orientation {
                    Orientation::Horizontal => (GameConfig::BOARD_SIZE - len, GameConfig::BOARD_SIZE - 1),
                    Orientation::Vertical => (GameConfig::BOARD_SIZE - 1, GameConfig::BOARD_SIZE - len),
                };
                *ship = ShipPlacement::new(
                    rng.gen_range(0..=max_x),
                    rng.gen_range(0..=max_y),
                    orientation,
                );
            }
            let board = Self::new(ships);
            if board.validate().is_ok() {
                return Ok(board);
            }
        }

        Err(BoardError::PlacementExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked_rows(x: u8) -> Board {
        Board::new([
            ShipPlacement::horizontal(x, 0),
            ShipPlacement::horizontal(x, 1),
            ShipPlacement::horizontal(x, 2),
            ShipPlacement::horizontal(x, 3),
            ShipPlacement::horizontal(x, 4),
        ])
    }

    #[test]
    fn stacked_rows_are_valid() {
        let board = stacked_rows(0);
        assert!(board.validate().is_ok());
        assert_eq!(board.cells().count(), GameConfig::TOTAL_SHIP_CELLS);
    }

    #[test]
    fn occupies_follows_orientation() {
        let board = stacked_rows(1);
        assert!(board.occupies(Coordinate::new(1, 0)));
        assert!(board.occupies(Coordinate::new(5, 0)));
        assert!(!board.occupies(Coordinate::new(6, 0)));
        assert!(!board.occupies(Coordinate::new(0, 0)));
        assert!(board.occupies(Coordinate::new(2, 4)));
        assert!(!board.occupies(Coordinate::new(3, 4)));
    }

    #[test]
    fn overlap_is_rejected() {
        let board = Board::new([
            ShipPlacement::horizontal(0, 0),
            ShipPlacement::vertical(2, 0),
            ShipPlacement::horizontal(0, 5),
            ShipPlacement::horizontal(0, 6),
            ShipPlacement::horizontal(0, 7),
        ]);
        assert_eq!(
            board.validate(),
            Err(BoardError::Overlap {
                first: 0,
                second: 1,
                cell: Coordinate::new(2, 0),
            })
        );
    }

    #[test]
    fn off_board_is_rejected() {
        let board = Board::new([
            ShipPlacement::horizontal(6, 0),
            ShipPlacement::horizontal(0, 1),
            ShipPlacement::horizontal(0, 2),
            ShipPlacement::horizontal(0, 3),
            ShipPlacement::horizontal(0, 4),
        ]);
        assert!(matches!(
            board.validate(),
            Err(BoardError::OutOfBounds { ship: 0, .. })
        ));
    }

    #[test]
    fn flatten_keeps_placement_order() {
        let board = Board::new([
            ShipPlacement::vertical(9, 0),
            ShipPlacement::horizontal(0, 1),
            ShipPlacement::horizontal(0, 2),
            ShipPlacement::horizontal(0, 3),
            ShipPlacement::horizontal(0, 4),
        ]);
        let flat = board.flatten();
        assert_eq!(&flat[..6], &[9, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn from_slice_checks_count() {
        let ships = [ShipPlacement::horizontal(0, 0); 4];
        assert_eq!(
            Board::from_slice(&ships),
            Err(BoardError::ShipCount {
                expected: 5,
                actual: 4
            })
        );
    }

    #[cfg(feature = "rand")]
    #[test]
    fn random_boards_are_valid() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let board = Board::random(&mut rng).expect("placement should succeed");
            assert!(board.validate().is_ok());
        }
    }
}
