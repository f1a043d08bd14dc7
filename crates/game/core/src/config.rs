/// Fixed game constants shared by the circuits, the protocol and the ledger.
///
/// Every value here is baked into the board and shot circuits. Changing one
/// requires a new trusted setup, so they are not runtime-tunable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    /// Width and height of the square board.
    pub const BOARD_SIZE: u8 = 10;

    /// Ship lengths in placement order (carrier, battleship, cruiser, submarine, destroyer).
    pub const SHIP_LENGTHS: [u8; 5] = [5, 4, 3, 3, 2];

    /// Number of ship placements on a board.
    pub const SHIP_COUNT: usize = Self::SHIP_LENGTHS.len();

    /// Number of occupied cells on a valid board. Proven hits reaching this
    /// count end the game.
    pub const TOTAL_SHIP_CELLS: usize = 17;

    /// Length of the flattened `[x, y, z]` sequence fed to the board hash.
    pub const FLATTENED_LEN: usize = Self::SHIP_COUNT * 3;

    /// Total number of cells on the board.
    pub const fn cell_count() -> usize {
        Self::BOARD_SIZE as usize * Self::BOARD_SIZE as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_cells_match_lengths() {
        let total: usize = GameConfig::SHIP_LENGTHS.iter().map(|&l| l as usize).sum();
        assert_eq!(total, GameConfig::TOTAL_SHIP_CELLS);
        assert_eq!(GameConfig::FLATTENED_LEN, 15);
        assert_eq!(GameConfig::cell_count(), 100);
    }
}
