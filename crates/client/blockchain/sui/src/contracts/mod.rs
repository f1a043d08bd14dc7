//! Sui Move contract integrations.
//!
//! Each contract is a struct holding deployment ids, with one call builder
//! per entry function.

pub mod battleship;

pub use battleship::{BattleshipContract, BattleshipFunction};
