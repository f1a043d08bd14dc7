//! Injected player inputs.
//!
//! The protocol never hard-codes a fleet, a key or a firing order. Runtime
//! users plug in a [`BoardProvider`], a [`KeyProvider`] and a
//! [`ShotStrategy`], so the same protocol runs with fixtures in tests,
//! random fleets in local matches and real keystores in deployment.

pub mod board;
pub mod keys;
pub mod shots;

pub use board::{BoardProvider, FixedBoard, RandomBoard};
pub use keys::{Base64Key, EnvKey, KeyProvider};
pub use shots::{FixedShots, ShotStrategy, SweepShots};
