//! battleship Move module integration.
//!
//! ## Move Contract Reference
//!
//! ```move
//! module battleship::battleship {
//!     public struct State has key { id: UID, games: Table<u64, Game>, game_count: u64 }
//!
//!     entry fun new_game(state: &mut State, commitment: vector<u8>, proof: vector<u8>, ctx: &TxContext);
//!     entry fun join_game(state: &mut State, game: u64, commitment: vector<u8>, proof: vector<u8>, ctx: &TxContext);
//!     entry fun first_turn(state: &mut State, game: u64, x: u8, y: u8, ctx: &TxContext);
//!     entry fun turn(state: &mut State, game: u64, nonce: u64, hit: bool, proof: vector<u8>, x: u8, y: u8, ctx: &TxContext);
//!     entry fun final_turn(state: &mut State, game: u64, nonce: u64, proof: vector<u8>, ctx: &TxContext);
//! }
//! ```
//!
//! Builders return unsigned descriptors with an all-zero sender; signing
//! fills in the sender.

use std::fmt;
use std::str::FromStr;

use client_blockchain_core::{Address, CallArg, CallDescriptor, GameId, ObjectId, TransportError};
use game_core::Coordinate;
use zk::EncodedProof;

pub const MODULE: &str = "battleship";

/// Package id the local emulator answers to.
pub const LOCAL_PACKAGE_ID: &str = "0xba77";
/// State object id the local emulator answers to.
pub const LOCAL_STATE_OBJECT: ObjectId = ObjectId([0x5e; 32]);

/// Entry functions of the module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleshipFunction {
    NewGame,
    JoinGame,
    FirstTurn,
    Turn,
    FinalTurn,
}

impl BattleshipFunction {
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewGame => "new_game",
            Self::JoinGame => "join_game",
            Self::FirstTurn => "first_turn",
            Self::Turn => "turn",
            Self::FinalTurn => "final_turn",
        }
    }
}

impl fmt::Display for BattleshipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BattleshipFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_game" => Ok(Self::NewGame),
            "join_game" => Ok(Self::JoinGame),
            "first_turn" => Ok(Self::FirstTurn),
            "turn" => Ok(Self::Turn),
            "final_turn" => Ok(Self::FinalTurn),
            other => Err(format!("unknown battleship function `{other}`")),
        }
    }
}

/// Deployment ids plus call builders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleshipContract {
    pub package_id: String,
    pub state_object: ObjectId,
}

impl BattleshipContract {
    pub fn new(package_id: String, state_object: ObjectId) -> Self {
        Self {
            package_id,
            state_object,
        }
    }

    /// Ids of the in-process emulator.
    pub fn local() -> Self {
        Self::new(LOCAL_PACKAGE_ID.to_string(), LOCAL_STATE_OBJECT)
    }

    /// `{package}::battleship::{function}`.
    pub fn target(&self, function: BattleshipFunction) -> String {
        format!("{}::{}::{}", self.package_id, MODULE, function.name())
    }

    /// Splits a target into its function if it addresses this deployment.
    pub fn parse_target(&self, target: &str) -> Option<BattleshipFunction> {
        let prefix = format!("{}::{}::", self.package_id, MODULE);
        target.strip_prefix(&prefix)?.parse().ok()
    }

    fn call(
        &self,
        function: BattleshipFunction,
        mut args: Vec<CallArg>,
    ) -> CallDescriptor {
        args.insert(0, CallArg::Object(self.state_object));
        CallDescriptor::new(self.target(function), args, Address([0; 32]))
    }

    pub fn new_game(
        &self,
        commitment: &[u8; 32],
        proof: &EncodedProof,
    ) -> Result<CallDescriptor, TransportError> {
        Ok(self.call(
            BattleshipFunction::NewGame,
            vec![
                CallArg::pure(commitment.as_slice())?,
                CallArg::pure(proof.as_bytes())?,
            ],
        ))
    }

    pub fn join_game(
        &self,
        game: GameId,
        commitment: &[u8; 32],
        proof: &EncodedProof,
    ) -> Result<CallDescriptor, TransportError> {
        Ok(self.call(
            BattleshipFunction::JoinGame,
            vec![
                CallArg::pure(&game.0)?,
                CallArg::pure(commitment.as_slice())?,
                CallArg::pure(proof.as_bytes())?,
            ],
        ))
    }

    pub fn first_turn(&self, game: GameId, shot: Coordinate) -> Result<CallDescriptor, TransportError> {
        Ok(self.call(
            BattleshipFunction::FirstTurn,
            vec![
                CallArg::pure(&game.0)?,
                CallArg::pure(&shot.x)?,
                CallArg::pure(&shot.y)?,
            ],
        ))
    }

    /// Reports shot `nonce` and fires `next_shot`.
    pub fn turn(
        &self,
        game: GameId,
        nonce: u64,
        hit: bool,
        proof: &EncodedProof,
        next_shot: Coordinate,
    ) -> Result<CallDescriptor, TransportError> {
        Ok(self.call(
            BattleshipFunction::Turn,
            vec![
                CallArg::pure(&game.0)?,
                CallArg::pure(&nonce)?,
                CallArg::pure(&hit)?,
                CallArg::pure(proof.as_bytes())?,
                CallArg::pure(&next_shot.x)?,
                CallArg::pure(&next_shot.y)?,
            ],
        ))
    }

    /// Reports the hit on the last unsunk cell. No reciprocal shot.
    pub fn final_turn(
        &self,
        game: GameId,
        nonce: u64,
        proof: &EncodedProof,
    ) -> Result<CallDescriptor, TransportError> {
        Ok(self.call(
            BattleshipFunction::FinalTurn,
            vec![
                CallArg::pure(&game.0)?,
                CallArg::pure(&nonce)?,
                CallArg::pure(proof.as_bytes())?,
            ],
        ))
    }
}
