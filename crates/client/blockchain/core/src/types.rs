//! Common types for ledger interactions.

use std::fmt;

use game_core::{Coordinate, GameSession, PlayerRole};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::traits::TransportError;

fn parse_hex32(value: &str) -> Result<[u8; 32], TransportError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(stripped).map_err(|e| TransportError::Serialization(e.to_string()))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        TransportError::Serialization(format!("expected 32 bytes, got {}", bytes.len()))
    })
}

/// Ledger object identifier (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub [u8; 32]);

impl ObjectId {
    /// Parses `0x`-prefixed or bare hex.
    pub fn from_hex(value: &str) -> Result<Self, TransportError> {
        parse_hex32(value).map(Self)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Account address. For the local ledger, the caller's Ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn from_hex(value: &str) -> Result<Self, TransportError> {
        parse_hex32(value).map(Self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Game slot index inside the shared state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generic transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Vec<u8>);

impl TransactionId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

// ============================================================================
// Calls
// ============================================================================

/// Positional call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS-encoded pure value (integers, booleans, byte vectors).
    Pure(Vec<u8>),
    /// Shared or owned object passed by id.
    Object(ObjectId),
}

impl CallArg {
    /// BCS-encodes `value`.
    pub fn pure<T: Serialize + ?Sized>(value: &T) -> Result<Self, TransportError> {
        bcs::to_bytes(value)
            .map(Self::Pure)
            .map_err(|e| TransportError::Serialization(e.to_string()))
    }

    /// Decodes a pure argument. Fails on object arguments and on trailing
    /// bytes.
    pub fn decode_pure<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        match self {
            Self::Pure(bytes) => {
                bcs::from_bytes(bytes).map_err(|e| TransportError::Serialization(e.to_string()))
            }
            Self::Object(id) => Err(TransportError::Serialization(format!(
                "expected a pure argument, found object {id}"
            ))),
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            Self::Pure(_) => None,
        }
    }
}

/// Opaque call: function path plus positional arguments, signed by the
/// sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    /// `{package}::{module}::{function}`.
    pub target: String,
    pub args: Vec<CallArg>,
    pub sender: Address,
    /// Signature over [`signing_bytes`](Self::signing_bytes). Empty until
    /// signed.
    pub signature: Vec<u8>,
}

impl CallDescriptor {
    pub fn new(target: impl Into<String>, args: Vec<CallArg>, sender: Address) -> Self {
        Self {
            target: target.into(),
            args,
            sender,
            signature: Vec::new(),
        }
    }

    /// BCS encoding of `(target, args, sender)`.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransportError> {
        bcs::to_bytes(&(&self.target, &self.args, &self.sender))
            .map_err(|e| TransportError::Serialization(e.to_string()))
    }

    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Function name, the last `::` segment of the target.
    pub fn function(&self) -> &str {
        self.target.rsplit("::").next().unwrap_or(&self.target)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Event emitted by an accepted call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    GameCreated {
        game: GameId,
        host: Address,
    },
    GameJoined {
        game: GameId,
        guest: Address,
    },
    ShotFired {
        game: GameId,
        nonce: u64,
        shooter: PlayerRole,
        coord: Coordinate,
    },
    ShotReported {
        game: GameId,
        nonce: u64,
        reporter: PlayerRole,
        hit: bool,
    },
    GameFinished {
        game: GameId,
        winner: PlayerRole,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Success,
    /// `code` is a stable abort code such as `E_NONCE_MISMATCH`.
    Failure { code: String, message: String },
}

/// Structured outcome of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub digest: TransactionId,
    pub accepted: bool,
    pub events: Vec<LedgerEvent>,
    pub status: ExecutionStatus,
}

impl ExecutionResult {
    pub fn success(digest: TransactionId, events: Vec<LedgerEvent>) -> Self {
        Self {
            digest,
            accepted: true,
            events,
            status: ExecutionStatus::Success,
        }
    }

    pub fn rejected(digest: TransactionId, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            digest,
            accepted: false,
            events: Vec::new(),
            status: ExecutionStatus::Failure {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn failure_code(&self) -> Option<&str> {
        match &self.status {
            ExecutionStatus::Success => None,
            ExecutionStatus::Failure { code, .. } => Some(code),
        }
    }

    /// Id of the game created by this call, if any.
    pub fn created_game(&self) -> Option<GameId> {
        self.events.iter().find_map(|event| match event {
            LedgerEvent::GameCreated { game, .. } => Some(*game),
            _ => None,
        })
    }
}

/// Authoritative game state as stored by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainGame {
    pub game: GameId,
    pub host: Address,
    pub guest: Option<Address>,
    pub session: GameSession,
}

impl OnChainGame {
    /// Role of `address` in this game.
    pub fn role_of(&self, address: &Address) -> Option<PlayerRole> {
        if &self.host == address {
            Some(PlayerRole::Host)
        } else if self.guest.as_ref() == Some(address) {
            Some(PlayerRole::Guest)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_args_round_trip_through_bcs() {
        let arg = CallArg::pure(&vec![1u8, 2, 3]).unwrap();
        // ULEB128 length prefix then raw bytes.
        assert_eq!(arg, CallArg::Pure(vec![3, 1, 2, 3]));
        assert_eq!(arg.decode_pure::<Vec<u8>>().unwrap(), vec![1, 2, 3]);

        let arg = CallArg::pure(&7u64).unwrap();
        assert_eq!(arg.decode_pure::<u64>().unwrap(), 7);
        assert!(arg.decode_pure::<bool>().is_err());
    }

    #[test]
    fn object_args_are_not_pure() {
        let arg = CallArg::Object(ObjectId([9; 32]));
        assert!(arg.decode_pure::<u64>().is_err());
        assert_eq!(arg.as_object(), Some(ObjectId([9; 32])));
    }

    #[test]
    fn signing_bytes_ignore_signature() {
        let call = CallDescriptor::new("0x1::battleship::new_game", vec![], Address([1; 32]));
        let signed = call.clone().with_signature(vec![0xaa; 64]);
        assert_eq!(call.signing_bytes().unwrap(), signed.signing_bytes().unwrap());
        assert_eq!(call.function(), "new_game");
    }

    #[test]
    fn hex_ids_parse_with_or_without_prefix() {
        let hex = format!("0x{}", "ab".repeat(32));
        assert_eq!(ObjectId::from_hex(&hex).unwrap(), ObjectId([0xab; 32]));
        assert_eq!(ObjectId::from_hex(&hex[2..]).unwrap().to_string(), hex);
        assert!(Address::from_hex("0x1234").is_err());
    }
}
