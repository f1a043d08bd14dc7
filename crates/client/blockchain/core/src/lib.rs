//! Ledger boundary for the battleship turn protocol.
//!
//! The protocol never talks to a chain directly. It builds a
//! [`CallDescriptor`] (target function path plus positional arguments),
//! hands it to a [`LedgerGateway`], and reads back an [`ExecutionResult`]
//! (accepted flag, emitted events, status). Reads go through
//! [`LedgerGateway::query_game`], which returns the ledger's authoritative
//! session.
//!
//! # Architecture
//!
//! ```text
//! TurnProtocol ──► CallDescriptor ──► LedgerGateway ──► ExecutionResult
//!                                        │
//!                                        ├── LocalLedger (in-process emulation)
//!                                        └── RecordingLedger (tests, `mock` feature)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{CallArg, CallDescriptor, LedgerGateway};
//!
//! async fn open(ledger: &dyn LedgerGateway, call: CallDescriptor) {
//!     let result = ledger.call(call).await?;
//!     assert!(result.accepted);
//! }
//! ```

pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use traits::{LedgerGateway, TransportError};

pub use types::{
    Address, CallArg, CallDescriptor, ExecutionResult, ExecutionStatus, GameId, LedgerEvent,
    ObjectId, OnChainGame, TransactionId,
};

#[cfg(any(test, feature = "mock"))]
pub use mock::RecordingLedger;
