//! Sui integration for the battleship Move module.
//!
//! This crate turns protocol steps into signed Move calls and executes them:
//! - [`SuiConfig`]: deployment ids from the environment
//! - [`SignerKey`]: Ed25519 keystore entries, call signing
//! - [`BattleshipContract`]: one call builder per entry function
//! - [`LocalLedger`]: in-process emulation of the deployed module
//!
//! # Architecture
//!
//! ```text
//! TurnProtocol ──► BattleshipContract ──► SignerKey::sign ──► LedgerGateway
//!                                                               │
//!                                                          LocalLedger
//!                                                   (signature, proofs, rules)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_sui::{LocalLedger, SignerKey, SuiConfig};
//! use client_blockchain_core::LedgerGateway;
//!
//! let config = SuiConfig::from_env()?;
//! let ledger = LocalLedger::new(config.contract()?, engine.clone());
//! let key = SignerKey::from_env(client_blockchain_sui::keystore::KEYSTORE_ENV)?;
//!
//! let call = key.sign(ledger.contract().new_game(&commitment, &proof)?)?;
//! let result = ledger.call(call).await?;
//! ```

pub mod config;
pub mod contracts;
pub mod error;
pub mod keystore;
pub mod localnet;

pub use config::SuiConfig;
pub use contracts::{BattleshipContract, BattleshipFunction};
pub use error::{KeyFormatError, Result, SuiError};
pub use keystore::{SignerKey, verify_call};
pub use localnet::LocalLedger;
