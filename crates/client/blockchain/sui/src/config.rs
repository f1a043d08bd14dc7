//! Ledger deployment configuration.
//!
//! The workspace talks to the in-process `battleship` module only. The
//! deployment ids can still be overridden so calls carry the same targets a
//! published package would.

use std::env;

use client_blockchain_core::ObjectId;

use crate::contracts::BattleshipContract;
use crate::error::{Result, SuiError};

/// Network names accepted in `SUI_NETWORK`.
const LOCAL_NETWORKS: [&str; 2] = ["local", "localnet"];

/// Deployment of the battleship module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiConfig {
    /// Package ID of the deployed battleship module
    pub package_id: Option<String>,

    /// Shared object holding every game
    pub state_object_id: Option<ObjectId>,
}

impl SuiConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SUI_NETWORK` - must be `local` when set; remote networks have no
    ///   submitter and are rejected
    /// - `SUI_PACKAGE_ID` - Deployed battleship package ID
    /// - `SUI_STATE_OBJECT_ID` - Shared game state object ID
    pub fn from_env() -> Result<Self> {
        if let Ok(network) = env::var("SUI_NETWORK") {
            check_network(&network)?;
        }

        let state_object_id = env::var("SUI_STATE_OBJECT_ID")
            .ok()
            .map(|value| {
                ObjectId::from_hex(&value)
                    .map_err(|e| SuiError::InvalidConfig(format!("SUI_STATE_OBJECT_ID: {e}")))
            })
            .transpose()?;

        let config = Self {
            package_id: env::var("SUI_PACKAGE_ID").ok(),
            state_object_id,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_package_id(mut self, package_id: String) -> Self {
        self.package_id = Some(package_id);
        self
    }

    pub fn with_state_object(mut self, id: ObjectId) -> Self {
        self.state_object_id = Some(id);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.package_id.as_deref() == Some("") {
            return Err(SuiError::InvalidConfig("Package ID cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Call builder for the configured deployment. Unset ids fall back to the
    /// emulator's fixed ones.
    pub fn contract(&self) -> Result<BattleshipContract> {
        self.validate()?;
        let local = BattleshipContract::local();
        Ok(BattleshipContract::new(
            self.package_id.clone().unwrap_or(local.package_id),
            self.state_object_id.unwrap_or(local.state_object),
        ))
    }
}

fn check_network(value: &str) -> Result<()> {
    let name = value.trim().to_lowercase();
    if LOCAL_NETWORKS.contains(&name.as_str()) {
        return Ok(());
    }
    Err(SuiError::InvalidConfig(format!(
        "Unsupported SUI_NETWORK: {value}. Only the local ledger is available"
    )))
}
