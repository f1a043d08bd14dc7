//! Local match client: two players, one in-process ledger.
//!
//! # Architecture
//!
//! ```text
//! Client
//!   ├─→ LocalLedger (battleship module emulation, verifies every proof)
//!   ├─→ host  PlayerDriver ─► TurnProtocol ─► ProverWorker
//!   └─→ guest PlayerDriver ─► TurnProtocol ─► ProverWorker
//! ```
//!
//! Each player runs as its own tokio task; they share nothing but the
//! ledger. The host announces the game id once the ledger accepts
//! `new_game`, and the guest joins it.

use std::sync::Arc;

use anyhow::{Context, Result};
use client_blockchain_core::LedgerGateway;
use client_blockchain_sui::{LocalLedger, SuiConfig};
use game_core::PlayerRole;
use runtime::{
    BoardProvider, GameOutcome, KeyProvider, PlayerDriver, ProverWorker, RuntimeConfig, Seat,
    ShotStrategy, TurnProtocol,
};
use tokio::sync::oneshot;
use zk::ProofEngine;

/// Injected inputs of one player.
pub struct PlayerSetup {
    pub board: Box<dyn BoardProvider>,
    pub key: Box<dyn KeyProvider>,
    pub shots: Box<dyn ShotStrategy>,
}

/// Outcomes of both sides of a finished match.
#[derive(Clone, Copy, Debug)]
pub struct MatchReport {
    pub host: GameOutcome,
    pub guest: GameOutcome,
}

pub struct Client {
    runtime: RuntimeConfig,
    ledger: LocalLedger,
    prover: ProverWorker,
    host: PlayerSetup,
    guest: PlayerSetup,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn ledger(&self) -> &LocalLedger {
        &self.ledger
    }

    /// Plays one match to the end.
    pub async fn run(self) -> Result<MatchReport> {
        let ledger: Arc<dyn LedgerGateway> = Arc::new(self.ledger.clone());
        let contract = self.ledger.contract().clone();

        let host = player(
            PlayerRole::Host,
            self.host,
            Arc::clone(&ledger),
            contract.clone(),
            self.prover.clone(),
        )
        .context("Failed to set up host")?;
        let guest = player(
            PlayerRole::Guest,
            self.guest,
            Arc::clone(&ledger),
            contract,
            self.prover.clone(),
        )
        .context("Failed to set up guest")?;

        let (announce, game_id) = oneshot::channel();
        let host_task = tokio::spawn(PlayerDriver::new(host, &self.runtime).run(Seat::Host {
            announce: Some(announce),
        }));

        let game = match game_id.await {
            Ok(game) => game,
            Err(_) => {
                // The host gave up before opening a game; surface its error.
                let outcome = host_task.await.context("Host task panicked")?;
                outcome.context("Host failed to open a game")?;
                anyhow::bail!("host finished without announcing a game");
            }
        };
        tracing::info!(%game, "Guest joining");

        let guest_task = tokio::spawn(PlayerDriver::new(guest, &self.runtime).run(Seat::Guest { game }));

        let host = host_task
            .await
            .context("Host task panicked")?
            .context("Host driver failed")?;
        let guest = guest_task
            .await
            .context("Guest task panicked")?
            .context("Guest driver failed")?;

        let metrics = self.prover.metrics();
        tracing::info!(
            proofs = metrics.generated(),
            failed = metrics.failed(),
            avg_ms = metrics.average_proving_time().map(|d| d.as_millis() as u64),
            "Prover statistics"
        );
        Ok(MatchReport { host, guest })
    }
}

fn player(
    role: PlayerRole,
    setup: PlayerSetup,
    ledger: Arc<dyn LedgerGateway>,
    contract: client_blockchain_sui::BattleshipContract,
    prover: ProverWorker,
) -> Result<TurnProtocol> {
    Ok(TurnProtocol::new(
        role,
        setup.board.as_ref(),
        setup.key.as_ref(),
        setup.shots,
        ledger,
        contract,
        prover,
    )?)
}

/// Builder for constructing a [`Client`] with validation.
#[derive(Default)]
pub struct ClientBuilder {
    runtime: Option<RuntimeConfig>,
    sui: Option<SuiConfig>,
    engine: Option<ProofEngine>,
    host: Option<PlayerSetup>,
    guest: Option<PlayerSetup>,
}

impl ClientBuilder {
    pub fn runtime(mut self, config: RuntimeConfig) -> Self {
        self.runtime = Some(config);
        self
    }

    pub fn sui(mut self, config: SuiConfig) -> Self {
        self.sui = Some(config);
        self
    }

    /// Proof engine shared by both players and the ledger (required).
    pub fn engine(mut self, engine: ProofEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn host(mut self, setup: PlayerSetup) -> Self {
        self.host = Some(setup);
        self
    }

    pub fn guest(mut self, setup: PlayerSetup) -> Self {
        self.guest = Some(setup);
        self
    }

    /// # Errors
    ///
    /// Fails if the engine or either player is missing, or if the Sui
    /// configuration is invalid.
    pub fn build(self) -> Result<Client> {
        let engine = self
            .engine
            .context("Proof engine is required. Use .engine() to set it.")?;
        let host = self.host.context("Host setup is required. Use .host() to set it.")?;
        let guest = self
            .guest
            .context("Guest setup is required. Use .guest() to set it.")?;
        let sui = self.sui.unwrap_or_default();
        let contract = sui.contract().context("Invalid Sui configuration")?;

        Ok(Client {
            runtime: self.runtime.unwrap_or_default(),
            ledger: LocalLedger::new(contract, engine.clone()),
            prover: ProverWorker::new(engine),
            host,
            guest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_blockchain_sui::SignerKey;
    use runtime::{FixedBoard, SweepShots};
    use zk::test_helpers::{host_board, test_engine};

    fn setup() -> PlayerSetup {
        PlayerSetup {
            board: Box::new(FixedBoard(host_board())),
            key: Box::new(SignerKey::from_secret([1; 32])),
            shots: Box::new(SweepShots::default()),
        }
    }

    #[test]
    fn build_requires_engine_and_both_players() {
        let err = Client::builder().host(setup()).guest(setup()).build().err().unwrap();
        assert!(err.to_string().contains("Proof engine is required"));

        let err = Client::builder()
            .engine(test_engine())
            .host(setup())
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("Guest setup is required"));
    }

    #[test]
    fn invalid_deployment_is_rejected() {
        let err = Client::builder()
            .engine(test_engine())
            .host(setup())
            .guest(setup())
            .sui(SuiConfig::default().with_package_id(String::new()))
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid Sui configuration"));
    }
}
