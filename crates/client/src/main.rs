//! Plays one battleship match between two local players.
//!
//! Environment (a `.env` file in the working directory is honoured):
//!
//! - `RUST_LOG`: tracing filter, e.g. `runtime=debug,client_blockchain_sui=debug`
//! - `SUI_NETWORK`: must be `local` if set
//! - `SUI_PACKAGE_ID`, `SUI_STATE_OBJECT_ID`: deployment ids of the emulated module
//! - `SUI_KEYSTORE_ENTRY`: host key (`base64(0x00 ‖ secret)`); generated if unset
//! - `BATTLESHIP_GUEST_KEYSTORE_ENTRY`: guest key; generated if unset
//! - `BATTLESHIP_BOARD_SEED`: seeds both fleet layouts for reproducible runs
//! - `ZK_ARTIFACTS_DIR` or `ZK_DEV_SETUP_SEED`: circuit key material
//! - `BATTLESHIP_POLL_INTERVAL_MS`, `BATTLESHIP_SUBMIT_RETRIES`,
//!   `BATTLESHIP_RETRY_BACKOFF_MS`: runtime tuning

use std::sync::Arc;

use anyhow::{Context, Result};
use battleship_client::{Client, PlayerSetup};
use client_blockchain_sui::{SignerKey, SuiConfig, keystore::KEYSTORE_ENV};
use runtime::{EnvKey, KeyProvider, RandomBoard, RuntimeConfig, SweepShots};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use zk::{CircuitArtifacts, ProofEngine};

const GUEST_KEY_ENV: &str = "BATTLESHIP_GUEST_KEYSTORE_ENTRY";
const BOARD_SEED_ENV: &str = "BATTLESHIP_BOARD_SEED";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    setup_logging();

    let runtime = RuntimeConfig::from_env();
    let sui = SuiConfig::from_env().context("Failed to load Sui configuration")?;
    tracing::info!(
        package = sui.package_id.as_deref().unwrap_or("default"),
        poll_ms = runtime.poll_interval.as_millis() as u64,
        retries = runtime.retry.max_retries,
        "Configuration loaded"
    );

    let source = runtime.artifacts.clone();
    let artifacts = tokio::task::spawn_blocking(move || source.load())
        .await
        .context("Artifact loading task panicked")?
        .context("Failed to load circuit artifacts")?;
    CircuitArtifacts::install(Arc::new(artifacts))?;
    let engine = ProofEngine::from_installed()?;

    let (host_boards, guest_boards) = match board_seed()? {
        Some(seed) => (RandomBoard::seeded(seed), RandomBoard::seeded(seed.wrapping_add(1))),
        None => (RandomBoard::from_entropy(), RandomBoard::from_entropy()),
    };

    let client = Client::builder()
        .runtime(runtime)
        .sui(sui)
        .engine(engine)
        .host(PlayerSetup {
            board: Box::new(host_boards),
            key: key_from_env_or_generate(KEYSTORE_ENV)?,
            shots: Box::new(SweepShots::default()),
        })
        .guest(PlayerSetup {
            board: Box::new(guest_boards),
            key: key_from_env_or_generate(GUEST_KEY_ENV)?,
            shots: Box::new(SweepShots::default()),
        })
        .build()?;

    let report = client.run().await?;
    let winner = report.host.winner;
    tracing::info!(
        game = %report.host.game,
        %winner,
        final_nonce = report.host.final_nonce,
        host_hits = report.host.hits_landed,
        guest_hits = report.guest.hits_landed,
        "Match finished"
    );
    println!("{winner} wins game {} at nonce {}", report.host.game, report.host.final_nonce);
    Ok(())
}

/// Logs go to stderr so stdout carries only the result line.
fn setup_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn key_from_env_or_generate(var: &str) -> Result<Box<dyn KeyProvider>> {
    if std::env::var_os(var).is_some() {
        let provider = EnvKey::new(var);
        // Surface malformed keys here instead of at the first call.
        provider
            .signer()
            .with_context(|| format!("Invalid key in {var}"))?;
        return Ok(Box::new(provider));
    }

    let key = SignerKey::generate(&mut rand::thread_rng());
    tracing::warn!(var, address = %key.address(), "No key configured; using an ephemeral one");
    Ok(Box::new(key))
}

fn board_seed() -> Result<Option<u64>> {
    match std::env::var(BOARD_SEED_ENV) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{BOARD_SEED_ENV} must be an unsigned integer")),
        Err(_) => Ok(None),
    }
}
