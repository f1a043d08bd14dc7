//! Runtime configuration structures and loaders.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use zk::{CircuitArtifacts, ProofError};

/// Where circuit keys come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Directory holding `board.zkey` and `shot.zkey`.
    Directory(PathBuf),
    /// Seeded local setup. Development only.
    DevSetup { seed: u64 },
}

impl ArtifactSource {
    pub const DEFAULT_DEV_SEED: u64 = 7;

    pub fn load(&self) -> Result<CircuitArtifacts, ProofError> {
        match self {
            Self::Directory(dir) => CircuitArtifacts::load_dir(dir),
            Self::DevSetup { seed } => CircuitArtifacts::dev_setup(*seed),
        }
    }
}

impl Default for ArtifactSource {
    fn default() -> Self {
        Self::DevSetup {
            seed: Self::DEFAULT_DEV_SEED,
        }
    }
}

/// Bounded resend policy for transient transport failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first resend; doubles on each further attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before resend number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

/// Configuration shared by every player task in a process.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// How often a waiting player re-reads the ledger.
    pub poll_interval: Duration,
    pub retry: RetryPolicy,
    pub artifacts: ArtifactSource,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            retry: RetryPolicy::default(),
            artifacts: ArtifactSource::default(),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `BATTLESHIP_POLL_INTERVAL_MS`
    /// - `BATTLESHIP_SUBMIT_RETRIES`
    /// - `BATTLESHIP_RETRY_BACKOFF_MS`
    /// - `ZK_ARTIFACTS_DIR` (takes precedence over the dev setup)
    /// - `ZK_DEV_SETUP_SEED`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("BATTLESHIP_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms.max(1));
        }

        if let Some(retries) = read_env::<u32>("BATTLESHIP_SUBMIT_RETRIES") {
            config.retry.max_retries = retries;
        }

        if let Some(ms) = read_env::<u64>("BATTLESHIP_RETRY_BACKOFF_MS") {
            config.retry.backoff = Duration::from_millis(ms);
        }

        if let Some(dir) = read_env::<PathBuf>("ZK_ARTIFACTS_DIR") {
            config.artifacts = ArtifactSource::Directory(dir);
        } else if let Some(seed) = read_env::<u64>("ZK_DEV_SETUP_SEED") {
            config.artifacts = ArtifactSource::DevSetup { seed };
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
