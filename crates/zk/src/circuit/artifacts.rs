//! Per-circuit Groth16 key material.
//!
//! Artifacts are read-only inputs supplied by the deployment: a directory
//! holding `board.zkey` and `shot.zkey` (the [`Groth16Keys::to_bytes`]
//! layout). Development and tests use a seeded local setup instead.
//!
//! A process installs its artifacts once with [`CircuitArtifacts::install`];
//! everything that needs the keys afterwards goes through
//! [`CircuitArtifacts::global`].

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use ark_bn254::Bn254;
use ark_groth16::{PreparedVerifyingKey, VerifyingKey};
use ark_std::rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::BattleshipCircuit;
use super::groth16::{Groth16Keys, prepare_verifying_key, serialize_verifying_key};
use crate::prover::{CircuitKind, ProofError};

static INSTALLED: OnceLock<Arc<CircuitArtifacts>> = OnceLock::new();

/// Keys for one circuit plus the prepared verifying key.
#[derive(Clone)]
pub struct CircuitKeys {
    pub keys: Groth16Keys,
    pub prepared: PreparedVerifyingKey<Bn254>,
}

impl CircuitKeys {
    pub fn new(keys: Groth16Keys) -> Self {
        let prepared = prepare_verifying_key(&keys.verifying_key);
        Self { keys, prepared }
    }
}

/// Board and shot circuit keys.
#[derive(Clone)]
pub struct CircuitArtifacts {
    board: CircuitKeys,
    shot: CircuitKeys,
}

impl CircuitArtifacts {
    pub fn new(board: Groth16Keys, shot: Groth16Keys) -> Self {
        Self {
            board: CircuitKeys::new(board),
            shot: CircuitKeys::new(shot),
        }
    }

    /// Circuit-specific setup for both circuits.
    pub fn setup<R: RngCore>(rng: &mut R) -> Result<Self, ProofError> {
        let board = Groth16Keys::generate(BattleshipCircuit::template(CircuitKind::Board), rng)?;
        let shot = Groth16Keys::generate(BattleshipCircuit::template(CircuitKind::Shot), rng)?;
        Ok(Self::new(board, shot))
    }

    /// Reproducible setup. The toxic waste is derivable from `seed`, so keys
    /// made this way are only fit for development.
    pub fn dev_setup(seed: u64) -> Result<Self, ProofError> {
        tracing::info!(seed, "Running development circuit setup");
        Self::setup(&mut StdRng::seed_from_u64(seed))
    }

    pub fn file_name(kind: CircuitKind) -> String {
        format!("{}.zkey", kind.name())
    }

    /// Loads `board.zkey` and `shot.zkey` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, ProofError> {
        let load = |kind: CircuitKind| -> Result<Groth16Keys, ProofError> {
            let path = dir.join(Self::file_name(kind));
            if !path.is_file() {
                return Err(ProofError::MissingArtifacts(kind));
            }
            Groth16Keys::from_bytes(&fs::read(&path)?)
        };

        let artifacts = Self::new(load(CircuitKind::Board)?, load(CircuitKind::Shot)?);
        tracing::info!(dir = %dir.display(), "Loaded circuit artifacts");
        Ok(artifacts)
    }

    /// Writes both key files into `dir`, creating it if needed.
    pub fn save_dir(&self, dir: &Path) -> Result<(), ProofError> {
        fs::create_dir_all(dir)?;
        for kind in CircuitKind::ALL {
            fs::write(dir.join(Self::file_name(kind)), self.keys(kind).to_bytes()?)?;
        }
        Ok(())
    }

    fn entry(&self, kind: CircuitKind) -> &CircuitKeys {
        match kind {
            CircuitKind::Board => &self.board,
            CircuitKind::Shot => &self.shot,
        }
    }

    pub fn keys(&self, kind: CircuitKind) -> &Groth16Keys {
        &self.entry(kind).keys
    }

    pub fn verifying_key(&self, kind: CircuitKind) -> &VerifyingKey<Bn254> {
        &self.entry(kind).keys.verifying_key
    }

    pub fn prepared_verifying_key(&self, kind: CircuitKind) -> &PreparedVerifyingKey<Bn254> {
        &self.entry(kind).prepared
    }

    /// Compressed verifying key, the form a ledger stores.
    pub fn verifying_key_bytes(&self, kind: CircuitKind) -> Result<Vec<u8>, ProofError> {
        serialize_verifying_key(self.verifying_key(kind))
    }

    /// Makes `artifacts` the process-wide set. Fails if one is installed.
    pub fn install(artifacts: Arc<Self>) -> Result<Arc<Self>, ProofError> {
        INSTALLED
            .set(Arc::clone(&artifacts))
            .map_err(|_| ProofError::ArtifactsAlreadyInstalled)?;
        tracing::debug!("Installed circuit artifacts");
        Ok(artifacts)
    }

    pub fn global() -> Result<Arc<Self>, ProofError> {
        INSTALLED.get().cloned().ok_or(ProofError::ArtifactsNotInstalled)
    }

    pub fn is_installed() -> bool {
        INSTALLED.get().is_some()
    }
}

impl fmt::Debug for CircuitArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitArtifacts")
            .field("board_public_inputs", &(self.board.keys.verifying_key.gamma_abc_g1.len().saturating_sub(1)))
            .field("shot_public_inputs", &(self.shot.keys.verifying_key.gamma_abc_g1.len().saturating_sub(1)))
            .finish()
    }
}
