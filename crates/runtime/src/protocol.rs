//! Turn protocol state machine for one player.
//!
//! ```text
//! Created ──new_game──► AwaitingJoin            (host)
//! Created ──join_game─► AwaitingFirstTurn       (guest)
//! AwaitingFirstTurn ──first_turn──► InPlay      (host, nonce 1)
//! InPlay ──turn(nonce, hit, proof, next)──► InPlay
//! InPlay ──final_turn(nonce, proof)──► Finished (last ship cell hit)
//! ```
//!
//! Every step that carries a proof runs generate → verify locally → encode
//! → submit → await before the protocol's own bookkeeping advances. A
//! rejected or failed step leaves the protocol where it was, so the same
//! nonce can be proven and submitted again.

use std::collections::BTreeSet;
use std::sync::Arc;

use client_blockchain_core::{
    CallDescriptor, ExecutionResult, ExecutionStatus, GameId, LedgerGateway,
};
use client_blockchain_sui::{BattleshipContract, SignerKey};
use game_core::{Board, Coordinate, GameConfig, GameSession, Phase, PlayerRole, Shot};
use tracing::{debug, info, warn};
use zk::{CircuitInputs, commitment_bytes};

use crate::config::RetryPolicy;
use crate::error::{Result, TurnError};
use crate::providers::{BoardProvider, KeyProvider, ShotStrategy};
use crate::workers::ProverWorker;

const E_NONCE_MISMATCH: &str = "E_NONCE_MISMATCH";

/// Result of answering an opponent's shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Outcome proven and the next shot fired.
    Continued { reported: u64, hit: bool, fired: Shot },
    /// The last ship cell was hit; the game is over.
    Sunk { reported: u64 },
}

pub struct TurnProtocol {
    role: PlayerRole,
    board: Board,
    commitment: [u8; 32],
    signer: SignerKey,
    shots: Box<dyn ShotStrategy>,
    /// Shot drawn for a call that did not go through.
    unfired: Option<Coordinate>,
    ledger: Arc<dyn LedgerGateway>,
    contract: BattleshipContract,
    prover: ProverWorker,
    retry: RetryPolicy,

    game: Option<GameId>,
    phase: Phase,
    /// Highest nonce this player has seen accepted.
    nonce: u64,
    /// Own ship cells proven hit.
    sunk: BTreeSet<Coordinate>,
    /// Cells this player's accepted shots landed on.
    fired: BTreeSet<Coordinate>,
    /// Nonces of accepted responses, in submission order.
    answered: Vec<u64>,
}

impl TurnProtocol {
    /// Resolves the board and key up front. A malformed key or an invalid
    /// fleet fails here, before any ledger interaction.
    pub fn new(
        role: PlayerRole,
        boards: &dyn BoardProvider,
        keys: &dyn KeyProvider,
        shots: Box<dyn ShotStrategy>,
        ledger: Arc<dyn LedgerGateway>,
        contract: BattleshipContract,
        prover: ProverWorker,
    ) -> Result<Self> {
        let signer = keys.signer()?;
        let board = boards.board()?;
        board.validate()?;
        let commitment = commitment_bytes(&board);

        Ok(Self {
            role,
            board,
            commitment,
            signer,
            shots,
            unfired: None,
            ledger,
            contract,
            prover,
            retry: RetryPolicy::default(),
            game: None,
            phase: Phase::Created,
            nonce: 0,
            sunk: BTreeSet::new(),
            fired: BTreeSet::new(),
            answered: Vec::new(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn role(&self) -> PlayerRole {
        self.role
    }

    pub fn game(&self) -> Option<GameId> {
        self.game
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn commitment(&self) -> &[u8; 32] {
        &self.commitment
    }

    pub fn hits_taken(&self) -> usize {
        self.sunk.len()
    }

    pub fn sunk_cells(&self) -> &BTreeSet<Coordinate> {
        &self.sunk
    }

    pub fn answered(&self) -> &[u64] {
        &self.answered
    }

    pub fn signer(&self) -> &SignerKey {
        &self.signer
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerGateway> {
        &self.ledger
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// `Created → AwaitingJoin`. Host only.
    pub async fn new_game(&mut self) -> Result<GameId> {
        self.expect_role(PlayerRole::Host, "open a game")?;
        self.expect_phase(Phase::Created, "new_game")?;

        let proof = self.prover.prove(CircuitInputs::board(self.board.clone())).await?;
        let call = self.contract.new_game(&self.commitment, &proof)?;
        let result = self.submit(call).await?;
        let game = result.created_game().ok_or(TurnError::MissingGameId)?;

        self.game = Some(game);
        self.phase = Phase::AwaitingJoin;
        info!(%game, "Game opened");
        Ok(game)
    }

    /// `Created → AwaitingFirstTurn`. Guest only.
    pub async fn join_game(&mut self, game: GameId) -> Result<()> {
        self.expect_role(PlayerRole::Guest, "join a game")?;
        self.expect_phase(Phase::Created, "join_game")?;

        let proof = self.prover.prove(CircuitInputs::board(self.board.clone())).await?;
        let call = self.contract.join_game(game, &self.commitment, &proof)?;
        self.submit(call).await?;

        self.game = Some(game);
        self.phase = Phase::AwaitingFirstTurn;
        info!(%game, "Joined game");
        Ok(())
    }

    /// `AwaitingFirstTurn → InPlay`: the host fires shot #1. No proof.
    pub async fn first_turn(&mut self) -> Result<Shot> {
        self.expect_role(PlayerRole::Host, "fire the first shot")?;
        if !matches!(self.phase, Phase::AwaitingJoin | Phase::AwaitingFirstTurn) {
            return Err(TurnError::OutOfOrder {
                action: "first_turn",
                phase: self.phase,
            });
        }
        let game = self.game_id("first_turn")?;
        let coord = self.draw_shot()?;

        let call = self.contract.first_turn(game, coord)?;
        if let Err(err) = self.submit(call).await {
            self.unfired = Some(coord);
            return Err(err);
        }

        self.phase = Phase::InPlay;
        self.nonce = 1;
        self.fired.insert(coord);
        info!(%game, %coord, "Fired first shot");
        Ok(Shot::new(1, coord))
    }

    /// Answers `shot` truthfully from the private board.
    pub async fn respond(&mut self, shot: Shot) -> Result<TurnOutcome> {
        let hit = self.board.occupies(shot.coord);
        self.respond_with_claim(shot, hit).await
    }

    /// Answers `shot` with an explicit hit claim. A claim the board does not
    /// support fails in the prover with
    /// [`ProofError::ProvingFailure`](zk::ProofError::ProvingFailure) and
    /// nothing is submitted.
    ///
    /// Sends `turn` with the next pre-selected shot, or `final_turn` when the
    /// claim sinks the last ship cell.
    pub async fn respond_with_claim(&mut self, shot: Shot, hit: bool) -> Result<TurnOutcome> {
        // The guest learns of shot #1 only through the ledger.
        if !matches!(self.phase, Phase::InPlay | Phase::AwaitingFirstTurn) {
            return Err(TurnError::OutOfOrder {
                action: "turn",
                phase: self.phase,
            });
        }
        let game = self.game_id("turn")?;
        let expected = self.nonce + 1;
        if shot.nonce != expected {
            return Err(TurnError::Desync {
                expected,
                actual: shot.nonce,
            });
        }

        let sinks_fleet = hit
            && !self.sunk.contains(&shot.coord)
            && self.sunk.len() + 1 == GameConfig::TOTAL_SHIP_CELLS;
        let proof = self
            .prover
            .prove(CircuitInputs::shot(self.board.clone(), shot.coord, hit))
            .await?;

        if sinks_fleet {
            let call = self.contract.final_turn(game, shot.nonce, &proof)?;
            self.submit_turn(call, shot.nonce).await?;

            self.sunk.insert(shot.coord);
            self.nonce = shot.nonce;
            self.answered.push(shot.nonce);
            self.phase = Phase::Finished;
            info!(%game, nonce = shot.nonce, "Last ship sunk, sent final turn");
            return Ok(TurnOutcome::Sunk {
                reported: shot.nonce,
            });
        }

        let next = self.draw_shot()?;
        let call = self.contract.turn(game, shot.nonce, hit, &proof, next)?;
        if let Err(err) = self.submit_turn(call, shot.nonce).await {
            self.unfired = Some(next);
            return Err(err);
        }

        self.phase = Phase::InPlay;
        if hit {
            self.sunk.insert(shot.coord);
        }
        self.fired.insert(next);
        self.nonce = shot.nonce + 1;
        self.answered.push(shot.nonce);
        let fired = Shot::new(self.nonce, next);
        debug!(%game, reported = shot.nonce, hit, next = %next, "Turn accepted");
        Ok(TurnOutcome::Continued {
            reported: shot.nonce,
            hit,
            fired,
        })
    }

    /// Adopts the ledger's view after a [`TurnError::Desync`].
    pub fn resync(&mut self, session: &GameSession) {
        self.phase = session.phase;
        self.sunk = session.sunk_cells(self.role);
        self.fired = session.fired_by(self.role);
        self.nonce = match session.pending_shot() {
            Some(pending) if pending.shooter != self.role => pending.nonce - 1,
            _ => session.turn_nonce,
        };
        warn!(
            role = ?self.role,
            nonce = self.nonce,
            phase = ?self.phase,
            "Resynchronized with ledger"
        );
    }

    /// Marks the game finished after the opponent's final turn.
    pub(crate) fn observe_finished(&mut self) {
        self.phase = Phase::Finished;
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Signs once and submits, resending identical bytes on network errors
    /// within the retry policy.
    async fn submit(&self, call: CallDescriptor) -> Result<ExecutionResult> {
        let call = self.signer.sign(call)?;
        let function = call.function().to_string();
        let mut attempt = 0;

        loop {
            match self.ledger.call(call.clone()).await {
                Ok(result) if result.accepted => {
                    debug!(function = %function, tx = %result.digest, "Call accepted");
                    return Ok(result);
                }
                Ok(result) => {
                    let (code, message) = match result.status {
                        ExecutionStatus::Failure { code, message } => (code, message),
                        ExecutionStatus::Success => ("E_NOT_ACCEPTED".to_string(), String::new()),
                    };
                    warn!(function = %function, code = %code, reason = %message, "Call rejected");
                    return Err(TurnError::LedgerRejection {
                        function,
                        code,
                        message,
                    });
                }
                Err(err) if err.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    warn!(
                        function = %function,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient transport failure, resending"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// [`submit`](Self::submit), turning a ledger nonce mismatch into
    /// [`TurnError::Desync`].
    async fn submit_turn(&self, call: CallDescriptor, nonce: u64) -> Result<ExecutionResult> {
        match self.submit(call).await {
            Err(err) if err.rejection_code() == Some(E_NONCE_MISMATCH) => {
                let game = self.game_id("turn")?;
                let session = self
                    .ledger
                    .query_game(game)
                    .await?
                    .ok_or(TurnError::UnknownGame(game))?
                    .session;
                Err(TurnError::Desync {
                    expected: session.turn_nonce,
                    actual: nonce,
                })
            }
            other => other,
        }
    }

    /// Next shot in firing order, starting with one that never went out.
    /// Cells already fired at are skipped; the ledger rejects repeats.
    fn draw_shot(&mut self) -> Result<Coordinate> {
        if let Some(coord) = self.unfired.take() {
            return Ok(coord);
        }
        while let Some(coord) = self.shots.next_shot() {
            if !self.fired.contains(&coord) {
                return Ok(coord);
            }
            debug!(%coord, "Skipping cell already fired at");
        }
        Err(TurnError::ShotsExhausted)
    }

    fn game_id(&self, action: &'static str) -> Result<GameId> {
        self.game.ok_or(TurnError::OutOfOrder {
            action,
            phase: self.phase,
        })
    }

    fn expect_phase(&self, phase: Phase, action: &'static str) -> Result<()> {
        if self.phase != phase {
            return Err(TurnError::OutOfOrder {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn expect_role(&self, role: PlayerRole, action: &'static str) -> Result<()> {
        if self.role != role {
            return Err(TurnError::WrongRole {
                role: self.role,
                action,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for TurnProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnProtocol")
            .field("role", &self.role)
            .field("game", &self.game)
            .field("phase", &self.phase)
            .field("nonce", &self.nonce)
            .field("hits_taken", &self.sunk.len())
            .finish_non_exhaustive()
    }
}
