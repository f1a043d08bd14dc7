//! Runs one player's side of a game to completion.

use std::time::Duration;

use client_blockchain_core::GameId;
use game_core::{GameSession, Phase, PlayerRole, Shot};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::error::{Result, TurnError};
use crate::protocol::TurnProtocol;

/// How the player enters the game.
#[derive(Debug)]
pub enum Seat {
    /// Open a new game; optionally tell someone its id.
    Host {
        announce: Option<oneshot::Sender<GameId>>,
    },
    /// Join an open game.
    Guest { game: GameId },
}

/// Final state of a finished game from one player's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub game: GameId,
    pub role: PlayerRole,
    pub winner: PlayerRole,
    /// Nonce of the last shot of the game.
    pub final_nonce: u64,
    pub hits_landed: usize,
    pub hits_taken: usize,
}

impl GameOutcome {
    pub fn won(&self) -> bool {
        self.role == self.winner
    }
}

pub struct PlayerDriver {
    protocol: TurnProtocol,
    poll_interval: Duration,
    /// Consecutive desyncs or transient read failures tolerated.
    max_recoveries: u32,
}

impl PlayerDriver {
    pub fn new(protocol: TurnProtocol, config: &RuntimeConfig) -> Self {
        Self {
            protocol: protocol.with_retry(config.retry),
            poll_interval: config.poll_interval,
            max_recoveries: config.retry.max_retries,
        }
    }

    pub fn protocol(&self) -> &TurnProtocol {
        &self.protocol
    }

    /// Takes the seat, then polls the ledger and acts whenever the session
    /// says it is this player's move.
    pub async fn run(mut self, seat: Seat) -> Result<GameOutcome> {
        let role = self.protocol.role();
        let game = match seat {
            Seat::Host { announce } => {
                let game = self.protocol.new_game().await?;
                if let Some(tx) = announce {
                    if tx.send(game).is_err() {
                        debug!(%game, "Nobody is waiting for the game id");
                    }
                }
                game
            }
            Seat::Guest { game } => {
                self.protocol.join_game(game).await?;
                game
            }
        };

        let mut recoveries = 0;
        loop {
            let session = match self.fetch(game).await {
                Ok(session) => session,
                Err(err) if err.is_retriable() && recoveries < self.max_recoveries => {
                    recoveries += 1;
                    warn!(%game, error = %err, "Ledger read failed, polling again");
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if session.is_finished() {
                self.protocol.observe_finished();
                return outcome(game, role, &session);
            }

            if session.to_move() != Some(role) {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }

            match self.act(&session).await {
                Ok(()) => recoveries = 0,
                Err(err @ TurnError::Desync { .. }) if recoveries < self.max_recoveries => {
                    recoveries += 1;
                    warn!(%game, error = %err, "Desynchronized, re-reading the ledger");
                    let fresh = self.fetch(game).await?;
                    self.protocol.resync(&fresh);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn act(&mut self, session: &GameSession) -> Result<()> {
        if session.phase == Phase::AwaitingFirstTurn {
            self.protocol.first_turn().await?;
            return Ok(());
        }
        if let Some(pending) = session.pending_shot() {
            let outcome = self
                .protocol
                .respond(Shot::new(pending.nonce, pending.coord))
                .await?;
            debug!(?outcome, "Responded to shot");
        }
        Ok(())
    }

    async fn fetch(&self, game: GameId) -> Result<GameSession> {
        self.protocol
            .ledger()
            .query_game(game)
            .await?
            .map(|on_chain| on_chain.session)
            .ok_or(TurnError::UnknownGame(game))
    }
}

fn outcome(game: GameId, role: PlayerRole, session: &GameSession) -> Result<GameOutcome> {
    let winner = session.winner.ok_or(TurnError::OutOfOrder {
        action: "read outcome",
        phase: session.phase,
    })?;
    let outcome = GameOutcome {
        game,
        role,
        winner,
        final_nonce: session.turn_nonce,
        hits_landed: session.hits_on(role.opponent()),
        hits_taken: session.hits_on(role),
    };
    info!(
        %game,
        ?role,
        ?winner,
        final_nonce = outcome.final_nonce,
        "Game finished"
    );
    Ok(outcome)
}
