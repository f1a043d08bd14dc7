//! Game session state and the turn rules applied to it.
//!
//! The authoritative [`GameSession`] lives on the ledger; the rules engine
//! there is the only caller of the mutating methods. Players hold a read
//! projection of the same type and use the query helpers
//! ([`GameSession::to_move`], [`GameSession::pending_shot`]) to decide their
//! next action.
//!
//! # Turn sequence
//!
//! ```text
//! new_game      host commits              AwaitingJoin
//! join_game     guest commits             AwaitingFirstTurn
//! first_turn    host fires shot #1        InPlay
//! turn          guest reports #1, fires #2
//! turn          host reports #2, fires #3
//! ...
//! final_turn    loser reports the hit that sinks its last cell  Finished
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::board::Coordinate;
use crate::config::GameConfig;
use crate::error::RuleError;

/// Session lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Created,
    AwaitingJoin,
    AwaitingFirstTurn,
    InPlay,
    Finished,
}

/// Which seat a player occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerRole {
    Host,
    Guest,
}

impl PlayerRole {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Host => Self::Guest,
            Self::Guest => Self::Host,
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Host => "host",
            Self::Guest => "guest",
        })
    }
}

/// A fired shot, identified by its position in the shot sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shot {
    /// 1-based index in the alternating shot sequence.
    pub nonce: u64,
    pub coord: Coordinate,
}

impl Shot {
    pub const fn new(nonce: u64, coord: Coordinate) -> Self {
        Self { nonce, coord }
    }
}

/// One entry of the session shot log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotRecord {
    pub nonce: u64,
    pub shooter: PlayerRole,
    pub coord: Coordinate,
    /// `None` until the target proves the outcome.
    pub hit: Option<bool>,
}

/// Game session as seen by the rules engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSession {
    pub id: u64,
    pub phase: Phase,
    pub host_commitment: Option<[u8; 32]>,
    pub guest_commitment: Option<[u8; 32]>,
    /// Nonce of the latest fired shot (0 before the first turn).
    pub turn_nonce: u64,
    pub shot_log: Vec<ShotRecord>,
    pub winner: Option<PlayerRole>,
}

impl GameSession {
    /// Session in the `Created` phase, before the host's commitment lands.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            phase: Phase::Created,
            host_commitment: None,
            guest_commitment: None,
            turn_nonce: 0,
            shot_log: Vec::new(),
            winner: None,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Player expected to submit the next call, if any.
    pub fn to_move(&self) -> Option<PlayerRole> {
        match self.phase {
            Phase::AwaitingJoin => Some(PlayerRole::Guest),
            Phase::AwaitingFirstTurn => Some(PlayerRole::Host),
            Phase::InPlay => self.pending_shot().map(|record| record.shooter.opponent()),
            Phase::Created | Phase::Finished => None,
        }
    }

    /// The latest shot, still awaiting its outcome proof.
    pub fn pending_shot(&self) -> Option<&ShotRecord> {
        self.shot_log
            .last()
            .filter(|record| record.hit.is_none() && record.nonce == self.turn_nonce)
    }

    /// Distinct cells of `target`'s board proven hit.
    pub fn sunk_cells(&self, target: PlayerRole) -> BTreeSet<Coordinate> {
        self.shot_log
            .iter()
            .filter(|record| record.shooter == target.opponent() && record.hit == Some(true))
            .map(|record| record.coord)
            .collect()
    }

    /// Cells `shooter` has fired at so far.
    pub fn fired_by(&self, shooter: PlayerRole) -> BTreeSet<Coordinate> {
        self.shot_log
            .iter()
            .filter(|record| record.shooter == shooter)
            .map(|record| record.coord)
            .collect()
    }

    /// Proven hits landed on `target`'s board, one per ship cell.
    pub fn hits_on(&self, target: PlayerRole) -> usize {
        self.sunk_cells(target).len()
    }

    /// Unsunk ship cells left on `target`'s board.
    pub fn remaining_cells(&self, target: PlayerRole) -> usize {
        GameConfig::TOTAL_SHIP_CELLS.saturating_sub(self.hits_on(target))
    }

    pub fn commitment_of(&self, role: PlayerRole) -> Option<[u8; 32]> {
        match role {
            PlayerRole::Host => self.host_commitment,
            PlayerRole::Guest => self.guest_commitment,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// `Created → AwaitingJoin`.
    pub fn open(&mut self, host_commitment: [u8; 32]) -> Result<(), RuleError> {
        self.expect_phase(Phase::Created)?;
        self.host_commitment = Some(host_commitment);
        self.phase = Phase::AwaitingJoin;
        Ok(())
    }

    /// `AwaitingJoin → AwaitingFirstTurn`.
    pub fn join(&mut self, guest_commitment: [u8; 32]) -> Result<(), RuleError> {
        self.expect_phase(Phase::AwaitingJoin)?;
        self.guest_commitment = Some(guest_commitment);
        self.phase = Phase::AwaitingFirstTurn;
        Ok(())
    }

    /// `AwaitingFirstTurn → InPlay`; the host fires shot #1.
    pub fn first_turn(&mut self, coord: Coordinate) -> Result<Shot, RuleError> {
        self.expect_phase(Phase::AwaitingFirstTurn)?;
        check_shot(coord)?;
        self.phase = Phase::InPlay;
        Ok(self.push_shot(PlayerRole::Host, coord))
    }

    /// Records `reporter`'s proven outcome for shot `nonce`. Finishes the
    /// game when the reporter's last ship cell is hit.
    pub fn report(&mut self, reporter: PlayerRole, nonce: u64, hit: bool) -> Result<(), RuleError> {
        self.expect_phase(Phase::InPlay)?;
        if self.to_move() != Some(reporter) {
            return Err(RuleError::NotYourTurn(reporter));
        }
        if nonce != self.turn_nonce {
            return Err(RuleError::NonceMismatch {
                expected: self.turn_nonce,
                actual: nonce,
            });
        }

        if let Some(record) = self.shot_log.last_mut() {
            record.hit = Some(hit);
        }

        if self.remaining_cells(reporter) == 0 {
            self.phase = Phase::Finished;
            self.winner = Some(reporter.opponent());
        }
        Ok(())
    }

    /// Reporter fires the next shot after a report.
    pub fn fire(&mut self, shooter: PlayerRole, coord: Coordinate) -> Result<Shot, RuleError> {
        self.expect_phase(Phase::InPlay)?;
        check_shot(coord)?;
        if self.pending_shot().is_some() || self.to_move().is_some() {
            // The pending shot must be reported before firing back.
            return Err(RuleError::NotYourTurn(shooter));
        }
        match self.shot_log.last() {
            Some(last) if last.shooter == shooter.opponent() => {}
            _ => return Err(RuleError::NotYourTurn(shooter)),
        }
        if self
            .shot_log
            .iter()
            .any(|record| record.shooter == shooter && record.coord == coord)
        {
            return Err(RuleError::AlreadyShot { shooter, coord });
        }
        Ok(self.push_shot(shooter, coord))
    }

    fn push_shot(&mut self, shooter: PlayerRole, coord: Coordinate) -> Shot {
        self.turn_nonce += 1;
        self.shot_log.push(ShotRecord {
            nonce: self.turn_nonce,
            shooter,
            coord,
            hit: None,
        });
        Shot::new(self.turn_nonce, coord)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), RuleError> {
        if self.phase != expected {
            return Err(RuleError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}

fn check_shot(coord: Coordinate) -> Result<(), RuleError> {
    if !coord.in_bounds() {
        return Err(RuleError::ShotOutOfBounds(coord));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_play() -> GameSession {
        let mut session = GameSession::new(0);
        session.open([1; 32]).unwrap();
        session.join([2; 32]).unwrap();
        session.first_turn(Coordinate::new(0, 0)).unwrap();
        session
    }

    #[test]
    fn lifecycle_advances_phases() {
        let mut session = GameSession::new(3);
        assert_eq!(session.to_move(), None);

        session.open([1; 32]).unwrap();
        assert_eq!(session.phase, Phase::AwaitingJoin);
        assert_eq!(session.to_move(), Some(PlayerRole::Guest));

        session.join([2; 32]).unwrap();
        assert_eq!(session.to_move(), Some(PlayerRole::Host));

        let shot = session.first_turn(Coordinate::new(4, 4)).unwrap();
        assert_eq!(shot.nonce, 1);
        assert_eq!(session.phase, Phase::InPlay);
        assert_eq!(session.to_move(), Some(PlayerRole::Guest));
    }

    #[test]
    fn report_then_fire_alternates() {
        let mut session = in_play();
        session.report(PlayerRole::Guest, 1, false).unwrap();
        let shot = session.fire(PlayerRole::Guest, Coordinate::new(9, 9)).unwrap();
        assert_eq!(shot.nonce, 2);
        assert_eq!(session.to_move(), Some(PlayerRole::Host));
        assert_eq!(session.pending_shot().map(|r| r.shooter), Some(PlayerRole::Guest));
    }

    #[test]
    fn wrong_nonce_is_rejected() {
        let mut session = in_play();
        assert_eq!(
            session.report(PlayerRole::Guest, 2, true),
            Err(RuleError::NonceMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn wrong_player_is_rejected() {
        let mut session = in_play();
        assert_eq!(
            session.report(PlayerRole::Host, 1, true),
            Err(RuleError::NotYourTurn(PlayerRole::Host))
        );
    }

    #[test]
    fn cannot_fire_before_reporting() {
        let mut session = in_play();
        assert!(session.fire(PlayerRole::Guest, Coordinate::new(1, 1)).is_err());
    }

    #[test]
    fn repeated_shot_at_same_cell_is_rejected() {
        let mut session = in_play();
        session.report(PlayerRole::Guest, 1, true).unwrap();
        session.fire(PlayerRole::Guest, Coordinate::new(9, 9)).unwrap();
        session.report(PlayerRole::Host, 2, false).unwrap();

        let before = session.clone();
        assert_eq!(
            session.fire(PlayerRole::Host, Coordinate::new(0, 0)),
            Err(RuleError::AlreadyShot {
                shooter: PlayerRole::Host,
                coord: Coordinate::new(0, 0)
            })
        );
        assert_eq!(session, before);

        // The opponent's earlier target is still open to this shooter.
        assert!(session.fire(PlayerRole::Host, Coordinate::new(9, 9)).is_ok());
    }

    #[test]
    fn repeated_hits_on_one_cell_count_once() {
        let mut session = in_play();
        session.report(PlayerRole::Guest, 1, true).unwrap();
        // A log carrying the same hit cell many times still sinks one cell.
        for nonce in 2..=GameConfig::TOTAL_SHIP_CELLS as u64 {
            session.shot_log.push(ShotRecord {
                nonce,
                shooter: PlayerRole::Host,
                coord: Coordinate::new(0, 0),
                hit: Some(true),
            });
        }
        assert_eq!(session.hits_on(PlayerRole::Guest), 1);
        assert_eq!(
            session.remaining_cells(PlayerRole::Guest),
            GameConfig::TOTAL_SHIP_CELLS - 1
        );
        assert_eq!(session.fired_by(PlayerRole::Host).len(), 1);
    }

    #[test]
    fn last_hit_finishes_game() {
        let cell = |i: u8| Coordinate::new(i % 10, i / 10);
        let mut session = in_play();
        for i in 1..=GameConfig::TOTAL_SHIP_CELLS as u8 {
            let nonce = session.turn_nonce;
            session.report(PlayerRole::Guest, nonce, true).unwrap();
            if session.is_finished() {
                assert_eq!(i as usize, GameConfig::TOTAL_SHIP_CELLS);
                break;
            }
            session.fire(PlayerRole::Guest, cell(99 - i)).unwrap();
            let nonce = session.turn_nonce;
            session.report(PlayerRole::Host, nonce, false).unwrap();
            session.fire(PlayerRole::Host, cell(i)).unwrap();
        }
        assert_eq!(session.winner, Some(PlayerRole::Host));
        assert_eq!(session.turn_nonce, 33);
        assert_eq!(session.to_move(), None);
    }
}
