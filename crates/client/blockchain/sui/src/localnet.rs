//! In-process emulation of the deployed battleship module.
//!
//! [`LocalLedger`] executes calls the way the Move module does: authenticate
//! the sender by signature, decode the positional arguments, check every
//! proof against the circuit verifying keys and the public values the
//! session dictates, then apply the [`GameSession`] rules. Each call runs on
//! a copy of the game and only an accepted call is written back.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_blockchain_core::{
    Address, CallArg, CallDescriptor, ExecutionResult, GameId, LedgerEvent, LedgerGateway,
    OnChainGame, TransactionId, TransportError,
};
use game_core::{Coordinate, GameSession, PlayerRole, RuleError};
use zk::{CircuitKind, ProofEngine, encoded_len};

use crate::contracts::{BattleshipContract, BattleshipFunction};
use crate::keystore::verify_call;

const FIELD_BYTES: usize = 32;

/// Abort raised by the module. Becomes a rejected [`ExecutionResult`].
#[derive(Debug)]
struct Abort {
    code: &'static str,
    message: String,
}

impl Abort {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn bad_args(message: impl Into<String>) -> Self {
        Self::new("E_BAD_ARGUMENTS", message)
    }
}

impl From<RuleError> for Abort {
    fn from(err: RuleError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

type Execution = Result<Vec<LedgerEvent>, Abort>;

#[derive(Debug, Default)]
struct LedgerState {
    games: BTreeMap<u64, OnChainGame>,
    next_game: u64,
    sequence: u64,
}

/// Local ledger behind the [`LedgerGateway`] seam. Cloning shares state.
#[derive(Clone, Debug)]
pub struct LocalLedger {
    contract: BattleshipContract,
    engine: ProofEngine,
    state: Arc<Mutex<LedgerState>>,
}

impl LocalLedger {
    pub fn new(contract: BattleshipContract, engine: ProofEngine) -> Self {
        Self {
            contract,
            engine,
            state: Arc::new(Mutex::new(LedgerState::default())),
        }
    }

    pub fn contract(&self) -> &BattleshipContract {
        &self.contract
    }

    /// Number of games created so far.
    pub fn game_count(&self) -> Result<u64, TransportError> {
        Ok(self.lock()?.next_game)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LedgerState>, TransportError> {
        self.state
            .lock()
            .map_err(|_| TransportError::Backend("ledger state lock poisoned".to_string()))
    }

    fn execute(&self, state: &mut LedgerState, call: &CallDescriptor) -> Execution {
        let function = self
            .contract
            .parse_target(&call.target)
            .ok_or_else(|| Abort::new("E_UNKNOWN_FUNCTION", format!("no entry function {}", call.target)))?;

        match call.args.first().and_then(CallArg::as_object) {
            Some(id) if id == self.contract.state_object => {}
            _ => {
                return Err(Abort::new(
                    "E_WRONG_STATE_OBJECT",
                    format!("first argument must be the state object {}", self.contract.state_object),
                ));
            }
        }

        verify_call(call).map_err(|e| Abort::new("E_BAD_SIGNATURE", e))?;

        let args = Args::new(&call.args[1..]);
        match function {
            BattleshipFunction::NewGame => self.new_game(state, call.sender, args),
            BattleshipFunction::JoinGame => self.join_game(state, call.sender, args),
            BattleshipFunction::FirstTurn => self.first_turn(state, call.sender, args),
            BattleshipFunction::Turn => self.turn(state, call.sender, args),
            BattleshipFunction::FinalTurn => self.final_turn(state, call.sender, args),
        }
    }

    fn new_game(&self, state: &mut LedgerState, sender: Address, mut args: Args<'_>) -> Execution {
        let commitment = args.commitment()?;
        let proof: Vec<u8> = args.next()?;
        args.finish()?;

        self.check_board_proof(&commitment, &proof)?;

        let id = state.next_game;
        let mut session = GameSession::new(id);
        session.open(commitment)?;
        state.games.insert(
            id,
            OnChainGame {
                game: GameId(id),
                host: sender,
                guest: None,
                session,
            },
        );
        state.next_game += 1;

        Ok(vec![LedgerEvent::GameCreated {
            game: GameId(id),
            host: sender,
        }])
    }

    fn join_game(&self, state: &mut LedgerState, sender: Address, mut args: Args<'_>) -> Execution {
        let game_id: u64 = args.next()?;
        let commitment = args.commitment()?;
        let proof: Vec<u8> = args.next()?;
        args.finish()?;

        let game = game_mut(state, game_id)?;
        if game.host == sender {
            return Err(RuleError::SelfJoin.into());
        }
        let mut session = game.session.clone();
        session.join(commitment)?;
        self.check_board_proof(&commitment, &proof)?;

        game.session = session;
        game.guest = Some(sender);
        Ok(vec![LedgerEvent::GameJoined {
            game: GameId(game_id),
            guest: sender,
        }])
    }

    fn first_turn(&self, state: &mut LedgerState, sender: Address, mut args: Args<'_>) -> Execution {
        let game_id: u64 = args.next()?;
        let coord = args.coordinate()?;
        args.finish()?;

        let game = game_mut(state, game_id)?;
        let role = player_role(game, &sender)?;
        if role != PlayerRole::Host {
            return Err(RuleError::NotYourTurn(role).into());
        }
        let mut session = game.session.clone();
        let shot = session.first_turn(coord)?;

        game.session = session;
        Ok(vec![LedgerEvent::ShotFired {
            game: GameId(game_id),
            nonce: shot.nonce,
            shooter: role,
            coord,
        }])
    }

    fn turn(&self, state: &mut LedgerState, sender: Address, mut args: Args<'_>) -> Execution {
        let game_id: u64 = args.next()?;
        let nonce: u64 = args.next()?;
        let hit: bool = args.next()?;
        let proof: Vec<u8> = args.next()?;
        let next = args.coordinate()?;
        args.finish()?;

        let game = game_mut(state, game_id)?;
        let role = player_role(game, &sender)?;
        let mut session = game.session.clone();
        let target = pending_target(&session);
        session.report(role, nonce, hit)?;
        let shot = session.fire(role, next)?;
        self.check_shot_proof(&session, role, target, hit, &proof)?;

        game.session = session;
        Ok(vec![
            LedgerEvent::ShotReported {
                game: GameId(game_id),
                nonce,
                reporter: role,
                hit,
            },
            LedgerEvent::ShotFired {
                game: GameId(game_id),
                nonce: shot.nonce,
                shooter: role,
                coord: next,
            },
        ])
    }

    fn final_turn(&self, state: &mut LedgerState, sender: Address, mut args: Args<'_>) -> Execution {
        let game_id: u64 = args.next()?;
        let nonce: u64 = args.next()?;
        let proof: Vec<u8> = args.next()?;
        args.finish()?;

        let game = game_mut(state, game_id)?;
        let role = player_role(game, &sender)?;
        let mut session = game.session.clone();
        let target = pending_target(&session);
        session.report(role, nonce, true)?;
        if !session.is_finished() {
            return Err(RuleError::GameNotOver {
                role,
                remaining: session.remaining_cells(role),
            }
            .into());
        }
        self.check_shot_proof(&session, role, target, true, &proof)?;

        let winner = role.opponent();
        game.session = session;
        Ok(vec![
            LedgerEvent::ShotReported {
                game: GameId(game_id),
                nonce,
                reporter: role,
                hit: true,
            },
            LedgerEvent::GameFinished {
                game: GameId(game_id),
                winner,
            },
        ])
    }

    fn check_board_proof(&self, commitment: &[u8; 32], proof: &[u8]) -> Result<(), Abort> {
        self.check_proof(CircuitKind::Board, commitment.to_vec(), proof)
    }

    /// Public values of a shot proof come from the ledger, never the caller:
    /// the reporter's commitment and the coordinates of the shot it answers.
    fn check_shot_proof(
        &self,
        session: &GameSession,
        reporter: PlayerRole,
        target: Option<Coordinate>,
        hit: bool,
        proof: &[u8],
    ) -> Result<(), Abort> {
        let commitment = session
            .commitment_of(reporter)
            .ok_or_else(|| Abort::new("E_NO_COMMITMENT", format!("{reporter:?} has no commitment")))?;
        let target = target.ok_or_else(|| Abort::new("E_NO_PENDING_SHOT", "no shot to answer"))?;

        let mut signals = commitment.to_vec();
        for value in [target.x, target.y, u8::from(hit)] {
            signals.extend(scalar_bytes(value));
        }
        self.check_proof(CircuitKind::Shot, signals, proof)
    }

    fn check_proof(&self, circuit: CircuitKind, signals: Vec<u8>, proof: &[u8]) -> Result<(), Abort> {
        let expected = encoded_len(circuit);
        if proof.len() != expected {
            return Err(Abort::new(
                "E_INVALID_PROOF",
                format!("{circuit} proof must be {expected} bytes, got {}", proof.len()),
            ));
        }
        if proof[expected - signals.len()..] != signals[..] {
            return Err(Abort::new(
                "E_INVALID_PROOF",
                format!("{circuit} proof public signals do not match the session"),
            ));
        }

        match self.engine.verify_encoded(circuit, proof) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Abort::new(
                "E_INVALID_PROOF",
                format!("{circuit} proof failed verification"),
            )),
            Err(e) => Err(Abort::new("E_INVALID_PROOF", e.to_string())),
        }
    }
}

#[async_trait]
impl LedgerGateway for LocalLedger {
    async fn call(&self, call: CallDescriptor) -> Result<ExecutionResult, TransportError> {
        let mut state = self.lock()?;
        state.sequence += 1;
        let digest = TransactionId::from_bytes(state.sequence.to_be_bytes().to_vec());

        match self.execute(&mut state, &call) {
            Ok(events) => {
                tracing::info!(
                    function = call.function(),
                    sender = %call.sender,
                    tx = %digest,
                    events = events.len(),
                    "Call accepted"
                );
                Ok(ExecutionResult::success(digest, events))
            }
            Err(abort) => {
                tracing::warn!(
                    function = call.function(),
                    sender = %call.sender,
                    code = abort.code,
                    reason = %abort.message,
                    "Call aborted"
                );
                Ok(ExecutionResult::rejected(digest, abort.code, abort.message))
            }
        }
    }

    async fn query_game(&self, game: GameId) -> Result<Option<OnChainGame>, TransportError> {
        Ok(self.lock()?.games.get(&game.0).cloned())
    }
}

fn game_mut(state: &mut LedgerState, id: u64) -> Result<&mut OnChainGame, Abort> {
    state
        .games
        .get_mut(&id)
        .ok_or_else(|| Abort::new("E_UNKNOWN_GAME", format!("game #{id} does not exist")))
}

fn player_role(game: &OnChainGame, sender: &Address) -> Result<PlayerRole, Abort> {
    game.role_of(sender)
        .ok_or_else(|| Abort::new("E_NOT_A_PLAYER", format!("{sender} is not seated in game {}", game.game)))
}

fn pending_target(session: &GameSession) -> Option<Coordinate> {
    session.pending_shot().map(|record| record.coord)
}

fn scalar_bytes(value: u8) -> [u8; FIELD_BYTES] {
    let mut bytes = [0u8; FIELD_BYTES];
    bytes[FIELD_BYTES - 1] = value;
    bytes
}

/// Positional argument cursor.
struct Args<'a> {
    args: &'a [CallArg],
    position: usize,
}

impl<'a> Args<'a> {
    fn new(args: &'a [CallArg]) -> Self {
        Self { args, position: 0 }
    }

    fn next<T: serde::de::DeserializeOwned>(&mut self) -> Result<T, Abort> {
        let arg = self
            .args
            .get(self.position)
            .ok_or_else(|| Abort::bad_args(format!("missing argument {}", self.position + 1)))?;
        self.position += 1;
        arg.decode_pure()
            .map_err(|e| Abort::bad_args(format!("argument {}: {e}", self.position)))
    }

    fn commitment(&mut self) -> Result<[u8; 32], Abort> {
        let bytes: Vec<u8> = self.next()?;
        bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| Abort::bad_args(format!("commitment must be 32 bytes, got {}", bytes.len())))
    }

    fn coordinate(&mut self) -> Result<Coordinate, Abort> {
        Ok(Coordinate::new(self.next()?, self.next()?))
    }

    fn finish(self) -> Result<(), Abort> {
        if self.position != self.args.len() {
            return Err(Abort::bad_args(format!(
                "expected {} arguments, got {}",
                self.position,
                self.args.len()
            )));
        }
        Ok(())
    }
}
