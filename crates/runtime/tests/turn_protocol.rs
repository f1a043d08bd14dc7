//! Single-step protocol behavior: key checks, false claims, nonce
//! bookkeeping, resend policy.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use client_blockchain_core::{
    Address, CallDescriptor, ExecutionResult, GameId, LedgerEvent, LedgerGateway, OnChainGame,
    TransactionId, TransportError,
};
use client_blockchain_sui::{BattleshipContract, KeyFormatError};
use game_core::{GameSession, Phase, PlayerRole, Shot};
use runtime::{
    Base64Key, FixedBoard, FixedShots, ProverWorker, RetryPolicy, TurnError, TurnOutcome,
    TurnProtocol,
};
use zk::ProofError;
use zk::test_helpers::{empty_cell, guest_board, host_board, ship_cells, test_engine};

use common::{misses, no_shots, protocol, recording_ledger};

#[tokio::test]
async fn short_key_is_rejected_before_any_call() {
    let recorder = recording_ledger();
    let mut entry = vec![0x00];
    entry.extend([7u8; 31]);

    let result = TurnProtocol::new(
        PlayerRole::Host,
        &FixedBoard(host_board()),
        &Base64Key(STANDARD.encode(&entry)),
        Box::new(FixedShots::default()),
        Arc::new(recorder.clone()),
        BattleshipContract::local(),
        ProverWorker::new(test_engine()),
    );

    assert!(matches!(
        result,
        Err(TurnError::KeyFormat(KeyFormatError::Length {
            expected: 33,
            actual: 32
        }))
    ));
    assert_eq!(recorder.call_count(), 0);
}

#[tokio::test]
async fn false_hit_claim_never_reaches_the_ledger() {
    let recorder = recording_ledger();
    let ledger: Arc<dyn LedgerGateway> = Arc::new(recorder.clone());
    let target = empty_cell(&guest_board());

    let mut host = protocol(PlayerRole::Host, host_board(), [target], Arc::clone(&ledger));
    let mut guest = protocol(
        PlayerRole::Guest,
        guest_board(),
        misses(&host_board(), 1),
        Arc::clone(&ledger),
    );

    let game = host.new_game().await.unwrap();
    guest.join_game(game).await.unwrap();
    let shot = host.first_turn().await.unwrap();
    assert_eq!(shot, Shot::new(1, target));
    let submitted = recorder.call_count();

    let err = guest.respond_with_claim(shot, true).await.unwrap_err();
    assert!(matches!(
        err,
        TurnError::Proof(ProofError::ProvingFailure { .. })
    ));
    assert_eq!(recorder.call_count(), submitted);
    assert_eq!(guest.nonce(), 0);
    assert!(guest.answered().is_empty());

    // The truthful answer for the same nonce still goes through.
    let outcome = guest.respond(shot).await.unwrap();
    assert!(matches!(
        outcome,
        TurnOutcome::Continued {
            reported: 1,
            hit: false,
            ..
        }
    ));
    assert_eq!(guest.answered(), &[1]);
    assert_eq!(guest.nonce(), 2);
}

#[tokio::test]
async fn out_of_order_shot_is_a_desync() {
    let recorder = recording_ledger();
    let ledger: Arc<dyn LedgerGateway> = Arc::new(recorder.clone());
    let target = ship_cells(&guest_board())[0];

    let mut host = protocol(PlayerRole::Host, host_board(), [target], Arc::clone(&ledger));
    let mut guest = protocol(
        PlayerRole::Guest,
        guest_board(),
        misses(&host_board(), 2),
        Arc::clone(&ledger),
    );
    let game = host.new_game().await.unwrap();
    guest.join_game(game).await.unwrap();
    host.first_turn().await.unwrap();
    let submitted = recorder.call_count();

    let err = guest.respond(Shot::new(2, target)).await.unwrap_err();
    assert!(matches!(err, TurnError::Desync { expected: 1, actual: 2 }));
    assert!(err.is_retriable());
    assert_eq!(recorder.call_count(), submitted);

    let outcome = guest.respond(Shot::new(1, target)).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Continued { hit: true, .. }));
    assert_eq!(guest.hits_taken(), 1);
}

#[tokio::test]
async fn network_errors_resend_identical_bytes() {
    let recorder = recording_ledger();
    let mut host = protocol(
        PlayerRole::Host,
        host_board(),
        no_shots(),
        Arc::new(recorder.clone()),
    );

    recorder.fail_next(2);
    let game = host.new_game().await.unwrap();
    assert_eq!(game, GameId(0));
    assert_eq!(host.phase(), Phase::AwaitingJoin);

    let attempts = recorder.calls_to("new_game");
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().all(|call| *call == attempts[0]));
}

#[tokio::test]
async fn resend_budget_is_bounded() {
    let recorder = recording_ledger();
    let mut host = protocol(
        PlayerRole::Host,
        host_board(),
        no_shots(),
        Arc::new(recorder.clone()),
    )
    .with_retry(RetryPolicy::new(2, std::time::Duration::from_millis(1)));

    recorder.fail_next(10);
    let err = host.new_game().await.unwrap_err();
    assert!(matches!(err, TurnError::Transport(TransportError::Network(_))));
    assert_eq!(recorder.call_count(), 3);
    assert_eq!(host.phase(), Phase::Created);
    assert_eq!(host.game(), None);
}

#[tokio::test]
async fn ledger_rejection_is_a_hard_stop() {
    let recorder = recording_ledger();
    let ledger: Arc<dyn LedgerGateway> = Arc::new(recorder.clone());
    let mut host = protocol(PlayerRole::Host, host_board(), no_shots(), Arc::clone(&ledger));
    let game = host.new_game().await.unwrap();

    // Host key reused for the guest seat: the ledger refuses a self-join.
    let mut impostor = protocol(PlayerRole::Guest, guest_board(), no_shots(), Arc::clone(&ledger));
    let mut host_as_guest = TurnProtocol::new(
        PlayerRole::Guest,
        &FixedBoard(guest_board()),
        host.signer(),
        Box::new(FixedShots::default()),
        Arc::clone(&ledger),
        BattleshipContract::local(),
        ProverWorker::new(test_engine()),
    )
    .unwrap();

    let err = host_as_guest.join_game(game).await.unwrap_err();
    assert_eq!(err.rejection_code(), Some("E_SELF_JOIN"));
    assert!(!err.is_retriable());
    assert_eq!(recorder.calls_to("join_game").len(), 1);
    assert_eq!(host_as_guest.phase(), Phase::Created);

    impostor.join_game(game).await.unwrap();
}

#[tokio::test]
async fn roles_and_phases_are_enforced_locally() {
    let recorder = recording_ledger();
    let ledger: Arc<dyn LedgerGateway> = Arc::new(recorder.clone());
    let mut guest = protocol(PlayerRole::Guest, guest_board(), no_shots(), Arc::clone(&ledger));

    assert!(matches!(
        guest.new_game().await,
        Err(TurnError::WrongRole {
            role: PlayerRole::Guest,
            ..
        })
    ));
    assert!(matches!(
        guest.respond(Shot::new(1, empty_cell(&guest_board()))).await,
        Err(TurnError::OutOfOrder { .. })
    ));
    assert_eq!(recorder.call_count(), 0);
}

/// Accepts the handshake, then answers every turn with a nonce mismatch
/// while reporting its own nonce.
struct AheadLedger {
    ledger_nonce: u64,
}

#[async_trait]
impl LedgerGateway for AheadLedger {
    async fn call(&self, call: CallDescriptor) -> Result<ExecutionResult, TransportError> {
        let digest = TransactionId::from_bytes(vec![0]);
        Ok(match call.function() {
            "turn" | "final_turn" => {
                ExecutionResult::rejected(digest, "E_NONCE_MISMATCH", "stale nonce")
            }
            _ => ExecutionResult::success(
                digest,
                vec![LedgerEvent::GameCreated {
                    game: GameId(0),
                    host: Address([0; 32]),
                }],
            ),
        })
    }

    async fn query_game(&self, game: GameId) -> Result<Option<OnChainGame>, TransportError> {
        let mut session = GameSession::new(game.0);
        session.phase = Phase::InPlay;
        session.turn_nonce = self.ledger_nonce;
        Ok(Some(OnChainGame {
            game,
            host: Address([0; 32]),
            guest: None,
            session,
        }))
    }
}

#[tokio::test]
async fn ledger_nonce_mismatch_surfaces_as_desync() {
    let ledger: Arc<dyn LedgerGateway> = Arc::new(AheadLedger { ledger_nonce: 7 });
    let mut guest = protocol(
        PlayerRole::Guest,
        guest_board(),
        misses(&host_board(), 1),
        ledger,
    );
    guest.join_game(GameId(0)).await.unwrap();

    let target = empty_cell(&guest_board());
    let err = guest.respond(Shot::new(1, target)).await.unwrap_err();
    assert!(matches!(err, TurnError::Desync { expected: 7, actual: 1 }));
    assert_eq!(guest.nonce(), 0);
}

#[tokio::test]
async fn cells_already_fired_at_are_skipped() {
    let recorder = recording_ledger();
    let ledger: Arc<dyn LedgerGateway> = Arc::new(recorder.clone());
    let cells = misses(&guest_board(), 2);

    let mut host = protocol(
        PlayerRole::Host,
        host_board(),
        [cells[0], cells[0], cells[1]],
        Arc::clone(&ledger),
    );
    let mut guest = protocol(
        PlayerRole::Guest,
        guest_board(),
        misses(&host_board(), 1),
        Arc::clone(&ledger),
    );
    let game = host.new_game().await.unwrap();
    guest.join_game(game).await.unwrap();
    let first = host.first_turn().await.unwrap();
    assert_eq!(first.coord, cells[0]);

    let TurnOutcome::Continued { fired: reply, .. } = guest.respond(first).await.unwrap() else {
        panic!("guest fleet cannot sink on a miss");
    };
    let TurnOutcome::Continued { fired, .. } = host.respond(reply).await.unwrap() else {
        panic!("host fleet cannot sink on the first reply");
    };
    assert_eq!(fired, Shot::new(3, cells[1]));
    assert_eq!(recorder.calls_to("turn").len(), 2);
}
