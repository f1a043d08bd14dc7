//! Rules and proof checks of the in-process battleship module.

use client_blockchain_core::{
    CallDescriptor, ExecutionResult, GameId, LedgerEvent, LedgerGateway,
};
use client_blockchain_sui::{BattleshipContract, LocalLedger, SignerKey};
use game_core::{Board, Coordinate, Phase, PlayerRole};
use zk::test_helpers::{empty_cell, guest_board, host_board, ship_cells, test_engine};
use zk::{CircuitInputs, EncodedProof, ProofEngine, commitment_bytes};

struct Table {
    ledger: LocalLedger,
    engine: ProofEngine,
    host: SignerKey,
    guest: SignerKey,
}

impl Table {
    fn new() -> Self {
        let engine = test_engine();
        Self {
            ledger: LocalLedger::new(BattleshipContract::local(), engine.clone()),
            engine,
            host: SignerKey::from_secret([1; 32]),
            guest: SignerKey::from_secret([2; 32]),
        }
    }

    fn contract(&self) -> &BattleshipContract {
        self.ledger.contract()
    }

    fn board_proof(&self, board: Board) -> EncodedProof {
        self.engine
            .prove_and_encode(&CircuitInputs::board(board))
            .unwrap()
    }

    fn shot_proof(&self, board: Board, shot: Coordinate, hit: bool) -> EncodedProof {
        self.engine
            .prove_and_encode(&CircuitInputs::shot(board, shot, hit))
            .unwrap()
    }

    async fn submit(&self, key: &SignerKey, call: CallDescriptor) -> ExecutionResult {
        self.ledger.call(key.sign(call).unwrap()).await.unwrap()
    }

    /// Host opened, guest joined.
    async fn seated(&self) -> GameId {
        let call = self
            .contract()
            .new_game(&commitment_bytes(&host_board()), &self.board_proof(host_board()))
            .unwrap();
        let result = self.submit(&self.host, call).await;
        let game = result.created_game().unwrap();

        let call = self
            .contract()
            .join_game(game, &commitment_bytes(&guest_board()), &self.board_proof(guest_board()))
            .unwrap();
        assert!(self.submit(&self.guest, call).await.accepted);
        game
    }

    /// Seated and the host fired shot #1 at `coord`.
    async fn in_play(&self, coord: Coordinate) -> GameId {
        let game = self.seated().await;
        let call = self.contract().first_turn(game, coord).unwrap();
        assert!(self.submit(&self.host, call).await.accepted);
        game
    }

    async fn session_nonce(&self, game: GameId) -> u64 {
        self.ledger
            .query_game(game)
            .await
            .unwrap()
            .unwrap()
            .session
            .turn_nonce
    }
}

#[tokio::test]
async fn handshake_seats_both_players() {
    let table = Table::new();
    let game = table.seated().await;
    assert_eq!(game, GameId(0));

    let on_chain = table.ledger.query_game(game).await.unwrap().unwrap();
    assert_eq!(on_chain.host, table.host.address());
    assert_eq!(on_chain.guest, Some(table.guest.address()));
    assert_eq!(on_chain.session.phase, Phase::AwaitingFirstTurn);
    assert_eq!(
        on_chain.session.guest_commitment,
        Some(commitment_bytes(&guest_board()))
    );

    let call = table.contract().first_turn(game, Coordinate::new(0, 0)).unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(
        result.events,
        vec![LedgerEvent::ShotFired {
            game,
            nonce: 1,
            shooter: PlayerRole::Host,
            coord: Coordinate::new(0, 0),
        }]
    );
}

#[tokio::test]
async fn truthful_turn_is_accepted() {
    let table = Table::new();
    let target = ship_cells(&guest_board())[0];
    let game = table.in_play(target).await;

    let proof = table.shot_proof(guest_board(), target, true);
    let call = table
        .contract()
        .turn(game, 1, true, &proof, Coordinate::new(9, 9))
        .unwrap();
    let result = table.submit(&table.guest, call).await;
    assert!(result.accepted, "{:?}", result.status);
    assert_eq!(table.session_nonce(game).await, 2);

    let session = table.ledger.query_game(game).await.unwrap().unwrap().session;
    assert_eq!(session.hits_on(PlayerRole::Guest), 1);
    assert_eq!(session.to_move(), Some(PlayerRole::Host));
}

#[tokio::test]
async fn proof_for_another_board_is_rejected() {
    let table = Table::new();
    let call = table
        .contract()
        .new_game(&commitment_bytes(&guest_board()), &table.board_proof(host_board()))
        .unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(result.failure_code(), Some("E_INVALID_PROOF"));
    assert_eq!(table.ledger.game_count().unwrap(), 0);
}

#[tokio::test]
async fn shot_proof_must_answer_the_pending_shot() {
    let table = Table::new();
    let target = empty_cell(&guest_board());
    let game = table.in_play(target).await;

    let elsewhere = Coordinate::new((target.x + 1) % 10, target.y);
    let proof = table.shot_proof(guest_board(), elsewhere, guest_board().occupies(elsewhere));
    let call = table
        .contract()
        .turn(game, 1, guest_board().occupies(elsewhere), &proof, Coordinate::new(0, 0))
        .unwrap();
    let result = table.submit(&table.guest, call).await;
    assert_eq!(result.failure_code(), Some("E_INVALID_PROOF"));
    assert_eq!(table.session_nonce(game).await, 1);
}

#[tokio::test]
async fn wrong_nonce_is_rejected_without_effect() {
    let table = Table::new();
    let target = empty_cell(&guest_board());
    let game = table.in_play(target).await;

    let proof = table.shot_proof(guest_board(), target, false);
    let call = table
        .contract()
        .turn(game, 2, false, &proof, Coordinate::new(0, 0))
        .unwrap();
    let result = table.submit(&table.guest, call).await;
    assert_eq!(result.failure_code(), Some("E_NONCE_MISMATCH"));
    assert!(result.events.is_empty());
    assert_eq!(table.session_nonce(game).await, 1);
}

#[tokio::test]
async fn wrong_player_is_rejected() {
    let table = Table::new();
    let game = table.seated().await;

    let call = table.contract().first_turn(game, Coordinate::new(0, 0)).unwrap();
    let result = table.submit(&table.guest, call).await;
    assert_eq!(result.failure_code(), Some("E_NOT_YOUR_TURN"));

    let outsider = SignerKey::from_secret([3; 32]);
    let call = table.contract().first_turn(game, Coordinate::new(0, 0)).unwrap();
    let result = table.submit(&outsider, call).await;
    assert_eq!(result.failure_code(), Some("E_NOT_A_PLAYER"));

    // The host answering its own shot is out of turn too.
    let call = table.contract().first_turn(game, Coordinate::new(0, 0)).unwrap();
    assert!(table.submit(&table.host, call).await.accepted);
    let target = Coordinate::new(0, 0);
    let proof = table.shot_proof(host_board(), target, true);
    let call = table.contract().turn(game, 1, true, &proof, target).unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(result.failure_code(), Some("E_NOT_YOUR_TURN"));
}

#[tokio::test]
async fn host_cannot_join_own_game() {
    let table = Table::new();
    let call = table
        .contract()
        .new_game(&commitment_bytes(&host_board()), &table.board_proof(host_board()))
        .unwrap();
    let game = table.submit(&table.host, call).await.created_game().unwrap();

    let call = table
        .contract()
        .join_game(game, &commitment_bytes(&guest_board()), &table.board_proof(guest_board()))
        .unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(result.failure_code(), Some("E_SELF_JOIN"));
}

#[tokio::test]
async fn forged_signature_is_rejected() {
    let table = Table::new();
    let call = table
        .contract()
        .new_game(&commitment_bytes(&host_board()), &table.board_proof(host_board()))
        .unwrap();
    let mut signed = table.host.sign(call).unwrap();
    signed.sender = table.guest.address();

    let result = table.ledger.call(signed).await.unwrap();
    assert_eq!(result.failure_code(), Some("E_BAD_SIGNATURE"));
}

#[tokio::test]
async fn final_turn_requires_the_last_cell() {
    let table = Table::new();
    let target = ship_cells(&guest_board())[0];
    let game = table.in_play(target).await;

    let proof = table.shot_proof(guest_board(), target, true);
    let call = table.contract().final_turn(game, 1, &proof).unwrap();
    let result = table.submit(&table.guest, call).await;
    assert_eq!(result.failure_code(), Some("E_GAME_NOT_OVER"));
    assert_eq!(table.session_nonce(game).await, 1);
}

#[tokio::test]
async fn unknown_game_and_foreign_package_are_rejected() {
    let table = Table::new();
    let call = table
        .contract()
        .first_turn(GameId(42), Coordinate::new(0, 0))
        .unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(result.failure_code(), Some("E_UNKNOWN_GAME"));

    let foreign = BattleshipContract::new("0xdead".to_string(), table.contract().state_object);
    let call = foreign.first_turn(GameId(0), Coordinate::new(0, 0)).unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(result.failure_code(), Some("E_UNKNOWN_FUNCTION"));
}

#[tokio::test]
async fn repeated_shot_at_same_cell_is_rejected() {
    let table = Table::new();
    let target = ship_cells(&guest_board())[0];
    let game = table.in_play(target).await;

    let reply = Coordinate::new(9, 9);
    let proof = table.shot_proof(guest_board(), target, true);
    let call = table.contract().turn(game, 1, true, &proof, reply).unwrap();
    assert!(table.submit(&table.guest, call).await.accepted);

    // Host answers truthfully but aims at the cell it already sank.
    let hit = host_board().occupies(reply);
    let proof = table.shot_proof(host_board(), reply, hit);
    let call = table.contract().turn(game, 2, hit, &proof, target).unwrap();
    let result = table.submit(&table.host, call).await;
    assert_eq!(result.failure_code(), Some("E_ALREADY_SHOT"));
    assert_eq!(table.session_nonce(game).await, 2);

    let fresh = empty_cell(&guest_board());
    let call = table.contract().turn(game, 2, hit, &proof, fresh).unwrap();
    assert!(table.submit(&table.host, call).await.accepted);

    let session = table.ledger.query_game(game).await.unwrap().unwrap().session;
    assert_eq!(session.hits_on(PlayerRole::Guest), 1);
    assert_eq!(session.turn_nonce, 3);
}
