//! Circuit artifacts on disk and the process-wide install slot.

use std::sync::Arc;

use zk::test_helpers::{host_board, test_artifacts};
use zk::{CircuitArtifacts, CircuitInputs, CircuitKind, ProofEngine, ProofError};

#[test]
fn artifacts_round_trip_through_a_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let original = test_artifacts();
    original.save_dir(dir.path()).expect("save artifacts");

    assert!(dir.path().join("board.zkey").is_file());
    assert!(dir.path().join("shot.zkey").is_file());

    let loaded = Arc::new(CircuitArtifacts::load_dir(dir.path()).expect("load artifacts"));
    for kind in CircuitKind::ALL {
        assert_eq!(
            loaded.verifying_key_bytes(kind).expect("vk bytes"),
            original.verifying_key_bytes(kind).expect("vk bytes"),
        );
    }

    // A proof made with the loaded proving key verifies under the original key.
    let encoded = ProofEngine::groth16(loaded)
        .prove_and_encode(&CircuitInputs::board(host_board()))
        .expect("prove with loaded keys");
    assert!(ProofEngine::groth16(original)
        .verify_encoded(CircuitKind::Board, encoded.as_bytes())
        .expect("decode"));
}

#[test]
fn missing_key_file_is_reported_per_circuit() {
    let dir = tempfile::tempdir().expect("temp dir");
    test_artifacts().save_dir(dir.path()).expect("save artifacts");
    std::fs::remove_file(dir.path().join("shot.zkey")).expect("remove shot key");

    assert!(matches!(
        CircuitArtifacts::load_dir(dir.path()),
        Err(ProofError::MissingArtifacts(CircuitKind::Shot))
    ));
}

#[test]
fn truncated_key_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    test_artifacts().save_dir(dir.path()).expect("save artifacts");
    std::fs::write(dir.path().join("board.zkey"), [1u8, 2, 3]).expect("truncate board key");

    assert!(matches!(
        CircuitArtifacts::load_dir(dir.path()),
        Err(ProofError::SerializationError(_))
    ));
}

#[test]
fn install_is_once_per_process() {
    assert!(matches!(
        ProofEngine::from_installed(),
        Err(ProofError::ArtifactsNotInstalled)
    ));

    CircuitArtifacts::install(test_artifacts()).expect("first install");
    assert!(CircuitArtifacts::is_installed());
    assert!(ProofEngine::from_installed().is_ok());

    assert!(matches!(
        CircuitArtifacts::install(test_artifacts()),
        Err(ProofError::ArtifactsAlreadyInstalled)
    ));
}
