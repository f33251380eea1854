//! Integration tests for the versioned persistence bundle.

use tabflow::artifact::{ModelArtifact, ARTIFACT_VERSION};
use tabflow::config::{ModelConfig, ModelType};
use tabflow::error::PipelineError;
use tabflow::io::read_csv;
use tabflow::preprocessing::ScalingMode;
use tabflow::session::PipelineSession;
use tabflow::split::SplitConfig;

fn fitted_session() -> PipelineSession {
    let dataset = read_csv(
        "a,b,label\n1,10,x\n2,20,y\n3,30,x\n4,40,y\n5,50,x\n6,60,y\n7,70,x\n8,80,y\n",
    )
    .unwrap();

    let mut config = ModelConfig::default();
    config.epochs = 4;
    config.model_type = ModelType::Mlp {
        hidden_width: 8,
        dropout: 0.0,
    };

    PipelineSession::fit(
        dataset,
        "label",
        &config,
        &SplitConfig {
            test_fraction: 0.25,
            seed: 5,
        },
        ScalingMode::MinMax,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn artifact_json_round_trips() {
    let session = fitted_session();
    let artifact = session.to_artifact();
    assert_eq!(artifact.version, ARTIFACT_VERSION);

    let json = artifact.to_json().unwrap();
    let restored = ModelArtifact::from_json(&json).unwrap();
    assert_eq!(restored.scaling, artifact.scaling);
    assert_eq!(restored.encoding, artifact.encoding);
    assert_eq!(restored.accuracy, artifact.accuracy);
}

#[test]
fn restored_session_predicts_identically() {
    let session = fitted_session();
    let restored = PipelineSession::from_artifact(
        ModelArtifact::from_json(&session.to_artifact().to_json().unwrap()).unwrap(),
    );

    for request in ["2.5, 25", "7.5, 75", "1, 10"] {
        assert_eq!(
            session.predict_request(request).unwrap(),
            restored.predict_request(request).unwrap(),
            "request {}",
            request
        );
    }
    assert_eq!(session.accuracy(), restored.accuracy());
}

#[test]
fn artifact_file_round_trips() {
    let session = fitted_session();
    let artifact = session.to_artifact();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    artifact.write_to(&path).unwrap();

    let restored = ModelArtifact::read_from(&path).unwrap();
    assert_eq!(restored.scaling, artifact.scaling);
    assert_eq!(restored.encoding, artifact.encoding);
}

// ---------------------------------------------------------------------------
// Integrity failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_version_is_rejected() {
    let session = fitted_session();
    let mut artifact = session.to_artifact();
    artifact.version = ARTIFACT_VERSION + 1;

    let json = serde_json::to_string(&artifact).unwrap();
    let err = ModelArtifact::from_json(&json).unwrap_err();
    assert!(matches!(err, PipelineError::Artifact(_)));
}

#[test]
fn partial_payload_is_rejected() {
    // A bundle missing the model section must not restore.
    let err = ModelArtifact::from_json(r#"{"version":1,"accuracy":50.0}"#).unwrap_err();
    assert!(matches!(err, PipelineError::Artifact(_)));
}

#[test]
fn unreadable_path_is_an_artifact_error() {
    let err = ModelArtifact::read_from("/nonexistent/model.json").unwrap_err();
    assert!(matches!(err, PipelineError::Artifact(_)));
}
