use pretty_assertions::assert_eq;
use shap_e_fetch::{Error, fetch_model, gradio::TextTo3dRequest};

mod common;
use common::*;

#[tokio::test]
async fn test_artifact_is_moved_to_destination() {
    let temp_dir = create_temp_dir();
    let artifact = write_artifact(temp_dir.path(), "sample.glb", GLB_BYTES).await;
    let destination = create_models_dir(temp_dir.path()).await;
    let client = MockInferenceClient::new().with_result(artifact.clone());

    let stored = fetch_model(&client, &TextTo3dRequest::default(), &destination)
        .await
        .unwrap();

    assert_eq!(stored, destination);
    assert!(!artifact.exists());
    assert_eq!(tokio::fs::read(&destination).await.unwrap(), GLB_BYTES);
}

#[tokio::test]
async fn test_missing_artifact_fails_without_creating_destination() {
    let temp_dir = create_temp_dir();
    let missing = temp_dir.path().join("does-not-exist.glb");
    let destination = create_models_dir(temp_dir.path()).await;
    let client = MockInferenceClient::new().with_result(missing.clone());

    let result = fetch_model(&client, &TextTo3dRequest::default(), &destination).await;

    match result {
        Err(Error::ArtifactNotFound { path }) => assert_eq!(path, missing),
        other => panic!("Expected ArtifactNotFound, got: {:?}", other),
    }
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_remote_error_skips_rename() {
    let temp_dir = create_temp_dir();
    let destination = create_models_dir(temp_dir.path()).await;
    let client = MockInferenceClient::new().with_error("Space is sleeping".to_string());

    let result = fetch_model(&client, &TextTo3dRequest::default(), &destination).await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Remote(_)));
    assert!(err.to_string().contains("Space is sleeping"));
    assert!(!destination.exists());
    assert_eq!(client.get_requests().len(), 1);
}

#[tokio::test]
async fn test_missing_models_directory_fails() {
    let temp_dir = create_temp_dir();
    let artifact = write_artifact(temp_dir.path(), "sample.glb", GLB_BYTES).await;
    let destination = temp_dir.path().join("models").join("model.glb");
    let client = MockInferenceClient::new().with_result(artifact.clone());

    let result = fetch_model(&client, &TextTo3dRequest::default(), &destination).await;

    match result {
        Err(Error::DestinationDirMissing { dir }) => {
            assert_eq!(dir, temp_dir.path().join("models"))
        }
        other => panic!("Expected DestinationDirMissing, got: {:?}", other),
    }
    assert!(artifact.exists());
    assert!(!temp_dir.path().join("models").exists());
}

#[tokio::test]
async fn test_request_uses_fixed_parameters() {
    let temp_dir = create_temp_dir();
    let artifact = write_artifact(temp_dir.path(), "sample.glb", GLB_BYTES).await;
    let destination = create_models_dir(temp_dir.path()).await;
    let client = MockInferenceClient::new().with_result(artifact);

    fetch_model(&client, &TextTo3dRequest::default(), &destination)
        .await
        .unwrap();

    let requests = client.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "show me a baby, as if from solaris");
    assert_eq!(requests[0].seed, 0);
    assert_eq!(requests[0].guidance_scale, 15.0);
    assert_eq!(requests[0].num_inference_steps, 64);
    assert_eq!(requests[0].api_name, "/text-to-3d");
}

#[tokio::test]
async fn test_custom_request_is_passed_through() {
    let temp_dir = create_temp_dir();
    let artifact = write_artifact(temp_dir.path(), "sample.glb", GLB_BYTES).await;
    let destination = create_models_dir(temp_dir.path()).await;
    let client = MockInferenceClient::new().with_result(artifact);
    let request = TextTo3dRequest {
        prompt: "a shark".to_string(),
        seed: 99,
        ..TextTo3dRequest::default()
    };

    fetch_model(&client, &request, &destination).await.unwrap();

    assert_eq!(client.get_requests(), vec![request]);
}
