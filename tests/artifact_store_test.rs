use std::fs;
use tingia::{ArtifactError, ArtifactManifest, ArtifactStore};

#[test]
fn test_artifact_verification() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = ArtifactStore::new(dir.path());

    // Test verification of missing artifacts
    assert!(!store.is_complete());
    assert!(matches!(store.verify(), Err(ArtifactError::NotFound(_))));

    fs::write(store.vectorizer_path(), r#"{"vocabulary": {}, "idf": []}"#)?;
    fs::write(dir.path().join("classifier.onnx"), b"not really onnx")?;
    assert!(store.is_complete());
    assert!(store.classifier_path().ends_with("classifier.onnx"));

    let manifest = store.write_manifest()?;
    assert!(store.verify().is_ok());

    // Corrupt file and verify
    fs::write(store.vectorizer_path(), "corrupted data")?;
    match store.verify() {
        Err(ArtifactError::HashMismatch { file_type, expected, actual }) => {
            assert_eq!(file_type, "vectorizer");
            assert_eq!(expected, manifest.vectorizer_sha256);
            assert_ne!(actual, expected);
        }
        other => panic!("expected hash mismatch, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_handwritten_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = ArtifactStore::new(dir.path());
    fs::write(store.vectorizer_path(), "")?;
    fs::write(dir.path().join("classifier.json"), "")?;

    // digests are compared case-insensitively
    let empty = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";
    let manifest = ArtifactManifest {
        vectorizer_sha256: empty.to_string(),
        classifier_sha256: empty.to_string(),
    };
    fs::write(store.manifest_path(), serde_json::to_string(&manifest)?)?;

    assert_eq!(store.read_manifest()?, Some(manifest));
    assert!(store.verify().is_ok());
    Ok(())
}

#[test]
fn test_manifest_missing_field() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = ArtifactStore::new(dir.path());
    fs::write(store.vectorizer_path(), "{}")?;
    fs::write(dir.path().join("classifier.json"), "{}")?;
    fs::write(store.manifest_path(), r#"{"vectorizer_sha256": "abc"}"#)?;

    assert!(matches!(store.verify(), Err(ArtifactError::InvalidManifest(_))));
    Ok(())
}
