use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tingia::{
    ArtifactStore, BinaryLabel, ClassifierBuilder, ClassifierError, CredibilityClassifier, CredibilityLabel,
    PublicationStatus, TextNormalizer,
};

const VECTORIZER: &str = r#"{
    "vocabulary": {"tuyệt_vời": 0, "tin_giả": 1, "học_sinh": 2},
    "idf": [1.0, 1.0, 1.0],
    "ngram_range": [1, 1],
    "sublinear_tf": false,
    "norm": "l2",
    "lowercase": true,
    "token_pattern": "(?u)\\b\\w\\w+\\b"
}"#;

const MODEL: &str = r#"{"classes": [0, 1], "coef": [[3.0, -3.0, 0.5]], "intercept": [0.0]}"#;

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}

fn write_artifacts(dir: &Path) {
    fs::write(dir.join("vectorizer.json"), VECTORIZER).unwrap();
    fs::write(dir.join("classifier.json"), MODEL).unwrap();
}

fn setup_test_classifier() -> (tempfile::TempDir, CredibilityClassifier) {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let classifier = CredibilityClassifier::builder()
        .with_artifacts_dir(dir.path())
        .unwrap()
        .build()
        .expect("Failed to create classifier");
    (dir, classifier)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[test]
fn test_end_to_end_real_article() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();
    let verdict = classifier.evaluate("Tin", "Đây là tin tuyệt vời!")?;

    assert!(!verdict.is_fake);
    assert_eq!(verdict.label, BinaryLabel::Real);
    assert_eq!(verdict.credibility_label, CredibilityLabel::Genuine);
    assert!((verdict.confidence_score - sigmoid(3.0)).abs() < 1e-9);
    assert_eq!(verdict.preprocessed_text, "tuyệt_vời !");
    assert_eq!(verdict.publication_status(), PublicationStatus::Published);
    Ok(())
}

#[test]
fn test_end_to_end_fake_article() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();
    let verdict = classifier.evaluate("TIN GIẢ", "")?;

    assert!(verdict.is_fake);
    assert_eq!(verdict.label, BinaryLabel::Fake);
    assert_eq!(verdict.credibility_label, CredibilityLabel::Fabricated);
    assert!((verdict.probabilities.fake - sigmoid(3.0)).abs() < 1e-9);
    assert_eq!(verdict.publication_status(), PublicationStatus::Draft);
    Ok(())
}

#[test]
fn test_low_confidence_is_unclear() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();

    // balanced features: z = 0, both probabilities 0.5
    let verdict = classifier.evaluate("Tuyệt vời", "tin giả")?;
    assert_eq!(verdict.confidence_score, 0.5);
    assert_eq!(verdict.credibility_label, CredibilityLabel::Unclear);

    // unknown words only
    let verdict = classifier.evaluate("Thời tiết", "hôm nay nắng đẹp")?;
    assert_eq!(verdict.credibility_label, CredibilityLabel::Unclear);
    assert!(verdict.is_fake);
    Ok(())
}

#[test]
fn test_end_to_end_onnx_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("vectorizer.json"), VECTORIZER)?;
    // same weights as MODEL, exported with skl2onnx output names
    fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/classifier.onnx"),
        dir.path().join("classifier.onnx"),
    )?;

    let classifier = CredibilityClassifier::builder().with_artifacts_dir(dir.path())?.build()?;
    assert!(classifier.info().model_path.unwrap().ends_with("classifier.onnx"));
    assert_eq!(classifier.info().num_features, 3);

    let verdict = classifier.evaluate("Tin", "Đây là tin tuyệt vời!")?;
    assert_eq!(verdict.label, BinaryLabel::Real);
    assert_eq!(verdict.credibility_label, CredibilityLabel::Genuine);
    assert!((verdict.confidence_score - sigmoid(3.0)).abs() < 1e-6);

    let verdict = classifier.evaluate("TIN GIẢ", "")?;
    assert!(verdict.is_fake);
    assert_eq!(verdict.publication_status(), PublicationStatus::Draft);
    Ok(())
}

#[test]
fn test_empty_input() {
    let (_dir, classifier) = setup_test_classifier();
    assert!(matches!(classifier.evaluate("", ""), Err(ClassifierError::EmptyInput)));
    assert!(matches!(classifier.evaluate("   ", "\n"), Err(ClassifierError::EmptyInput)));
    assert!(matches!(classifier.evaluate("😀", "<br/>"), Err(ClassifierError::EmptyInput)));
}

#[test]
fn test_title_only_and_content_only() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();
    let title_only = classifier.evaluate("Học sinh", "")?;
    let content_only = classifier.evaluate("", "Học sinh")?;
    assert_eq!(title_only, content_only);
    Ok(())
}

#[test]
fn test_probabilities_shape() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();
    for (title, content) in [("Tin", "tuyệt vời"), ("", "tin giả"), ("Học sinh", "đi học")] {
        let verdict = classifier.evaluate(title, content)?;
        let json = serde_json::to_value(&verdict)?;
        let probabilities = json["probabilities"].as_object().unwrap();
        assert_eq!(probabilities.len(), 2);
        let sum = probabilities["Real"].as_f64().unwrap() + probabilities["Fake"].as_f64().unwrap();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(verdict.probabilities.get(verdict.label), verdict.confidence_score);
    }
    Ok(())
}

#[test]
fn test_verdict_json() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, classifier) = setup_test_classifier();
    let verdict = classifier.evaluate("Tin giả", "tin giả")?;
    let json = serde_json::to_value(&verdict)?;

    assert_eq!(json["is_fake"], true);
    assert_eq!(json["credibility_label"], "Giả");
    assert_eq!(json["label"], "Fake");
    assert_eq!(json["preprocessed_text"], "tin_giả tin_giả");
    assert!(json["confidence_score"].as_f64().unwrap() >= 0.7);
    Ok(())
}

#[test]
fn test_info() {
    let (_dir, classifier) = setup_test_classifier();
    let info = classifier.info();
    assert_eq!(info.classes, vec![0, 1]);
    assert_eq!(info.num_features, 3);
    assert_eq!(info.threshold, 0.7);
    assert!(info.vectorizer_path.unwrap().ends_with("vectorizer.json"));
}

#[test]
fn test_manifest_mismatch_fails_build() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let store = ArtifactStore::new(dir.path());
    store.write_manifest().unwrap();
    assert!(ClassifierBuilder::new().with_artifact_store(&store).is_ok());

    fs::write(dir.path().join("classifier.json"), r#"{"classes": [0, 1], "coef": [[0.0, 0.0, 0.0]], "intercept": [9.0]}"#)
        .unwrap();
    let err = ClassifierBuilder::new().with_artifact_store(&store).unwrap_err();
    assert!(matches!(err, ClassifierError::ArtifactLoad(msg) if msg.contains("Hash mismatch")));
}

#[test]
fn test_missing_artifacts_fail_build() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let err = CredibilityClassifier::builder().with_artifacts_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ClassifierError::ArtifactLoad(_)));
}

#[test]
fn test_wrong_class_set_fails_build() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("vectorizer.json"), VECTORIZER).unwrap();
    fs::write(dir.path().join("classifier.json"), r#"{"classes": [0, 2], "coef": [[1.0, 1.0, 1.0]], "intercept": [0.0]}"#)
        .unwrap();

    let err = CredibilityClassifier::builder()
        .with_artifacts_dir(dir.path())
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, ClassifierError::ArtifactLoad(_)));
}

#[test]
fn test_shared_normalizer() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let dir = tempfile::tempdir()?;
    write_artifacts(dir.path());
    let normalizer = Arc::new(TextNormalizer::default());

    let classifier = ClassifierBuilder::new()
        .with_normalizer(Arc::clone(&normalizer))
        .with_artifacts_dir(dir.path())?
        .build()?;
    classifier.evaluate("Học sinh", "tuyệt vời")?;
    assert_eq!(Arc::strong_count(&normalizer), 2);
    Ok(())
}

#[test]
fn test_thread_safety() {
    let (_dir, classifier) = setup_test_classifier();
    let classifier = Arc::new(classifier);
    let mut handles = vec![];

    for i in 0..4 {
        let classifier = Arc::clone(&classifier);
        handles.push(thread::spawn(move || {
            let content = if i % 2 == 0 { "tuyệt vời" } else { "tin giả" };
            classifier.evaluate("", content).unwrap().is_fake
        }));
    }

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, true, false, true]);
}
