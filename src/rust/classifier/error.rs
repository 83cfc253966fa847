use ort::Error as OrtError;

use crate::artifact_store::ArtifactError;

/// Represents the different types of errors that can occur while loading or
/// running the credibility classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Title and content are blank, before or after normalization
    #[error("Input text is empty after normalization")]
    EmptyInput,
    /// A vectorizer or classifier artifact is missing, corrupt or inconsistent
    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),
    /// The builder was used incorrectly
    #[error("Build error: {0}")]
    BuildError(String),
    /// The ONNX runtime failed while running the model
    #[error("Model error: {0}")]
    ModelError(String),
    /// The model produced output that violates the binary classifier contract
    #[error("Prediction error: {0}")]
    PredictionError(String),
}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::ModelError(err.to_string())
    }
}

impl From<ArtifactError> for ClassifierError {
    fn from(err: ArtifactError) -> Self {
        ClassifierError::ArtifactLoad(err.to_string())
    }
}
