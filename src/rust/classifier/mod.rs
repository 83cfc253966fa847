mod error;
mod model;
mod onnx;
mod utils;
mod vectorizer;
mod verdict;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;

pub use builder::{ClassifierBuilder, DEFAULT_CLASSES};
pub use classifier::{ClassifierArtifacts, CredibilityClassifier};
pub use error::ClassifierError;
pub use model::{ClassScores, LogisticRegression, LogisticRegressionParams, ProbabilisticModel};
pub use onnx::OnnxClassifier;
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerParams, DEFAULT_TOKEN_PATTERN};
pub use verdict::{
    BinaryLabel, ClassProbabilities, CredibilityLabel, PredictionVerdict, PublicationStatus, CREDIBILITY_THRESHOLD,
    REAL_CLASS,
};

/// Information about the artifacts a classifier was built from
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the vectorizer file, if loaded from disk
    pub vectorizer_path: Option<String>,
    /// Path to the classifier file, if loaded from disk
    pub model_path: Option<String>,
    /// Class values in probability column order
    pub classes: Vec<i64>,
    /// Size of the TF-IDF feature vectors
    pub num_features: usize,
    /// Confidence threshold for a Thật/Giả verdict
    pub threshold: f64,
}
