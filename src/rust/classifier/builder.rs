use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};

use super::classifier::{ClassifierArtifacts, CredibilityClassifier};
use super::error::ClassifierError;
use super::model::{LogisticRegression, ProbabilisticModel};
use super::onnx::OnnxClassifier;
use super::vectorizer::TfidfVectorizer;
use crate::artifact_store::ArtifactStore;
use crate::normalizer::TextNormalizer;
use crate::runtime::RuntimeConfig;

/// Class values of an ONNX classifier, in probability column order, when none
/// are given.
pub const DEFAULT_CLASSES: [i64; 2] = [0, 1];

/// A builder for constructing a CredibilityClassifier with a fluent interface.
#[derive(Debug)]
pub struct ClassifierBuilder {
    vectorizer_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    classes: Vec<i64>,
    artifacts: Option<ClassifierArtifacts>,
    normalizer: Option<Arc<TextNormalizer>>,
    runtime_config: RuntimeConfig,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use tingia::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            vectorizer_path: None,
            model_path: None,
            classes: DEFAULT_CLASSES.to_vec(),
            artifacts: None,
            normalizer: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration used when the model is an ONNX graph
    ///
    /// # Example
    /// ```
    /// use tingia::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig::default();
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Shares an existing normalizer, e.g. one built with a custom lexicon
    pub fn with_normalizer(mut self, normalizer: Arc<TextNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Sets the class values of an ONNX model, in the column order of its
    /// probabilities output. JSON models carry their own classes.
    pub fn with_classes(mut self, classes: Vec<i64>) -> Self {
        self.classes = classes;
        self
    }

    /// Uses the artifacts of a verified store
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The artifact paths are already set
    ///   - A file is missing or fails its manifest digest
    pub fn with_artifact_store(self, store: &ArtifactStore) -> Result<Self, ClassifierError> {
        if self.vectorizer_path.is_some() || self.model_path.is_some() {
            return Err(ClassifierError::BuildError("Vectorizer and classifier paths already set".to_string()));
        }
        store.verify().map_err(|e| {
            error!("Artifact store {:?} failed verification: {}", store.artifacts_dir(), e);
            ClassifierError::from(e)
        })?;

        let vectorizer_path = store.vectorizer_path();
        let model_path = store.classifier_path();
        self.with_custom_artifacts(vectorizer_path, model_path)
    }

    /// Uses the artifacts in `dir`, see [`ArtifactStore`] for the file layout
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use tingia::ClassifierBuilder;
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .with_artifacts_dir("/var/lib/tingia/artifacts")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_artifacts_dir<P: AsRef<Path>>(self, dir: P) -> Result<Self, ClassifierError> {
        let store = ArtifactStore::new(dir);
        self.with_artifact_store(&store)
    }

    /// Sets the vectorizer and classifier files directly.
    ///
    /// A model path ending in `.onnx` is loaded as an ONNX graph, anything
    /// else as a JSON logistic regression.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - A path is empty
    ///   - The paths are already set
    ///   - A file doesn't exist
    pub fn with_custom_artifacts<P: AsRef<Path>, Q: AsRef<Path>>(
        mut self,
        vectorizer_path: P,
        model_path: Q,
    ) -> Result<Self, ClassifierError> {
        let vectorizer_path = vectorizer_path.as_ref();
        let model_path = model_path.as_ref();
        if vectorizer_path.as_os_str().is_empty() || model_path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Vectorizer and classifier paths cannot be empty".to_string()));
        }
        if self.vectorizer_path.is_some() || self.model_path.is_some() {
            return Err(ClassifierError::BuildError("Vectorizer and classifier paths already set".to_string()));
        }

        if !vectorizer_path.exists() {
            return Err(ClassifierError::ArtifactLoad(format!("Vectorizer file not found: {:?}", vectorizer_path)));
        }
        if !model_path.exists() {
            return Err(ClassifierError::ArtifactLoad(format!("Classifier file not found: {:?}", model_path)));
        }

        self.vectorizer_path = Some(vectorizer_path.to_path_buf());
        self.model_path = Some(model_path.to_path_buf());
        Ok(self)
    }

    /// Uses artifacts that were already loaded, e.g. shared between classifiers
    /// with different normalizers. Takes precedence over any paths.
    pub fn with_artifacts(mut self, artifacts: ClassifierArtifacts) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Loads the artifacts and returns the final CredibilityClassifier.
    ///
    /// # Returns
    /// * `Result<CredibilityClassifier, ClassifierError>` - The constructed classifier if successful, or:
    ///   - `BuildError` if neither artifacts nor artifact paths are set
    ///   - `ArtifactLoad` if an artifact is corrupt or the two artifacts disagree
    pub fn build(self) -> Result<CredibilityClassifier, ClassifierError> {
        let normalizer = self.normalizer.unwrap_or_default();

        if let Some(artifacts) = self.artifacts {
            info!("Classifier built from preloaded artifacts");
            return Ok(CredibilityClassifier::new(normalizer, artifacts));
        }

        let (vectorizer_path, model_path) = match (self.vectorizer_path, self.model_path) {
            (Some(vectorizer_path), Some(model_path)) => (vectorizer_path, model_path),
            _ => {
                return Err(ClassifierError::BuildError(
                    "Vectorizer and classifier paths must be set".to_string(),
                ))
            }
        };

        let vectorizer = TfidfVectorizer::from_file(&vectorizer_path).map_err(|e| {
            error!("Failed to load vectorizer: {}", e);
            e
        })?;
        let model = Self::load_model(&model_path, self.classes, &self.runtime_config).map_err(|e| {
            error!("Failed to load classifier: {}", e);
            e
        })?;
        let artifacts = ClassifierArtifacts::new(vectorizer, model)?;
        info!(
            "Classifier built ({} features, classes {:?})",
            artifacts.vectorizer().n_features(),
            artifacts.model().classes()
        );

        Ok(CredibilityClassifier::from_parts(
            normalizer,
            Arc::new(artifacts),
            Some(vectorizer_path.to_string_lossy().to_string()),
            Some(model_path.to_string_lossy().to_string()),
        ))
    }

    fn load_model(
        path: &Path,
        classes: Vec<i64>,
        config: &RuntimeConfig,
    ) -> Result<Box<dyn ProbabilisticModel>, ClassifierError> {
        let is_onnx = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("onnx"));
        if is_onnx {
            Ok(Box::new(OnnxClassifier::from_file(path, classes, config)?))
        } else {
            Ok(Box::new(LogisticRegression::from_file(path)?))
        }
    }
}
