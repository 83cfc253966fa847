use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const ARTIFACTS_ENV: &str = "TINGIA_ARTIFACTS";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const ONNX_CLASSIFIER_FILE: &str = "classifier.onnx";
pub const JSON_CLASSIFIER_FILE: &str = "classifier.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// SHA-256 digests pinning a set of artifacts, as stored in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub vectorizer_sha256: String,
    pub classifier_sha256: String,
}

/// A directory holding the frozen vectorizer and classifier.
///
/// ```text
/// <dir>/vectorizer.json
/// <dir>/classifier.onnx   (preferred when present)
/// <dir>/classifier.json
/// <dir>/manifest.json     (optional)
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store over the default artifacts directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_artifacts_dir())
    }

    /// Returns the default artifacts directory path
    pub fn get_default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(ARTIFACTS_ENV) {
            return PathBuf::from(path);
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("tingia").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("tingia").join("artifacts");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("tingia").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            artifacts_dir: artifacts_dir.as_ref().to_path_buf(),
        }
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.artifacts_dir.join(VECTORIZER_FILE)
    }

    /// The ONNX classifier if present, otherwise the JSON one.
    pub fn classifier_path(&self) -> PathBuf {
        let onnx = self.artifacts_dir.join(ONNX_CLASSIFIER_FILE);
        if onnx.exists() {
            onnx
        } else {
            self.artifacts_dir.join(JSON_CLASSIFIER_FILE)
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.artifacts_dir.join(MANIFEST_FILE)
    }

    pub fn is_complete(&self) -> bool {
        let vectorizer_path = self.vectorizer_path();
        let classifier_path = self.classifier_path();
        log::debug!("Checking artifacts in {:?}:", self.artifacts_dir);
        log::debug!("  Vectorizer: {:?} (exists: {})", vectorizer_path, vectorizer_path.exists());
        log::debug!("  Classifier: {:?} (exists: {})", classifier_path, classifier_path.exists());
        vectorizer_path.exists() && classifier_path.exists()
    }

    /// Reads `manifest.json`, or `None` when the store has no manifest.
    pub fn read_manifest(&self) -> Result<Option<ArtifactManifest>, ArtifactError> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let manifest = serde_json::from_str(&json).map_err(|e| ArtifactError::InvalidManifest(e.to_string()))?;
        Ok(Some(manifest))
    }

    /// Records the digests of the current artifacts in `manifest.json`.
    pub fn write_manifest(&self) -> Result<ArtifactManifest, ArtifactError> {
        self.ensure_present()?;
        let manifest = ArtifactManifest {
            vectorizer_sha256: sha256_file(&self.vectorizer_path())?,
            classifier_sha256: sha256_file(&self.classifier_path())?,
        };
        let json =
            serde_json::to_string_pretty(&manifest).map_err(|e| ArtifactError::InvalidManifest(e.to_string()))?;
        fs::write(self.manifest_path(), json)?;
        log::info!("Wrote artifact manifest to {:?}", self.manifest_path());
        Ok(manifest)
    }

    /// Checks that both artifacts exist and, when a manifest is present, that
    /// their digests match it.
    pub fn verify(&self) -> Result<(), ArtifactError> {
        self.ensure_present()?;

        let manifest = match self.read_manifest()? {
            Some(manifest) => manifest,
            None => {
                log::info!("No manifest in {:?}, skipping digest verification", self.artifacts_dir);
                return Ok(());
            }
        };

        self.verify_file(&self.vectorizer_path(), &manifest.vectorizer_sha256, "vectorizer")?;
        self.verify_file(&self.classifier_path(), &manifest.classifier_sha256, "classifier")?;
        log::info!("Artifacts in {:?} verified", self.artifacts_dir);
        Ok(())
    }

    fn ensure_present(&self) -> Result<(), ArtifactError> {
        for path in [self.vectorizer_path(), self.classifier_path()] {
            if !path.exists() {
                return Err(ArtifactError::NotFound(path));
            }
        }
        Ok(())
    }

    fn verify_file(&self, path: &Path, expected_hash: &str, file_type: &str) -> Result<(), ArtifactError> {
        let hash = sha256_file(path)?;
        log::debug!("{} hash: {} (expected {})", file_type, hash, expected_hash);
        if !hash.eq_ignore_ascii_case(expected_hash) {
            log::warn!("{} hash mismatch: expected {}, got {}", file_type, expected_hash, hash);
            return Err(ArtifactError::HashMismatch {
                file_type: file_type.to_string(),
                expected: expected_hash.to_string(),
                actual: hash,
            });
        }
        Ok(())
    }
}

/// Lowercase hex SHA-256 of the file at `path`.
pub fn sha256_file(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(VECTORIZER_FILE), "{}").unwrap();
        fs::write(dir.path().join(JSON_CLASSIFIER_FILE), "{}").unwrap();
        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_default_artifacts_dir() {
        // Test with environment variable
        env::set_var(ARTIFACTS_ENV, "/tmp/test-tingia");
        let path = ArtifactStore::get_default_artifacts_dir();
        assert_eq!(path, PathBuf::from("/tmp/test-tingia"));
        env::remove_var(ARTIFACTS_ENV);

        // Test without environment variable
        let path = ArtifactStore::get_default_artifacts_dir();
        assert!(path.ends_with("tingia/artifacts"));
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(!store.is_complete());
        assert!(matches!(store.verify(), Err(ArtifactError::NotFound(_))));
    }

    #[test]
    fn test_onnx_classifier_is_preferred() {
        let (dir, store) = populated_store();
        assert!(store.classifier_path().ends_with(JSON_CLASSIFIER_FILE));
        fs::write(dir.path().join(ONNX_CLASSIFIER_FILE), b"onnx").unwrap();
        assert!(store.classifier_path().ends_with(ONNX_CLASSIFIER_FILE));
    }

    #[test]
    fn test_verify_without_manifest() {
        let (_dir, store) = populated_store();
        assert!(store.is_complete());
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_manifest_round_trip() {
        let (dir, store) = populated_store();
        let manifest = store.write_manifest().unwrap();
        assert_eq!(manifest.vectorizer_sha256.len(), 64);
        assert_eq!(store.read_manifest().unwrap(), Some(manifest));
        assert!(store.verify().is_ok());

        // Corrupt file and verify
        fs::write(dir.path().join(JSON_CLASSIFIER_FILE), "corrupted data").unwrap();
        match store.verify() {
            Err(ArtifactError::HashMismatch { file_type, .. }) => assert_eq!(file_type, "classifier"),
            other => panic!("expected hash mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_manifest() {
        let (dir, store) = populated_store();
        fs::write(dir.path().join(MANIFEST_FILE), "not json").unwrap();
        assert!(matches!(store.verify(), Err(ArtifactError::InvalidManifest(_))));
    }

    #[test]
    fn test_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
