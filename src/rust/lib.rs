//! Vietnamese news text normalization and fake-news credibility classification.
//!
//! # Normalization
//!
//! ```rust
//! let text = tingia::normalize("Đây là tin TUYỆT VỜI!!! 😀 http://example.com", false);
//! assert_eq!(text, "đây là tin tuyệt_vời !");
//!
//! let text = tingia::normalize("Đây là tin tuyệt vời!", true);
//! assert_eq!(text, "tuyệt_vời !");
//! ```
//!
//! # Classification
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tingia::CredibilityClassifier;
//!
//! let classifier = CredibilityClassifier::builder()
//!     .with_artifacts_dir("artifacts")?
//!     .build()?;
//!
//! let verdict = classifier.evaluate("Tin nóng", "Đây là tin tuyệt vời!")?;
//! println!("{} ({:.1}%)", verdict.credibility_label, verdict.confidence_score * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is read-only after construction and can be shared across
//! threads using `Arc`:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tingia::CredibilityClassifier;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(CredibilityClassifier::builder()
//!     .with_artifacts_dir("artifacts")?
//!     .build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.evaluate("Tiêu đề", "Nội dung").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact_store;
pub mod classifier;
pub mod normalizer;
mod runtime;

pub use artifact_store::{ArtifactError, ArtifactManifest, ArtifactStore};
pub use classifier::{
    BinaryLabel, ClassProbabilities, ClassifierArtifacts, ClassifierBuilder, ClassifierError, ClassifierInfo,
    CredibilityClassifier, CredibilityLabel, PredictionVerdict, ProbabilisticModel, PublicationStatus,
    CREDIBILITY_THRESHOLD,
};
pub use normalizer::{normalize, NormalizerBuilder, TextNormalizer};
pub use runtime::RuntimeConfig;

/// Installs `env_logger` as the `log` backend, filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logger() {
    let _ = env_logger::try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice() {
        init_logger();
        init_logger();
        log::info!("logger installed");
    }
}
