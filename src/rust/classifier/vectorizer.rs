use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;
use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{normalize_l1, normalize_l2};

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization applied after IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    #[serde(rename = "l1")]
    L1,
    #[serde(rename = "l2")]
    L2,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

/// The frozen state of a fitted scikit-learn `TfidfVectorizer`, as exported to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerParams {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
}

/// Maps normalized text to TF-IDF features over a fixed vocabulary.
///
/// Terms outside the vocabulary are ignored, so an input made only of unknown
/// words maps to the zero vector.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    lowercase: bool,
    pattern: Regex,
}

impl TfidfVectorizer {
    /// Validates the exported parameters and compiles the token pattern.
    pub fn from_params(params: VectorizerParams) -> Result<Self, ClassifierError> {
        let n_features = params.idf.len();
        if params.vocabulary.len() != n_features {
            return Err(ClassifierError::ArtifactLoad(format!(
                "Vectorizer vocabulary has {} terms but idf has {} weights",
                params.vocabulary.len(),
                n_features
            )));
        }

        let mut seen = vec![false; n_features];
        for (term, &idx) in &params.vocabulary {
            if idx >= n_features || seen[idx] {
                return Err(ClassifierError::ArtifactLoad(format!(
                    "Vectorizer term {:?} has invalid or duplicate index {}",
                    term, idx
                )));
            }
            seen[idx] = true;
        }

        if let Some(pos) = params.idf.iter().position(|w| !w.is_finite()) {
            return Err(ClassifierError::ArtifactLoad(format!("Vectorizer idf weight {} is not finite", pos)));
        }

        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ArtifactLoad(format!(
                "Invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let pattern = Regex::new(&params.token_pattern).map_err(|e| {
            ClassifierError::ArtifactLoad(format!("Invalid token pattern {:?}: {}", params.token_pattern, e))
        })?;

        Ok(Self {
            vocabulary: params.vocabulary,
            idf: Array1::from(params.idf),
            ngram_range: params.ngram_range,
            sublinear_tf: params.sublinear_tf,
            norm: params.norm,
            lowercase: params.lowercase,
            pattern,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let params: VectorizerParams = serde_json::from_str(json)
            .map_err(|e| ClassifierError::ArtifactLoad(format!("Failed to parse vectorizer: {}", e)))?;
        Self::from_params(params)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ClassifierError::ArtifactLoad(format!("Failed to read vectorizer {:?}: {}", path, e))
        })?;
        let vectorizer = Self::from_json(&json)?;
        info!(
            "Vectorizer loaded from {:?} ({} features, ngram_range {:?})",
            path,
            vectorizer.n_features(),
            vectorizer.ngram_range
        );
        Ok(vectorizer)
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Splits text into the terms the vocabulary is keyed on: tokens matched by
    /// the token pattern, expanded to every n-gram in `ngram_range`.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };
        let tokens = self.tokenize(&text);

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Term counts weighted by IDF and row-normalized.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut features = Array1::<f64>::zeros(self.n_features());
        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                features[idx] += 1.0;
            }
        }

        if self.sublinear_tf {
            features.mapv_inplace(|count| if count > 0.0 { 1.0 + count.ln() } else { 0.0 });
        }
        features *= &self.idf;

        match self.norm {
            Some(Norm::L2) => normalize_l2(&mut features),
            Some(Norm::L1) => normalize_l1(&mut features),
            None => {}
        }
        features
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        // a pattern with one capture group yields the group, as in scikit-learn
        if self.pattern.captures_len() == 2 {
            self.pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect()
        } else {
            self.pattern.find_iter(text).map(|m| m.as_str()).collect()
        }
    }
}
