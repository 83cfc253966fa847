use std::collections::HashMap;
use std::path::Path;

use log::{error, info};
use ndarray::{Array1, Array2};
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};

use super::error::ClassifierError;
use super::model::{validate_classes, ClassScores, ProbabilisticModel};
use super::verdict::PredictionVerdict;
use crate::runtime::{create_session_builder, RuntimeConfig};

// Our own exports use the short names, skl2onnx the `output_` ones.
const LABEL_OUTPUTS: [&str; 2] = ["label", "output_label"];
const PROBABILITIES_OUTPUTS: [&str; 2] = ["probabilities", "output_probability"];

/// A binary classifier exported to ONNX, e.g. a scikit-learn pipeline
/// converted with `zipmap=False`.
///
/// The graph is expected to:
/// - accept one float input of shape [N, n_features]
/// - output an int64 label tensor of shape [N]
/// - output a float probabilities tensor of shape [N, 2]
///
/// Outputs are found by name (`label`/`output_label` and
/// `probabilities`/`output_probability`), otherwise by element type. A graph
/// that does not fit, including one that still ends in a ZipMap, is rejected
/// at load time.
#[derive(Debug)]
pub struct OnnxClassifier {
    model_path: String,
    session: Session,
    classes: Vec<i64>,
    input_name: String,
    label_output: usize,
    probabilities_output: usize,
    n_features: Option<usize>,
}

/// Name, element type and shape of one graph output. `element` is `None` for
/// non-tensor outputs such as sequences of maps.
#[derive(Debug, Clone, PartialEq)]
struct OutputSignature {
    name: String,
    element: Option<TensorElementType>,
    dimensions: Vec<i64>,
}

impl OutputSignature {
    fn new(name: &str, value_type: &ValueType) -> Self {
        let (element, dimensions) = match value_type {
            ValueType::Tensor { ty, dimensions, .. } => (Some(*ty), dimensions.clone()),
            _ => (None, Vec::new()),
        };
        Self {
            name: name.to_string(),
            element,
            dimensions,
        }
    }
}

impl OnnxClassifier {
    /// Loads the graph at `path`. `classes` lists the class values in the
    /// column order of the probabilities output.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        classes: Vec<i64>,
        config: &RuntimeConfig,
    ) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        validate_classes(&classes)?;

        if !path.exists() {
            return Err(ClassifierError::ArtifactLoad(format!("Model file not found: {:?}", path)));
        }

        let session = create_session_builder(config)?
            .commit_from_file(path)
            .map_err(|e| {
                error!("Failed to load ONNX classifier {:?}: {}", path, e);
                ClassifierError::ArtifactLoad(format!("Failed to load ONNX classifier {:?}: {}", path, e))
            })?;

        let (input_name, n_features) = Self::validate_model(&session)?;
        let outputs: Vec<OutputSignature> = session
            .outputs
            .iter()
            .map(|output| OutputSignature::new(&output.name, &output.output_type))
            .collect();
        let (label_output, probabilities_output) = select_outputs(&outputs).map_err(|e| {
            error!("Unusable ONNX classifier {:?}: {}", path, e);
            e
        })?;

        let classifier = Self {
            model_path: path.to_string_lossy().to_string(),
            session,
            classes,
            input_name,
            label_output,
            probabilities_output,
            n_features,
        };
        classifier.check_class_values()?;

        info!(
            "ONNX classifier loaded from {:?} (input {:?}, outputs {:?}/{:?}, {} features)",
            path,
            classifier.input_name,
            outputs[label_output].name,
            outputs[probabilities_output].name,
            n_features.map_or_else(|| "dynamic".to_string(), |n| n.to_string())
        );
        Ok(classifier)
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Validates that the model has one feature input and at least two outputs.
    /// Returns the input name and its static feature dimension, if any.
    fn validate_model(session: &Session) -> Result<(String, Option<usize>), ClassifierError> {
        let input = match session.inputs.as_slice() {
            [input] => input,
            inputs => {
                return Err(ClassifierError::ArtifactLoad(format!(
                    "Model must have exactly 1 feature input, found {}",
                    inputs.len()
                )))
            }
        };

        if session.outputs.len() < 2 {
            return Err(ClassifierError::ArtifactLoad(format!(
                "Model must have label and probabilities outputs, found {}",
                session.outputs.len()
            )));
        }

        let n_features = match &input.input_type {
            ValueType::Tensor { dimensions, .. } => {
                dimensions.get(1).copied().filter(|&d| d > 0).map(|d| d as usize)
            }
            _ => None,
        };
        Ok((input.name.clone(), n_features))
    }

    /// Runs the graph once on an all-zero row so that labels outside
    /// `classes` fail the load instead of every request.
    fn check_class_values(&self) -> Result<(), ClassifierError> {
        let Some(n_features) = self.n_features else {
            return Ok(());
        };
        self.predict(&Array1::zeros(n_features))
            .and_then(|scores| PredictionVerdict::from_scores(&self.classes, &scores, String::new()))
            .map(|_| ())
            .map_err(|e| {
                error!("ONNX classifier {:?} does not match classes {:?}: {}", self.model_path, self.classes, e);
                ClassifierError::ArtifactLoad(format!(
                    "ONNX classifier does not match classes {:?}: {}",
                    self.classes, e
                ))
            })
    }
}

/// Picks the label and probabilities outputs and checks their types.
fn select_outputs(outputs: &[OutputSignature]) -> Result<(usize, usize), ClassifierError> {
    let find = |names: &[&str], element: TensorElementType| {
        outputs
            .iter()
            .position(|output| names.iter().any(|name| *name == output.name))
            .or_else(|| outputs.iter().position(|output| output.element == Some(element)))
    };

    let label = find(&LABEL_OUTPUTS, TensorElementType::Int64)
        .ok_or_else(|| ClassifierError::ArtifactLoad("Model has no int64 label output".into()))?;
    let probabilities = find(&PROBABILITIES_OUTPUTS, TensorElementType::Float32)
        .ok_or_else(|| ClassifierError::ArtifactLoad("Model has no float probabilities output".into()))?;

    let label_output = &outputs[label];
    if label_output.element != Some(TensorElementType::Int64) {
        return Err(ClassifierError::ArtifactLoad(format!(
            "Label output {:?} must be an int64 tensor, found {:?}",
            label_output.name, label_output.element
        )));
    }

    let probabilities_output = &outputs[probabilities];
    if probabilities_output.element != Some(TensorElementType::Float32) {
        return Err(ClassifierError::ArtifactLoad(format!(
            "Probabilities output {:?} must be a float tensor, found {:?} (was the model exported with zipmap=False?)",
            probabilities_output.name, probabilities_output.element
        )));
    }
    // dynamic dimensions are reported as -1
    match probabilities_output.dimensions.as_slice() {
        [_, columns] if *columns == 2 || *columns < 0 => {}
        dimensions => {
            return Err(ClassifierError::ArtifactLoad(format!(
                "Probabilities output {:?} must have shape [N, 2], found {:?}",
                probabilities_output.name, dimensions
            )))
        }
    }

    Ok((label, probabilities))
}

impl ProbabilisticModel for OnnxClassifier {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict(&self, features: &Array1<f64>) -> Result<ClassScores, ClassifierError> {
        let input_array = Array2::from_shape_vec((1, features.len()), features.iter().map(|&x| x as f32).collect())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(input_array)
                .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;

        let labels = outputs[self.label_output]
            .try_extract_tensor::<i64>()
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to extract label tensor: {}", e)))?;
        let predicted = labels
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ClassifierError::PredictionError("Model returned no label".into()))?;

        let probabilities = outputs[self.probabilities_output]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifierError::PredictionError(format!("Failed to extract probabilities tensor: {}", e))
            })?
            .iter()
            .map(|&p| p as f64)
            .collect();

        Ok(ClassScores {
            predicted,
            probabilities,
        })
    }
}
