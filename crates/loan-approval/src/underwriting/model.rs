use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::schema::{EncodedFeatureVector, FeatureSchema};

/// Trained binary classifier consumed as a black box.
///
/// Implementations must be safe to share read-only across request handlers.
pub trait LoanClassifier: Send + Sync {
    /// Ordered feature columns the model was trained on.
    fn required_columns(&self) -> &[String];

    /// Predicted class, `1` for approval and `0` for denial.
    fn predict(&self, features: &EncodedFeatureVector) -> Result<u8, ModelError>;

    /// Class probabilities `[p0, p1]`.
    fn predict_proba(&self, features: &EncodedFeatureVector) -> Result<[f64; 2], ModelError>;
}

impl<T: LoanClassifier + ?Sized> LoanClassifier for Arc<T> {
    fn required_columns(&self) -> &[String] {
        (**self).required_columns()
    }

    fn predict(&self, features: &EncodedFeatureVector) -> Result<u8, ModelError> {
        (**self).predict(features)
    }

    fn predict_proba(&self, features: &EncodedFeatureVector) -> Result<[f64; 2], ModelError> {
        (**self).predict_proba(features)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unable to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact {path} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("feature row has {actual} columns in a different layout than the {expected} the model expects")]
    FeatureLayout { expected: usize, actual: usize },
    #[error("model produced invalid probabilities [{p0}, {p1}]")]
    InvalidProbabilities { p0: f64, p1: f64 },
}

/// Per-column standardization applied before the linear term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardization {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk layout of a fitted logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    #[serde(default)]
    pub model_name: Option<String>,
    pub feature_names_in: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub standardization: Option<Standardization>,
}

/// Logistic regression scored from stored coefficients.
#[derive(Debug, Clone)]
pub struct LogisticRegressionModel {
    name: String,
    schema: FeatureSchema,
    coefficients: Vec<f64>,
    intercept: f64,
    standardization: Option<Standardization>,
}

impl LogisticRegressionModel {
    pub fn from_artifact(artifact: LogisticRegressionArtifact) -> Result<Self, ModelError> {
        let LogisticRegressionArtifact {
            model_name,
            feature_names_in,
            coefficients,
            intercept,
            standardization,
        } = artifact;

        if feature_names_in.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "feature_names_in must list at least one column".to_string(),
            ));
        }
        if coefficients.len() != feature_names_in.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} coefficients for {} feature columns",
                coefficients.len(),
                feature_names_in.len()
            )));
        }
        if !intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "coefficients and intercept must be finite".to_string(),
            ));
        }
        if let Some(scaler) = &standardization {
            if scaler.mean.len() != feature_names_in.len()
                || scaler.scale.len() != feature_names_in.len()
            {
                return Err(ModelError::InvalidArtifact(
                    "standardization must cover every feature column".to_string(),
                ));
            }
            if scaler
                .scale
                .iter()
                .chain(&scaler.mean)
                .any(|value| !value.is_finite())
                || scaler.scale.iter().any(|value| *value == 0.0)
            {
                return Err(ModelError::InvalidArtifact(
                    "standardization scale must be finite and non-zero".to_string(),
                ));
            }
        }

        let schema = FeatureSchema::new(feature_names_in).map_err(|column| {
            ModelError::InvalidArtifact(format!("feature column '{column}' appears twice"))
        })?;

        Ok(Self {
            name: model_name.unwrap_or_else(|| "logistic-regression".to_string()),
            schema,
            coefficients,
            intercept,
            standardization,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: LogisticRegressionArtifact =
            serde_json::from_str(raw).map_err(|source| ModelError::Format {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        Self::from_artifact(artifact)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: LogisticRegressionArtifact =
            serde_json::from_str(&raw).map_err(|source| ModelError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        let model = Self::from_artifact(artifact)?;

        info!(
            model = %model.name,
            columns = model.schema.len(),
            path = %path.display(),
            "loaded loan classifier"
        );
        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Linear term `intercept + Σ coef · x`, after optional standardization.
    pub fn decision_function(&self, features: &EncodedFeatureVector) -> Result<f64, ModelError> {
        if !features.conforms_to(self.schema.columns()) {
            return Err(ModelError::FeatureLayout {
                expected: self.schema.len(),
                actual: features.len(),
            });
        }

        let score = features
            .values()
            .enumerate()
            .map(|(index, value)| {
                let value = match &self.standardization {
                    Some(scaler) => (value - scaler.mean[index]) / scaler.scale[index],
                    None => value,
                };
                self.coefficients[index] * value
            })
            .sum::<f64>();

        Ok(self.intercept + score)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LoanClassifier for LogisticRegressionModel {
    fn required_columns(&self) -> &[String] {
        self.schema.columns()
    }

    fn predict(&self, features: &EncodedFeatureVector) -> Result<u8, ModelError> {
        let z = self.decision_function(features)?;
        Ok(u8::from(z > 0.0))
    }

    fn predict_proba(&self, features: &EncodedFeatureVector) -> Result<[f64; 2], ModelError> {
        let p1 = sigmoid(self.decision_function(features)?);
        Ok([1.0 - p1, p1])
    }
}

/// Load-once handle to the model artifact at a fixed path.
///
/// The first successful load is kept for the lifetime of the handle; failed
/// loads are not cached.
#[derive(Debug)]
pub struct CachedModel {
    path: PathBuf,
    model: OnceLock<Arc<LogisticRegressionModel>>,
}

impl CachedModel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            model: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<LogisticRegressionModel>, ModelError> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }

        let loaded = Arc::new(LogisticRegressionModel::load(&self.path)?);
        Ok(self.model.get_or_init(|| loaded).clone())
    }
}
