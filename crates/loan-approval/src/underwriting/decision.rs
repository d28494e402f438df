use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::ApplicantRecord;
use super::encoder::FeatureEncoder;
use super::model::{LoanClassifier, ModelError};
use super::schema::{EncodedFeatureVector, FeatureSchema};
use super::validation::ValidationError;
use super::view::DecisionView;

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Approve or deny, as returned to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLabel {
    Approved,
    Denied,
}

impl DecisionLabel {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionLabel::Approved => "approved",
            DecisionLabel::Denied => "denied",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            DecisionLabel::Approved => "Loan APPROVED",
            DecisionLabel::Denied => "Loan DENIED",
        }
    }
}

/// Classifier verdict and the probability mass it gave that verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub label: DecisionLabel,
    pub confidence: f64,
    pub probabilities: [f64; 2],
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        self.label == DecisionLabel::Approved
    }

    /// Confidence as a percentage with one decimal, e.g. `87.3%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} (Confidence: {})",
            self.label.headline(),
            self.confidence_percent()
        )
    }
}

/// Full result of one evaluate cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanEvaluation {
    pub applicant: ApplicantRecord,
    pub features: EncodedFeatureVector,
    pub decision: Decision,
    pub evaluated_at: DateTime<Utc>,
}

impl LoanEvaluation {
    pub fn view(&self) -> DecisionView {
        DecisionView::render(&self.applicant, &self.decision, self.evaluated_at)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("encoded features do not match the model schema (expected {expected:?}, got {actual:?})")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Scores encoded rows with the classifier and maps the output to a decision.
pub struct DecisionRenderer<C: ?Sized> {
    classifier: Arc<C>,
    encoder: FeatureEncoder,
}

impl<C> DecisionRenderer<C>
where
    C: LoanClassifier + ?Sized,
{
    pub fn new(classifier: Arc<C>) -> Result<Self, ModelError> {
        let schema = FeatureSchema::new(classifier.required_columns().to_vec()).map_err(
            |column| {
                ModelError::InvalidArtifact(format!("feature column '{column}' appears twice"))
            },
        )?;
        if schema.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "classifier declares no feature columns".to_string(),
            ));
        }

        Ok(Self {
            classifier,
            encoder: FeatureEncoder::new(schema),
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn classifier(&self) -> &Arc<C> {
        &self.classifier
    }

    /// Encode a record and confirm the row matches the classifier schema.
    pub fn encode(&self, record: &ApplicantRecord) -> Result<EncodedFeatureVector, EvaluationError> {
        let features = self.encoder.encode(record);
        let expected = self.classifier.required_columns();
        if !features.conforms_to(expected) {
            return Err(EvaluationError::SchemaMismatch {
                expected: expected.to_vec(),
                actual: features.columns().map(str::to_string).collect(),
            });
        }
        Ok(features)
    }

    /// Run the classifier on an aligned row.
    pub fn decide(&self, features: &EncodedFeatureVector) -> Result<Decision, EvaluationError> {
        let predicted = self.classifier.predict(features)?;
        let probabilities = self.classifier.predict_proba(features)?;
        let [p0, p1] = probabilities;

        if !p0.is_finite()
            || !p1.is_finite()
            || !(0.0..=1.0).contains(&p0)
            || !(0.0..=1.0).contains(&p1)
            || (p0 + p1 - 1.0).abs() > PROBABILITY_TOLERANCE
        {
            return Err(ModelError::InvalidProbabilities { p0, p1 }.into());
        }

        let (label, confidence) = if predicted == 1 {
            (DecisionLabel::Approved, p1)
        } else {
            (DecisionLabel::Denied, p0)
        };

        if (predicted == 1 && p1 < p0) || (predicted != 1 && p0 < p1) {
            warn!(
                predicted,
                p0, p1, "classifier prediction disagrees with its probabilities"
            );
        }

        Ok(Decision {
            label,
            confidence,
            probabilities,
        })
    }

    /// Validate, encode, and score one applicant.
    pub fn evaluate(&self, record: &ApplicantRecord) -> Result<LoanEvaluation, EvaluationError> {
        record.validate()?;
        let features = self.encode(record)?;
        debug!(columns = features.len(), "encoded applicant features");

        let decision = self.decide(&features)?;
        info!(
            decision = decision.label.label(),
            confidence = decision.confidence,
            requested_loan_amount = record.requested_loan_amount,
            "loan application evaluated"
        );

        Ok(LoanEvaluation {
            applicant: record.clone(),
            features,
            decision,
            evaluated_at: Utc::now(),
        })
    }
}
