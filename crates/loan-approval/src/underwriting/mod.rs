//! Loan application scoring.
//!
//! Records are validated against the intake form's domains, one-hot encoded
//! against the classifier's trained column schema, and scored into an
//! approve/deny decision. Nothing here depends on a presentation surface; the
//! HTTP router and the CLI both render the same [`DecisionView`].

pub mod decision;
pub mod domain;
pub mod encoder;
pub mod form;
pub mod model;
pub mod router;
pub mod schema;
pub mod validation;
pub mod view;

#[cfg(test)]
mod tests;

pub use decision::{Decision, DecisionLabel, DecisionRenderer, EvaluationError, LoanEvaluation};
pub use domain::{
    ApplicantRecord, CategoricalField, EmploymentSector, EmploymentStatus, FicoScoreGroup, Lender,
    LoanReason,
};
pub use encoder::FeatureEncoder;
pub use form::FormSchema;
pub use model::{
    CachedModel, LoanClassifier, LogisticRegressionArtifact, LogisticRegressionModel, ModelError,
};
pub use router::loan_router;
pub use schema::{EncodedFeatureVector, FeatureSchema};
pub use validation::ValidationError;
pub use view::DecisionView;
