use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::underwriting::domain::{
    ApplicantRecord, EmploymentSector, EmploymentStatus, FicoScoreGroup, Lender, LoanReason,
};
use crate::underwriting::model::{
    LoanClassifier, LogisticRegressionArtifact, LogisticRegressionModel, ModelError,
};
use crate::underwriting::schema::{EncodedFeatureVector, FeatureSchema};
use crate::underwriting::{DecisionRenderer, FeatureEncoder};

/// Coefficients per training column, drop-first baselines omitted.
pub(super) const TRAINED_COEFFICIENTS: [(&str, f64); 23] = [
    ("Requested_Loan_Amount", -0.00008),
    ("FICO_score", 0.018),
    ("Monthly_Gross_Income", 0.0006),
    ("Monthly_Housing_Payment", -0.0012),
    ("Ever_Bankrupt_or_Foreclose", -1.4),
    ("Reason_DebtConsolidation", 0.15),
    ("Reason_HomeImprovement", 0.25),
    ("Reason_Major_purchase", 0.05),
    ("Reason_Medical", -0.2),
    ("Reason_Other", -0.1),
    ("Fico_Score_group_Fair", -1.1),
    ("Fico_Score_group_Good", -0.6),
    ("Fico_Score_group_Poor", -1.8),
    ("Fico_Score_group_Very Good", -0.25),
    ("Employment_Status_self-employed", -0.3),
    ("Employment_Status_unemployed", -1.6),
    ("Employment_Sector_Finance", 0.1),
    ("Employment_Sector_Healthcare", 0.15),
    ("Employment_Sector_Other", -0.05),
    ("Employment_Sector_Retail", -0.2),
    ("Employment_Sector_Technology", 0.12),
    ("Lender_Lender_B", -0.35),
    ("Lender_Lender_C", -0.7),
];

pub(super) fn training_columns() -> Vec<String> {
    TRAINED_COEFFICIENTS
        .iter()
        .map(|(column, _)| column.to_string())
        .collect()
}

pub(super) fn training_schema() -> FeatureSchema {
    FeatureSchema::new(training_columns()).expect("training columns are unique")
}

pub(super) fn encoder() -> FeatureEncoder {
    FeatureEncoder::new(training_schema())
}

pub(super) fn logistic_model() -> LogisticRegressionModel {
    LogisticRegressionModel::from_artifact(LogisticRegressionArtifact {
        model_name: Some("loan-approval-fixture".to_string()),
        feature_names_in: training_columns(),
        coefficients: TRAINED_COEFFICIENTS.iter().map(|(_, coef)| *coef).collect(),
        intercept: -11.5,
        standardization: None,
    })
    .expect("fixture artifact is valid")
}

pub(super) fn renderer() -> DecisionRenderer<LogisticRegressionModel> {
    DecisionRenderer::new(Arc::new(logistic_model())).expect("renderer builds")
}

/// The worked example from the intake form defaults.
pub(super) fn applicant() -> ApplicantRecord {
    ApplicantRecord {
        requested_loan_amount: 10_000,
        fico_score: 650,
        monthly_gross_income: 4_000,
        monthly_housing_payment: 1_000,
        ever_bankrupt_or_foreclosed: 0,
        reason: LoanReason::Other,
        fico_score_group: FicoScoreGroup::Good,
        employment_status: EmploymentStatus::Employed,
        employment_sector: EmploymentSector::Other,
        lender: Lender::LenderA,
    }
}

pub(super) fn strong_applicant() -> ApplicantRecord {
    ApplicantRecord {
        requested_loan_amount: 5_000,
        fico_score: 780,
        monthly_gross_income: 9_000,
        monthly_housing_payment: 1_500,
        ever_bankrupt_or_foreclosed: 0,
        reason: LoanReason::HomeImprovement,
        fico_score_group: FicoScoreGroup::Exceptional,
        employment_status: EmploymentStatus::Employed,
        employment_sector: EmploymentSector::Technology,
        lender: Lender::LenderA,
    }
}

pub(super) fn weak_applicant() -> ApplicantRecord {
    ApplicantRecord {
        requested_loan_amount: 45_000,
        fico_score: 520,
        monthly_gross_income: 2_000,
        monthly_housing_payment: 1_800,
        ever_bankrupt_or_foreclosed: 1,
        reason: LoanReason::Medical,
        fico_score_group: FicoScoreGroup::Poor,
        employment_status: EmploymentStatus::Unemployed,
        employment_sector: EmploymentSector::Retail,
        lender: Lender::LenderC,
    }
}

/// Classifier returning canned outputs and counting invocations.
pub(super) struct StubClassifier {
    pub(super) columns: Vec<String>,
    pub(super) label: u8,
    pub(super) probabilities: [f64; 2],
    pub(super) calls: AtomicUsize,
}

impl StubClassifier {
    pub(super) fn new(label: u8, probabilities: [f64; 2]) -> Self {
        Self {
            columns: training_columns(),
            label,
            probabilities,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LoanClassifier for StubClassifier {
    fn required_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, _features: &EncodedFeatureVector) -> Result<u8, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.label)
    }

    fn predict_proba(&self, _features: &EncodedFeatureVector) -> Result<[f64; 2], ModelError> {
        Ok(self.probabilities)
    }
}

/// Classifier whose declared layout can be swapped after the renderer is built.
pub(super) struct RetrainedClassifier {
    pub(super) inner: StubClassifier,
    pub(super) retrained_columns: Vec<String>,
    pub(super) retrained: AtomicBool,
}

impl RetrainedClassifier {
    pub(super) fn new(retrained_columns: Vec<String>) -> Self {
        Self {
            inner: StubClassifier::new(1, [0.1, 0.9]),
            retrained_columns,
            retrained: AtomicBool::new(false),
        }
    }

    pub(super) fn retrain(&self) {
        self.retrained.store(true, Ordering::SeqCst);
    }
}

impl LoanClassifier for RetrainedClassifier {
    fn required_columns(&self) -> &[String] {
        if self.retrained.load(Ordering::SeqCst) {
            &self.retrained_columns
        } else {
            self.inner.required_columns()
        }
    }

    fn predict(&self, features: &EncodedFeatureVector) -> Result<u8, ModelError> {
        self.inner.predict(features)
    }

    fn predict_proba(&self, features: &EncodedFeatureVector) -> Result<[f64; 2], ModelError> {
        self.inner.predict_proba(features)
    }
}

pub(super) fn stub_renderer(
    label: u8,
    probabilities: [f64; 2],
) -> (Arc<StubClassifier>, DecisionRenderer<StubClassifier>) {
    let classifier = Arc::new(StubClassifier::new(label, probabilities));
    let renderer = DecisionRenderer::new(classifier.clone()).expect("renderer builds");
    (classifier, renderer)
}

pub(super) fn indicator_columns_set<'a>(
    features: &'a EncodedFeatureVector,
    field: &str,
) -> Vec<&'a str> {
    let prefix = format!("{field}_");
    features
        .iter()
        .filter(|(column, value)| column.starts_with(&prefix) && *value == 1.0)
        .map(|(column, _)| column)
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
