use serde::Serialize;

use super::domain::{
    CategoricalField, EmploymentSector, EmploymentStatus, FicoScoreGroup, Lender, LoanReason,
};
use super::encoder::FeatureEncoder;
use super::validation::{NumericDomain, NUMERIC_DOMAINS};

/// Selector definition for a categorical input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalInput {
    pub field: &'static str,
    pub column: &'static str,
    pub label: &'static str,
    pub options: Vec<&'static str>,
    pub baseline: &'static str,
}

/// Everything a client needs to render the intake form and interpret scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub numeric: Vec<NumericDomain>,
    pub binary: Vec<&'static str>,
    pub categorical: Vec<CategoricalInput>,
    pub model_columns: Vec<String>,
}

impl FormSchema {
    pub fn describe(encoder: &FeatureEncoder) -> Self {
        let categorical = vec![
            categorical_input::<LoanReason>(encoder, "reason", "Reason for Loan"),
            categorical_input::<FicoScoreGroup>(encoder, "fico_score_group", "FICO Score Group"),
            categorical_input::<EmploymentStatus>(
                encoder,
                "employment_status",
                "Employment Status",
            ),
            categorical_input::<EmploymentSector>(
                encoder,
                "employment_sector",
                "Employment Sector",
            ),
            categorical_input::<Lender>(encoder, "lender", "Lender"),
        ];

        Self {
            numeric: NUMERIC_DOMAINS.to_vec(),
            binary: vec!["ever_bankrupt_or_foreclosed"],
            categorical,
            model_columns: encoder.schema().columns().to_vec(),
        }
    }
}

fn categorical_input<T: CategoricalField>(
    encoder: &FeatureEncoder,
    field: &'static str,
    label: &'static str,
) -> CategoricalInput {
    CategoricalInput {
        field,
        column: T::FIELD,
        label,
        options: T::labels(),
        baseline: encoder
            .baseline(T::FIELD)
            .unwrap_or_else(T::canonical_baseline),
    }
}
