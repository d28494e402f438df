use serde::Serialize;

use super::domain::ApplicantRecord;

/// Inclusive range and slider granularity for a numeric intake field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumericDomain {
    pub field: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl NumericDomain {
    pub fn check(&self, value: i64) -> Result<(), ValidationError> {
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        if (value - self.min) % self.step != 0 {
            return Err(ValidationError::OffStep {
                field: self.field,
                value,
                step: self.step,
            });
        }
        Ok(())
    }
}

pub const REQUESTED_LOAN_AMOUNT_DOMAIN: NumericDomain = NumericDomain {
    field: "requested_loan_amount",
    label: "Requested Loan Amount",
    min: 0,
    max: 50_000,
    step: 500,
};

pub const FICO_SCORE_DOMAIN: NumericDomain = NumericDomain {
    field: "fico_score",
    label: "FICO Score",
    min: 300,
    max: 850,
    step: 5,
};

pub const MONTHLY_GROSS_INCOME_DOMAIN: NumericDomain = NumericDomain {
    field: "monthly_gross_income",
    label: "Monthly Gross Income",
    min: 0,
    max: 20_000,
    step: 100,
};

pub const MONTHLY_HOUSING_PAYMENT_DOMAIN: NumericDomain = NumericDomain {
    field: "monthly_housing_payment",
    label: "Monthly Housing Payment",
    min: 0,
    max: 5_000,
    step: 50,
};

pub const NUMERIC_DOMAINS: [NumericDomain; 4] = [
    REQUESTED_LOAN_AMOUNT_DOMAIN,
    FICO_SCORE_DOMAIN,
    MONTHLY_GROSS_INCOME_DOMAIN,
    MONTHLY_HOUSING_PAYMENT_DOMAIN,
];

/// Input-domain violation detected before any encoding takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep {
        field: &'static str,
        value: i64,
        step: i64,
    },
    #[error("{field} must be 0 or 1, got {value}")]
    NotBinary { field: &'static str, value: i64 },
    #[error("{field} does not accept '{value}'")]
    UnknownCategory { field: &'static str, value: String },
}

impl ApplicantRecord {
    /// Reject values the intake form could never have produced.
    pub fn validate(&self) -> Result<(), ValidationError> {
        REQUESTED_LOAN_AMOUNT_DOMAIN.check(self.requested_loan_amount)?;
        FICO_SCORE_DOMAIN.check(self.fico_score)?;
        MONTHLY_GROSS_INCOME_DOMAIN.check(self.monthly_gross_income)?;
        MONTHLY_HOUSING_PAYMENT_DOMAIN.check(self.monthly_housing_payment)?;

        if !matches!(self.ever_bankrupt_or_foreclosed, 0 | 1) {
            return Err(ValidationError::NotBinary {
                field: "ever_bankrupt_or_foreclosed",
                value: self.ever_bankrupt_or_foreclosed,
            });
        }

        Ok(())
    }
}
