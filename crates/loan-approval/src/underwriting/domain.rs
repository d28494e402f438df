use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Schema column names for the numeric inputs, as the classifier was trained on them.
pub const REQUESTED_LOAN_AMOUNT: &str = "Requested_Loan_Amount";
pub const FICO_SCORE: &str = "FICO_score";
pub const MONTHLY_GROSS_INCOME: &str = "Monthly_Gross_Income";
pub const MONTHLY_HOUSING_PAYMENT: &str = "Monthly_Housing_Payment";
pub const EVER_BANKRUPT_OR_FORECLOSE: &str = "Ever_Bankrupt_or_Foreclose";

/// One applicant as collected by the intake form. Constructed per evaluation.
///
/// JSON payloads use the snake_case names; CSV batches may use the training
/// column names instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    #[serde(alias = "Requested_Loan_Amount")]
    pub requested_loan_amount: i64,
    #[serde(alias = "FICO_score")]
    pub fico_score: i64,
    #[serde(alias = "Monthly_Gross_Income")]
    pub monthly_gross_income: i64,
    #[serde(alias = "Monthly_Housing_Payment")]
    pub monthly_housing_payment: i64,
    #[serde(alias = "Ever_Bankrupt_or_Foreclose")]
    pub ever_bankrupt_or_foreclosed: i64,
    #[serde(alias = "Reason")]
    pub reason: LoanReason,
    #[serde(alias = "Fico_Score_group")]
    pub fico_score_group: FicoScoreGroup,
    #[serde(alias = "Employment_Status")]
    pub employment_status: EmploymentStatus,
    #[serde(alias = "Employment_Sector")]
    pub employment_sector: EmploymentSector,
    #[serde(alias = "Lender")]
    pub lender: Lender,
}

impl ApplicantRecord {
    pub const NUMERIC_COLUMNS: [&'static str; 5] = [
        REQUESTED_LOAN_AMOUNT,
        FICO_SCORE,
        MONTHLY_GROSS_INCOME,
        MONTHLY_HOUSING_PAYMENT,
        EVER_BANKRUPT_OR_FORECLOSE,
    ];

    /// Numeric inputs keyed by their schema column, in form order.
    pub fn numeric_features(&self) -> [(&'static str, i64); 5] {
        [
            (REQUESTED_LOAN_AMOUNT, self.requested_loan_amount),
            (FICO_SCORE, self.fico_score),
            (MONTHLY_GROSS_INCOME, self.monthly_gross_income),
            (MONTHLY_HOUSING_PAYMENT, self.monthly_housing_payment),
            (EVER_BANKRUPT_OR_FORECLOSE, self.ever_bankrupt_or_foreclosed),
        ]
    }

    /// Categorical selections keyed by their training column prefix.
    pub fn categorical_features(&self) -> [CategoricalValue; 5] {
        [
            CategoricalValue::of(self.reason),
            CategoricalValue::of(self.fico_score_group),
            CategoricalValue::of(self.employment_status),
            CategoricalValue::of(self.employment_sector),
            CategoricalValue::of(self.lender),
        ]
    }
}

/// A fixed-vocabulary form field that the classifier consumes one-hot encoded.
pub trait CategoricalField: Copy + Sized + 'static {
    /// Column prefix used by the training-time encoder.
    const FIELD: &'static str;
    /// Every category the intake form offers, in form order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|value| value.label()).collect()
    }

    /// First category in byte-lexicographic order, the drop-first baseline
    /// the training encoder uses when the schema does not say otherwise.
    fn canonical_baseline() -> &'static str {
        Self::ALL
            .iter()
            .map(|value| value.label())
            .min()
            .unwrap_or_default()
    }
}

/// Type-erased view of one categorical selection, used by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalValue {
    pub field: &'static str,
    pub value: &'static str,
}

impl CategoricalValue {
    pub fn of<T: CategoricalField>(value: T) -> Self {
        Self {
            field: T::FIELD,
            value: value.label(),
        }
    }
}

/// Indicator column name produced for a non-baseline category.
pub fn indicator_column(field: &str, category: &str) -> String {
    format!("{field}_{category}")
}

/// Exact label match, the same rule serde applies to JSON and CSV input.
fn parse_category<T: CategoricalField>(raw: &str) -> Result<T, ValidationError> {
    T::ALL
        .iter()
        .copied()
        .find(|candidate| candidate.label() == raw)
        .ok_or_else(|| ValidationError::UnknownCategory {
            field: T::FIELD,
            value: raw.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanReason {
    DebtConsolidation,
    HomeImprovement,
    Other,
    Business,
    #[serde(rename = "Major_purchase")]
    MajorPurchase,
    Medical,
}

impl CategoricalField for LoanReason {
    const FIELD: &'static str = "Reason";
    const ALL: &'static [Self] = &[
        Self::DebtConsolidation,
        Self::HomeImprovement,
        Self::Other,
        Self::Business,
        Self::MajorPurchase,
        Self::Medical,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::DebtConsolidation => "DebtConsolidation",
            Self::HomeImprovement => "HomeImprovement",
            Self::Other => "Other",
            Self::Business => "Business",
            Self::MajorPurchase => "Major_purchase",
            Self::Medical => "Medical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FicoScoreGroup {
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Exceptional,
}

impl CategoricalField for FicoScoreGroup {
    const FIELD: &'static str = "Fico_Score_group";
    const ALL: &'static [Self] = &[
        Self::Poor,
        Self::Fair,
        Self::Good,
        Self::VeryGood,
        Self::Exceptional,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::VeryGood => "Very Good",
            Self::Exceptional => "Exceptional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    #[serde(rename = "employed")]
    Employed,
    #[serde(rename = "self-employed")]
    SelfEmployed,
    #[serde(rename = "unemployed")]
    Unemployed,
}

impl CategoricalField for EmploymentStatus {
    const FIELD: &'static str = "Employment_Status";
    const ALL: &'static [Self] = &[Self::Employed, Self::SelfEmployed, Self::Unemployed];

    fn label(self) -> &'static str {
        match self {
            Self::Employed => "employed",
            Self::SelfEmployed => "self-employed",
            Self::Unemployed => "unemployed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentSector {
    Healthcare,
    Technology,
    Finance,
    Education,
    Retail,
    Other,
}

impl CategoricalField for EmploymentSector {
    const FIELD: &'static str = "Employment_Sector";
    const ALL: &'static [Self] = &[
        Self::Healthcare,
        Self::Technology,
        Self::Finance,
        Self::Education,
        Self::Retail,
        Self::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Healthcare => "Healthcare",
            Self::Technology => "Technology",
            Self::Finance => "Finance",
            Self::Education => "Education",
            Self::Retail => "Retail",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lender {
    #[serde(rename = "Lender_A")]
    LenderA,
    #[serde(rename = "Lender_B")]
    LenderB,
    #[serde(rename = "Lender_C")]
    LenderC,
}

impl CategoricalField for Lender {
    const FIELD: &'static str = "Lender";
    const ALL: &'static [Self] = &[Self::LenderA, Self::LenderB, Self::LenderC];

    fn label(self) -> &'static str {
        match self {
            Self::LenderA => "Lender_A",
            Self::LenderB => "Lender_B",
            Self::LenderC => "Lender_C",
        }
    }
}

impl FromStr for LoanReason {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_category(raw)
    }
}

impl FromStr for FicoScoreGroup {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_category(raw)
    }
}

impl FromStr for EmploymentStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_category(raw)
    }
}

impl FromStr for EmploymentSector {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_category(raw)
    }
}

impl FromStr for Lender {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_category(raw)
    }
}

impl fmt::Display for LoanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for FicoScoreGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for EmploymentSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Lender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
