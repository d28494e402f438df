use crate::infra::command_renderer;
use clap::Args;
use loan_approval::error::AppError;
use loan_approval::underwriting::{
    ApplicantRecord, EmploymentSector, EmploymentStatus, FicoScoreGroup,
    FormSchema, Lender, LoanReason,
};
use std::path::PathBuf;

/// Intake form fields as command-line flags. Defaults match the form's
/// initial slider and selector positions.
#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Requested loan amount (0-50000, step 500)
    #[arg(long, default_value_t = 0)]
    pub(crate) requested_loan_amount: i64,
    /// FICO score (300-850, step 5)
    #[arg(long, default_value_t = 300)]
    pub(crate) fico_score: i64,
    /// Monthly gross income (0-20000, step 100)
    #[arg(long, default_value_t = 0)]
    pub(crate) monthly_gross_income: i64,
    /// Monthly housing payment (0-5000, step 50)
    #[arg(long, default_value_t = 0)]
    pub(crate) monthly_housing_payment: i64,
    /// Ever bankrupt or foreclosed (0 or 1)
    #[arg(long, default_value_t = 0)]
    pub(crate) ever_bankrupt_or_foreclosed: i64,
    /// Reason for the loan
    #[arg(long, default_value_t = LoanReason::DebtConsolidation)]
    pub(crate) reason: LoanReason,
    /// FICO score group
    #[arg(long, default_value_t = FicoScoreGroup::Poor)]
    pub(crate) fico_score_group: FicoScoreGroup,
    /// Employment status
    #[arg(long, default_value_t = EmploymentStatus::Employed)]
    pub(crate) employment_status: EmploymentStatus,
    /// Employment sector
    #[arg(long, default_value_t = EmploymentSector::Healthcare)]
    pub(crate) employment_sector: EmploymentSector,
    /// Lender
    #[arg(long, default_value_t = Lender::LenderA)]
    pub(crate) lender: Lender,
    /// Print the decision as JSON instead of a text card
    #[arg(long)]
    pub(crate) json: bool,
}

impl EvaluateArgs {
    pub(crate) fn applicant(&self) -> ApplicantRecord {
        ApplicantRecord {
            requested_loan_amount: self.requested_loan_amount,
            fico_score: self.fico_score,
            monthly_gross_income: self.monthly_gross_income,
            monthly_housing_payment: self.monthly_housing_payment,
            ever_bankrupt_or_foreclosed: self.ever_bankrupt_or_foreclosed,
            reason: self.reason,
            fico_score_group: self.fico_score_group,
            employment_status: self.employment_status,
            employment_sector: self.employment_sector,
            lender: self.lender,
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs, model: Option<PathBuf>) -> Result<(), AppError> {
    let renderer = command_renderer(model)?;

    let evaluation = renderer.evaluate(&args.applicant())?;
    let view = evaluation.view();

    if args.json {
        let rendered = serde_json::to_string_pretty(&view)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        print!("{}", view.to_text());
    }

    Ok(())
}

pub(crate) fn run_schema(model: Option<PathBuf>) -> Result<(), AppError> {
    let renderer = command_renderer(model)?;

    let schema = FormSchema::describe(renderer.encoder());
    let rendered = serde_json::to_string_pretty(&schema)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    println!("{rendered}");
    Ok(())
}
