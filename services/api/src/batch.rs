use crate::infra::{command_renderer, LoanRenderer};
use clap::Args;
use loan_approval::error::AppError;
use loan_approval::underwriting::{ApplicantRecord, EvaluationError, LoanEvaluation};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV of applicants; headers may use the form or the training column names
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the decisions (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

/// One output line per input row.
#[derive(Debug, Serialize)]
struct BatchRow {
    row: usize,
    decision: Option<&'static str>,
    confidence: Option<f64>,
    confidence_percent: Option<String>,
    error: Option<String>,
}

/// What happened to one input row.
enum RowOutcome {
    Scored(LoanEvaluation),
    Rejected(String),
    Fatal(EvaluationError),
}

impl RowOutcome {
    fn from_row(renderer: &LoanRenderer, parsed: Result<ApplicantRecord, csv::Error>) -> Self {
        let record = match parsed {
            Ok(record) => record,
            Err(err) => return Self::Rejected(err.to_string()),
        };
        match renderer.evaluate(&record) {
            Ok(evaluation) => Self::Scored(evaluation),
            Err(EvaluationError::Validation(err)) => Self::Rejected(err.to_string()),
            Err(fatal) => Self::Fatal(fatal),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BatchSummary {
    pub(crate) approved: usize,
    pub(crate) denied: usize,
    pub(crate) rejected: usize,
}

pub(crate) fn run_batch(args: BatchArgs, model: Option<PathBuf>) -> Result<(), AppError> {
    let renderer = command_renderer(model)?;

    let input = File::open(&args.input)?;
    let summary = match args.output {
        Some(path) => score_csv(&renderer, input, File::create(path)?)?,
        None => score_csv(&renderer, input, io::stdout().lock())?,
    };

    info!(
        approved = summary.approved,
        denied = summary.denied,
        rejected = summary.rejected,
        "batch evaluation finished"
    );
    Ok(())
}

/// Evaluate each CSV row independently. Rows that fail to parse or validate
/// are reported in the output; model or schema failures stop the batch.
pub(crate) fn score_csv<R: Read, W: Write>(
    renderer: &LoanRenderer,
    input: R,
    output: W,
) -> Result<BatchSummary, AppError> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (index, parsed) in reader.deserialize::<ApplicantRecord>().enumerate() {
        let row = index + 1;

        let line = match RowOutcome::from_row(renderer, parsed) {
            RowOutcome::Scored(evaluation) => {
                let decision = evaluation.decision;
                if decision.is_approved() {
                    summary.approved += 1;
                } else {
                    summary.denied += 1;
                }
                BatchRow {
                    row,
                    decision: Some(decision.label.label()),
                    confidence: Some(decision.confidence),
                    confidence_percent: Some(decision.confidence_percent()),
                    error: None,
                }
            }
            RowOutcome::Rejected(message) => {
                warn!(row, error = %message, "skipping applicant row");
                summary.rejected += 1;
                BatchRow {
                    row,
                    decision: None,
                    confidence: None,
                    confidence_percent: None,
                    error: Some(message),
                }
            }
            RowOutcome::Fatal(fatal) => return Err(fatal.into()),
        };

        writer.serialize(line)?;
    }

    writer.flush()?;
    Ok(summary)
}
