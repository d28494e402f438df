use crate::batch::{run_batch, BatchArgs};
use crate::evaluate::{run_evaluate, run_schema, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_approval::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Approval Predictor",
    about = "Score loan applicants against a trained approval model",
    version
)]
struct Cli {
    /// Model artifact to load instead of LOAN_MODEL_PATH
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a single applicant and print the decision card
    Evaluate(EvaluateArgs),
    /// Evaluate every applicant in a CSV file
    Batch(BatchArgs),
    /// Print the intake form fields and the model feature columns as JSON
    Schema,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let model = cli.model;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, model).await,
        Command::Evaluate(args) => run_evaluate(args, model),
        Command::Batch(args) => run_batch(args, model),
        Command::Schema => run_schema(model),
    }
}
