//! Loan approval scoring: applicant intake, feature alignment against a trained
//! classifier schema, and approve/deny decisions with a confidence score.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod underwriting;
