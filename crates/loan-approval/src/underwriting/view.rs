use chrono::{DateTime, Utc};
use serde::Serialize;

use super::decision::{Decision, DecisionLabel};
use super::domain::ApplicantRecord;

const INDICATOR_WIDTH: usize = 20;

/// One labelled line of the applicant summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub label: &'static str,
    pub value: String,
}

/// Display-ready decision card shared by the HTTP and CLI surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionView {
    pub decision: DecisionLabel,
    pub headline: &'static str,
    pub confidence: f64,
    pub confidence_percent: String,
    pub confidence_bar: String,
    pub message: String,
    pub applicant: Vec<SummaryEntry>,
    pub evaluated_at: DateTime<Utc>,
}

impl DecisionView {
    pub fn render(
        applicant: &ApplicantRecord,
        decision: &Decision,
        evaluated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            decision: decision.label,
            headline: decision.label.headline(),
            confidence: decision.confidence,
            confidence_percent: decision.confidence_percent(),
            confidence_bar: confidence_bar(decision.confidence),
            message: decision.summary(),
            applicant: applicant_summary(applicant),
            evaluated_at,
        }
    }

    /// Plain-text card for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::from("Loan applicant summary\n");
        let width = self
            .applicant
            .iter()
            .map(|entry| entry.label.len())
            .max()
            .unwrap_or(0);
        for entry in &self.applicant {
            out.push_str(&format!(
                "- {:<width$}  {}\n",
                entry.label,
                entry.value,
                width = width
            ));
        }
        out.push('\n');
        out.push_str(&self.message);
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            self.confidence_bar, self.confidence_percent
        ));
        out
    }
}

/// Proportional indicator, e.g. `[#############-------]`.
pub fn confidence_bar(confidence: f64) -> String {
    let clamped = confidence.clamp(0.0, 1.0);
    let filled = (clamped * INDICATOR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(INDICATOR_WIDTH - filled)
    )
}

fn dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn applicant_summary(applicant: &ApplicantRecord) -> Vec<SummaryEntry> {
    let bankrupt = if applicant.ever_bankrupt_or_foreclosed == 1 {
        "Yes"
    } else {
        "No"
    };

    vec![
        SummaryEntry {
            label: "Requested Loan Amount",
            value: dollars(applicant.requested_loan_amount),
        },
        SummaryEntry {
            label: "FICO Score",
            value: applicant.fico_score.to_string(),
        },
        SummaryEntry {
            label: "Monthly Gross Income",
            value: dollars(applicant.monthly_gross_income),
        },
        SummaryEntry {
            label: "Monthly Housing Payment",
            value: dollars(applicant.monthly_housing_payment),
        },
        SummaryEntry {
            label: "Ever Bankrupt or Foreclosure",
            value: bankrupt.to_string(),
        },
        SummaryEntry {
            label: "Reason for Loan",
            value: applicant.reason.to_string(),
        },
        SummaryEntry {
            label: "FICO Score Group",
            value: applicant.fico_score_group.to_string(),
        },
        SummaryEntry {
            label: "Employment Status",
            value: applicant.employment_status.to_string(),
        },
        SummaryEntry {
            label: "Employment Sector",
            value: applicant.employment_sector.to_string(),
        },
        SummaryEntry {
            label: "Lender",
            value: applicant.lender.to_string(),
        },
    ]
}
