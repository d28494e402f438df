use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::domain::{
    indicator_column, ApplicantRecord, CategoricalField, EmploymentSector, EmploymentStatus,
    FicoScoreGroup, Lender, LoanReason,
};
use super::schema::{EncodedFeatureVector, FeatureSchema};

/// Turns applicant records into rows the classifier can score.
///
/// Baselines are resolved once per schema, so every encoding against the same
/// encoder drops the same category per field.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
    baselines: BTreeMap<&'static str, &'static str>,
}

impl FeatureEncoder {
    pub fn new(schema: FeatureSchema) -> Self {
        let mut baselines = BTreeMap::new();
        register_baseline::<LoanReason>(&schema, &mut baselines);
        register_baseline::<FicoScoreGroup>(&schema, &mut baselines);
        register_baseline::<EmploymentStatus>(&schema, &mut baselines);
        register_baseline::<EmploymentSector>(&schema, &mut baselines);
        register_baseline::<Lender>(&schema, &mut baselines);

        Self { schema, baselines }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn baseline(&self, field: &str) -> Option<&'static str> {
        self.baselines.get(field).copied()
    }

    /// Numeric columns copied verbatim plus one indicator per non-baseline
    /// selection. Columns the schema does not know are still present here.
    pub fn encode_raw(&self, record: &ApplicantRecord) -> Vec<(String, f64)> {
        let mut row: Vec<(String, f64)> = record
            .numeric_features()
            .into_iter()
            .map(|(column, value)| (column.to_string(), value as f64))
            .collect();

        for categorical in record.categorical_features() {
            if self.baseline(categorical.field) == Some(categorical.value) {
                continue;
            }
            row.push((indicator_column(categorical.field, categorical.value), 1.0));
        }

        row
    }

    /// Fill every missing schema column with 0 and project onto the schema order.
    pub fn align(&self, raw: Vec<(String, f64)>) -> EncodedFeatureVector {
        let mut produced: BTreeMap<String, f64> = BTreeMap::new();
        for (column, value) in raw {
            if self.schema.contains(&column) {
                produced.insert(column, value);
            } else if !is_numeric_column(&column) {
                warn!(
                    column = %column,
                    "category has no indicator column in the model schema; scoring as baseline"
                );
            } else {
                debug!(column = %column, "dropping column unknown to the model schema");
            }
        }

        let entries = self
            .schema
            .columns()
            .iter()
            .map(|column| {
                let value = produced.get(column).copied().unwrap_or(0.0);
                (column.clone(), value)
            })
            .collect();

        EncodedFeatureVector::from_entries(entries)
    }

    pub fn encode(&self, record: &ApplicantRecord) -> EncodedFeatureVector {
        self.align(self.encode_raw(record))
    }
}

fn is_numeric_column(column: &str) -> bool {
    ApplicantRecord::NUMERIC_COLUMNS.contains(&column)
}

fn register_baseline<T: CategoricalField>(
    schema: &FeatureSchema,
    baselines: &mut BTreeMap<&'static str, &'static str>,
) {
    let categories = T::labels();
    let canonical = T::canonical_baseline();
    let baseline = schema.baseline_for(T::FIELD, &categories, canonical);
    if baseline != canonical {
        debug!(
            field = T::FIELD,
            baseline, canonical, "model schema pins a non-canonical baseline"
        );
    }
    baselines.insert(T::FIELD, baseline);
}
