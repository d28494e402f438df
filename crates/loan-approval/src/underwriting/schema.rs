use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::domain::indicator_column;

/// Ordered column names the trained classifier expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    lookup: HashSet<String>,
}

impl FeatureSchema {
    /// Build a schema, returning the first repeated column if any.
    pub fn new(columns: Vec<String>) -> Result<Self, String> {
        let mut lookup = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !lookup.insert(column.clone()) {
                return Err(column.clone());
            }
        }
        Ok(Self { columns, lookup })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.lookup.contains(column)
    }

    /// Recover the drop-first baseline of a categorical field from the
    /// indicator columns the schema carries.
    ///
    /// Exactly one known category lacking an indicator column pins the
    /// baseline. Otherwise the canonical fallback applies.
    pub fn baseline_for(
        &self,
        field: &str,
        categories: &[&'static str],
        fallback: &'static str,
    ) -> &'static str {
        let mut missing = categories
            .iter()
            .copied()
            .filter(|category| !self.contains(&indicator_column(field, category)));

        match (missing.next(), missing.next()) {
            (Some(baseline), None) => baseline,
            _ => fallback,
        }
    }
}

/// Numeric row aligned to a [`FeatureSchema`], in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector {
    entries: Vec<(String, f64)>,
}

impl EncodedFeatureVector {
    pub(crate) fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// True when the columns equal `expected` exactly, in the same order.
    pub fn conforms_to(&self, expected: &[String]) -> bool {
        self.entries.len() == expected.len()
            && self
                .entries
                .iter()
                .zip(expected)
                .all(|((name, _), column)| name == column)
    }
}

impl Serialize for EncodedFeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
