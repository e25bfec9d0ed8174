//! Column-level preprocessing shared by the evaluator and the CLI.
//!
//! Drops unlabeled rows, copies a target column under an alias, and offers
//! the column-type and target-column hints shown to users before training.
//! None of these mutate their input.
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data_handling::{Dataset, Value};
use crate::stats::parse_number;

/// Rows sampled by [`detect_column_types`] when no size is given.
pub const DEFAULT_TYPE_SAMPLE: usize = 50;

/// Share of sampled values that must coerce to numbers.
const NUMERIC_SHARE: f64 = 0.7;

/// Target names tried, in order, before falling back to cardinality.
const PREFERRED_TARGETS: [&str; 4] = ["label", "price_idr", "price", "class"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Drop every row whose target value is empty.
pub fn clean(dataset: &Dataset, target_column: &str) -> Dataset {
    let kept: Dataset = dataset
        .iter()
        .filter(|row| !row.get(target_column).is_empty())
        .cloned()
        .collect();
    log::debug!(
        "Dropped {} of {} rows with an empty '{}' value",
        dataset.len() - kept.len(),
        dataset.len(),
        target_column
    );
    kept
}

/// Copy every row, writing the stringified `target_column` into `alias`.
///
/// When the target already is `alias` the rows are copied unchanged.
pub fn remap_target(dataset: &Dataset, target_column: &str, alias: &str) -> Dataset {
    if target_column == alias {
        return dataset.clone();
    }
    dataset
        .iter()
        .map(|row| row.with_value(alias, Value::Text(row.label(target_column))))
        .collect()
}

/// Guess numeric vs categorical for every column from a leading sample.
///
/// A column is numeric when at least `max(1, floor(0.7 * sample))` sampled
/// cells coerce to numbers; empty cells count against it. This is only a
/// hint for presentation: training decides per run from all values.
pub fn detect_column_types(dataset: &Dataset, sample_size: usize) -> IndexMap<String, ColumnType> {
    let mut types = IndexMap::new();
    if dataset.is_empty() {
        return types;
    }
    let sample = &dataset.rows()[..sample_size.max(1).min(dataset.len())];
    let needed = ((sample.len() as f64 * NUMERIC_SHARE).floor() as usize).max(1);

    for column in dataset.columns() {
        let numeric_count = sample
            .iter()
            .filter(|row| parse_number(row.get(&column)).is_some())
            .count();
        let kind = if numeric_count >= needed {
            ColumnType::Numeric
        } else {
            ColumnType::Categorical
        };
        log::trace!(
            "Column '{}': {}/{} numeric sampled values -> {:?}",
            column,
            numeric_count,
            sample.len(),
            kind
        );
        types.insert(column, kind);
    }
    types
}

/// Pick a likely target column.
///
/// Preferred names win; otherwise the column with the lowest ratio of
/// distinct non-empty values to rows.
pub fn infer_candidate_target(dataset: &Dataset) -> Option<String> {
    if dataset.is_empty() {
        return None;
    }
    let columns = dataset.columns();
    for preferred in PREFERRED_TARGETS {
        if columns.iter().any(|c| c == preferred) {
            return Some(preferred.to_string());
        }
    }

    let mut best: Option<String> = None;
    let mut best_ratio = 1.0;
    for column in columns {
        let distinct: HashSet<String> = dataset
            .iter()
            .map(|row| row.label(&column))
            .filter(|s| !s.is_empty())
            .collect();
        let ratio = distinct.len() as f64 / dataset.len() as f64;
        if ratio < best_ratio {
            best_ratio = ratio;
            best = Some(column);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::DataRow;

    fn phones() -> Dataset {
        let rows: Vec<DataRow> = vec![
            [("brand", Value::from("A")), ("ram", Value::from("8 GB")), ("tier", Value::from("mid"))]
                .into_iter()
                .collect(),
            [("brand", Value::from("B")), ("ram", Value::Number(4.0)), ("tier", Value::from("low"))]
                .into_iter()
                .collect(),
            [("brand", Value::from("C")), ("ram", Value::from("12")), ("tier", Value::Missing)]
                .into_iter()
                .collect(),
        ];
        Dataset::new(rows)
    }

    #[test]
    fn clean_drops_empty_targets() {
        let cleaned = clean(&phones(), "tier");
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn remap_copies_target_under_alias() {
        let ds = phones();
        let remapped = remap_target(&ds, "tier", "label");
        assert_eq!(remapped.rows()[0].label("label"), "mid");
        assert_eq!(remapped.rows()[2].label("label"), "");
        assert!(!ds.rows()[0].contains("label"));
    }

    #[test]
    fn detects_numeric_and_categorical_columns() {
        let types = detect_column_types(&phones(), DEFAULT_TYPE_SAMPLE);
        assert_eq!(types["ram"], ColumnType::Numeric);
        assert_eq!(types["brand"], ColumnType::Categorical);
        assert_eq!(types["tier"], ColumnType::Categorical);
    }

    #[test]
    fn infers_lowest_cardinality_column() {
        let rows: Vec<DataRow> = (0..6)
            .map(|i| {
                [
                    ("id", Value::Number(i as f64)),
                    ("group", Value::from(if i % 2 == 0 { "x" } else { "y" })),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        assert_eq!(infer_candidate_target(&Dataset::new(rows)), Some("group".to_string()));
    }

    #[test]
    fn prefers_known_target_names() {
        let ds = remap_target(&phones(), "tier", "label");
        assert_eq!(infer_candidate_target(&ds), Some("label".to_string()));
    }
}
