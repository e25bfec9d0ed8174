//! Row and dataset containers handed to the engine by its collaborators.
//!
//! A `DataRow` is an ordered mapping from column name to a scalar `Value`.
//! Rows may disagree on their key sets; an absent key reads as
//! `Value::Missing`. The engine never mutates rows it was given: every
//! transform here returns a new row or a new dataset.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

static MISSING: Value = Value::Missing;

impl Value {
    /// True for `Missing` and for text that is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(s) => s.is_empty(),
            Value::Number(_) => false,
        }
    }

    /// Stringified form used for class labels and category keys.
    ///
    /// Integral numbers print without a fractional part so that a target
    /// column read as `3.0` and one read as `"3"` yield the same class.
    pub fn as_label(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Ordered column → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRow {
    values: IndexMap<String, Value>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `column`, `Missing` when the key is absent.
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&MISSING)
    }

    /// Stringified value for `column`; absent or missing reads as `""`.
    pub fn label(&self, column: &str) -> String {
        self.get(column).as_label()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Copy of this row with `column` set to `value`.
    pub fn with_value(&self, column: &str, value: Value) -> DataRow {
        let mut values = self.values.clone();
        values.insert(column.to_string(), value);
        DataRow { values }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for DataRow
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DataRow {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<DataRow>,
}

impl Dataset {
    pub fn new(rows: Vec<DataRow>) -> Self {
        Dataset { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataRow> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DataRow> {
        self.rows.get(index)
    }

    /// Ordered union of the column names of every row.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: IndexMap<&str, ()> = IndexMap::new();
        for row in &self.rows {
            for column in row.columns() {
                seen.entry(column).or_insert(());
            }
        }
        seen.keys().map(|c| c.to_string()).collect()
    }

    /// New dataset holding the rows at `indices`, in that order.
    ///
    /// Indices past the end are skipped.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Stringified target value of every row (`""` for missing).
    pub fn target_labels(&self, target_column: &str) -> Vec<String> {
        self.rows.iter().map(|r| r.label(target_column)).collect()
    }
}

impl FromIterator<DataRow> for Dataset {
    fn from_iter<I: IntoIterator<Item = DataRow>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataRow;
    type IntoIter = std::slice::Iter<'a, DataRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl From<Vec<DataRow>> for Dataset {
    fn from(rows: Vec<DataRow>) -> Self {
        Dataset::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> DataRow {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn integral_numbers_label_without_fraction() {
        assert_eq!(Value::Number(3.0).as_label(), "3");
        assert_eq!(Value::Number(2.5).as_label(), "2.5");
        assert_eq!(Value::Missing.as_label(), "");
    }

    #[test]
    fn absent_key_reads_as_missing() {
        let r = row(&[("a", Value::Number(1.0))]);
        assert_eq!(r.get("b"), &Value::Missing);
        assert_eq!(r.label("b"), "");
    }

    #[test]
    fn with_value_leaves_original_untouched() {
        let r = row(&[("a", Value::Number(1.0))]);
        let annotated = r.with_value("tier", Value::from("budget"));
        assert!(!r.contains("tier"));
        assert_eq!(annotated.label("tier"), "budget");
    }

    #[test]
    fn select_skips_out_of_range_indices() {
        let ds = Dataset::new(vec![
            row(&[("a", Value::Number(1.0))]),
            row(&[("a", Value::Number(2.0))]),
        ]);
        let picked = ds.select(&[1, 7, 0]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.rows()[0].label("a"), "2");
    }

    #[test]
    fn columns_are_an_ordered_union() {
        let ds = Dataset::new(vec![
            row(&[("a", Value::Missing), ("b", Value::Missing)]),
            row(&[("c", Value::Missing), ("a", Value::Missing)]),
        ]);
        assert_eq!(ds.columns(), vec!["a", "b", "c"]);
    }
}
