//! Hybrid Gaussian / categorical Naive Bayes.
//!
//! Numeric features are modelled per class with a Gaussian (population
//! variance, floored), categorical features with per-class frequency tables
//! scored under add-one smoothing. Whether a feature is numeric is decided
//! afresh on every `train` call from the literal cell values: a column is
//! numeric only if every row's cell coerces to a finite number. Re-training on
//! a filtered subset can therefore flip a column's kind.
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::data_handling::{DataRow, Dataset};
use crate::error::BayesError;
use crate::models::classifier_trait::Classifier;
use crate::stats::{gaussian_density, is_numeric_value, mean, parse_number, population_variance};

/// Substitute for a missing or zero class prior.
pub const PRIOR_FLOOR: f64 = 1e-9;
/// Likelihood charged when a numeric feature cannot be parsed.
pub const UNPARSABLE_PENALTY: f64 = 1e-6;
/// Floor applied to a Gaussian density before taking its log.
pub const DENSITY_FLOOR: f64 = 1e-9;

/// Gaussian parameters of one feature within one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    /// Population variance, always > 0.
    pub variance: f64,
    pub count: usize,
}

impl NumericStats {
    /// Parameters used for a class with no usable values.
    pub fn fallback() -> Self {
        NumericStats {
            mean: 0.0,
            variance: 1.0,
            count: 0,
        }
    }

    fn from_values(values: &[f64]) -> Self {
        match mean(values) {
            Some(mu) => NumericStats {
                mean: mu,
                variance: population_variance(values),
                count: values.len(),
            },
            None => NumericStats::fallback(),
        }
    }
}

/// Category frequency table of one feature within one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub counts: IndexMap<String, usize>,
    pub total: usize,
}

impl CategoricalStats {
    fn observe(&mut self, category: String) {
        *self.counts.entry(category).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Laplace-smoothed probability of `category`.
    ///
    /// `(count + 1) / (total + max(1, distinct categories))`.
    pub fn smoothed_probability(&self, category: &str) -> f64 {
        let vocabulary = self.counts.len().max(1);
        (self.count(category) + 1) as f64 / (self.total + vocabulary) as f64
    }
}

/// Per-class statistics of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "per_class", rename_all = "snake_case")]
pub enum FeatureStats {
    Numeric(IndexMap<String, NumericStats>),
    Categorical(IndexMap<String, CategoricalStats>),
}

impl FeatureStats {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FeatureStats::Numeric(_))
    }
}

/// Label chosen for a row plus the raw log-score of every class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub scores: IndexMap<String, f64>,
}

/// Trained model. Built once by [`NaiveBayesModel::train`], read-only after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    pub class_priors: IndexMap<String, f64>,
    pub features: IndexMap<String, FeatureStats>,
    /// Distinct target values in order of first occurrence.
    pub classes: IndexSet<String>,
    pub feature_columns: Vec<String>,
    pub target_column: String,
}

impl NaiveBayesModel {
    /// Fit a model on `dataset`.
    ///
    /// Class priors use the full row count as denominator, including rows
    /// whose target is empty, so they only sum to one on fully-labeled data.
    ///
    /// # Errors
    ///
    /// * `MissingRequiredColumn` when the target name is blank or
    ///   `feature_columns` is empty.
    /// * `EmptyDataset` when `dataset` has no rows.
    /// * `NoClassesFound` when no row has a non-empty target.
    pub fn train(
        dataset: &Dataset,
        feature_columns: &[String],
        target_column: &str,
    ) -> Result<Self, BayesError> {
        if target_column.trim().is_empty() {
            return Err(BayesError::MissingRequiredColumn(
                "target column is not set".to_string(),
            ));
        }
        if feature_columns.is_empty() {
            return Err(BayesError::MissingRequiredColumn(
                "no feature columns selected".to_string(),
            ));
        }
        if dataset.is_empty() {
            return Err(BayesError::EmptyDataset);
        }

        let labels = dataset.target_labels(target_column);
        let classes: IndexSet<String> = labels.iter().filter(|l| !l.is_empty()).cloned().collect();
        if classes.is_empty() {
            return Err(BayesError::NoClassesFound {
                target_column: target_column.to_string(),
            });
        }

        let mut class_counts: IndexMap<String, usize> =
            classes.iter().map(|c| (c.clone(), 0)).collect();
        for label in labels.iter().filter(|l| !l.is_empty()) {
            *class_counts.entry(label.clone()).or_insert(0) += 1;
        }
        let total = dataset.len() as f64;
        let class_priors: IndexMap<String, f64> = class_counts
            .iter()
            .map(|(c, &n)| (c.clone(), n as f64 / total))
            .collect();

        let mut features = IndexMap::new();
        for feature in feature_columns {
            let numeric = dataset.iter().all(|row| is_numeric_value(row.get(feature)));
            let stats = if numeric {
                FeatureStats::Numeric(numeric_stats(dataset, &labels, feature, &classes))
            } else {
                FeatureStats::Categorical(categorical_stats(dataset, &labels, feature, &classes))
            };
            log::debug!(
                "Feature '{}' modelled as {}",
                feature,
                if numeric { "numeric" } else { "categorical" }
            );
            features.insert(feature.clone(), stats);
        }

        log::info!(
            "Trained Naive Bayes on {} rows: {} classes, {} features (target '{}')",
            dataset.len(),
            classes.len(),
            features.len(),
            target_column
        );

        Ok(NaiveBayesModel {
            class_priors,
            features,
            classes,
            feature_columns: feature_columns.to_vec(),
            target_column: target_column.to_string(),
        })
    }

    /// Log-posterior (up to a constant) of `class` for `row`.
    fn log_score(&self, class: &str, row: &DataRow) -> f64 {
        let prior = self
            .class_priors
            .get(class)
            .copied()
            .filter(|p| *p > 0.0)
            .unwrap_or(PRIOR_FLOOR);
        let mut log_prob = prior.ln();

        for feature in &self.feature_columns {
            let Some(stats) = self.features.get(feature) else {
                continue;
            };
            let value = row.get(feature);
            match stats {
                FeatureStats::Numeric(per_class) => match parse_number(value) {
                    None => log_prob += UNPARSABLE_PENALTY.ln(),
                    Some(x) => {
                        let fallback = NumericStats::fallback();
                        let s = per_class.get(class).unwrap_or(&fallback);
                        let density = gaussian_density(x, s.mean, s.variance).max(DENSITY_FLOOR);
                        log_prob += density.ln();
                    }
                },
                FeatureStats::Categorical(per_class) => {
                    let empty = CategoricalStats::default();
                    let table = per_class.get(class).unwrap_or(&empty);
                    log_prob += table.smoothed_probability(&value.as_label()).ln();
                }
            }
        }
        log_prob
    }

    /// Score `row` against every class.
    ///
    /// Returns the arg-max label and the raw log-scores. Ties go to the
    /// class that comes first in `classes`. A model without classes yields an
    /// empty label and no scores.
    pub fn predict(&self, row: &DataRow) -> Prediction {
        let mut scores = IndexMap::with_capacity(self.classes.len());
        let mut best: Option<(&str, f64)> = None;
        for class in &self.classes {
            let score = self.log_score(class, row);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((class.as_str(), score)),
            }
            scores.insert(class.clone(), score);
        }
        Prediction {
            label: best.map(|(c, _)| c.to_string()).unwrap_or_default(),
            scores,
        }
    }
}

fn numeric_stats(
    dataset: &Dataset,
    labels: &[String],
    feature: &str,
    classes: &IndexSet<String>,
) -> IndexMap<String, NumericStats> {
    classes
        .iter()
        .map(|class| {
            let values: Vec<f64> = dataset
                .iter()
                .zip(labels)
                .filter(|(_, label)| *label == class)
                .filter_map(|(row, _)| parse_number(row.get(feature)))
                .collect();
            (class.clone(), NumericStats::from_values(&values))
        })
        .collect()
}

fn categorical_stats(
    dataset: &Dataset,
    labels: &[String],
    feature: &str,
    classes: &IndexSet<String>,
) -> IndexMap<String, CategoricalStats> {
    let mut tables: IndexMap<String, CategoricalStats> = classes
        .iter()
        .map(|c| (c.clone(), CategoricalStats::default()))
        .collect();
    for (row, label) in dataset.iter().zip(labels) {
        if let Some(table) = tables.get_mut(label) {
            table.observe(row.label(feature));
        }
    }
    tables
}

impl Classifier for NaiveBayesModel {
    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }

    fn predict(&self, row: &DataRow) -> Prediction {
        NaiveBayesModel::predict(self, row)
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}
