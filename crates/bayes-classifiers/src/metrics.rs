//! Classification metrics: confusion matrix, per-class and macro
//! precision / recall / F1, and cross-validation aggregation.
use std::collections::HashMap;

use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::stats::{mean, population_std_dev};

/// Metrics for one set of (actual, predicted) label pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub accuracy: f64,
    /// Axis labels of `confusion_matrix`.
    pub classes: Vec<String>,
    /// `confusion_matrix[actual][predicted]`.
    pub confusion_matrix: Vec<Vec<usize>>,
    /// Row sums of the confusion matrix.
    pub support: IndexMap<String, usize>,
    pub precision_per_class: IndexMap<String, f64>,
    pub recall_per_class: IndexMap<String, f64>,
    pub f1_per_class: IndexMap<String, f64>,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

impl EvaluationResult {
    /// Total count held by the confusion matrix.
    pub fn resolved_pairs(&self) -> usize {
        self.confusion_matrix.iter().flatten().sum()
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn average(values: &IndexMap<String, f64>) -> f64 {
    let v: Vec<f64> = values.values().copied().collect();
    mean(&v).unwrap_or(0.0)
}

/// Build metrics from paired label lists.
///
/// Pairs whose actual or predicted label is not in `classes` do not enter
/// the confusion matrix, but still count toward the accuracy denominator.
/// Accuracy is `0.0` when there are no pairs; every ratio with a zero
/// denominator is `0.0`.
pub fn compute_metrics(classes: &[String], actuals: &[String], preds: &[String]) -> EvaluationResult {
    let index: HashMap<&str, usize> = classes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();
    let n = classes.len();
    let mut cm = Array2::<usize>::zeros((n, n));

    let pairs = actuals.len().min(preds.len());
    let mut correct = 0usize;
    for (actual, predicted) in actuals.iter().zip(preds) {
        if actual == predicted {
            correct += 1;
        }
        match (index.get(actual.as_str()), index.get(predicted.as_str())) {
            (Some(&ai), Some(&pi)) => cm[[ai, pi]] += 1,
            _ => log::trace!(
                "Skipping pair ({}, {}) with a label outside the class list",
                actual,
                predicted
            ),
        }
    }
    let accuracy = ratio(correct, pairs);

    let mut support = IndexMap::with_capacity(n);
    let mut precision_per_class = IndexMap::with_capacity(n);
    let mut recall_per_class = IndexMap::with_capacity(n);
    let mut f1_per_class = IndexMap::with_capacity(n);
    for (i, class) in classes.iter().enumerate() {
        let tp = cm[[i, i]];
        let predicted_as = cm.column(i).sum();
        let actually = cm.row(i).sum();
        let precision = ratio(tp, predicted_as);
        let recall = ratio(tp, actually);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        support.insert(class.clone(), actually);
        precision_per_class.insert(class.clone(), precision);
        recall_per_class.insert(class.clone(), recall);
        f1_per_class.insert(class.clone(), f1);
    }

    EvaluationResult {
        accuracy,
        classes: classes.to_vec(),
        confusion_matrix: cm.outer_iter().map(|row| row.to_vec()).collect(),
        support,
        macro_precision: average(&precision_per_class),
        macro_recall: average(&recall_per_class),
        macro_f1: average(&f1_per_class),
        precision_per_class,
        recall_per_class,
        f1_per_class,
    }
}

/// Metrics of one cross-validation fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub result: EvaluationResult,
}

/// Per-fold results plus mean and population std-dev of fold accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationSummary {
    pub folds: Vec<FoldResult>,
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
}

impl CrossValidationSummary {
    pub fn from_folds(folds: Vec<FoldResult>) -> Self {
        let accuracies: Vec<f64> = folds.iter().map(|f| f.result.accuracy).collect();
        CrossValidationSummary {
            mean_accuracy: mean(&accuracies).unwrap_or(0.0),
            std_accuracy: population_std_dev(&accuracies),
            folds,
        }
    }

    /// Sum of test-set sizes across folds.
    pub fn total_tested(&self) -> usize {
        self.folds.iter().map(|f| f.test_size).sum()
    }
}
