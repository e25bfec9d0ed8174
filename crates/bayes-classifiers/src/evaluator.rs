//! Evaluation harness: splits a cleaned dataset, trains, predicts held-out
//! rows and scores the predictions.
//!
//! Every call trains from scratch. The returned model is the one a caller
//! should use for scoring: the train-split model for holdout and manual
//! modes, or a model refit on the whole cleaned dataset after
//! cross-validation.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EvaluationMode;
use crate::data_handling::Dataset;
use crate::error::BayesError;
use crate::metrics::{compute_metrics, CrossValidationSummary, EvaluationResult, FoldResult};
use crate::model_selection::{fold_split, holdout_split, k_fold_indices, manual_split, resolve_folds, Split};
use crate::models::{Classifier, NaiveBayesModel};
use crate::preprocessing::clean;

/// Row counts of an evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCounts {
    /// Rows in the cleaned dataset.
    pub total: usize,
    pub train: usize,
    pub test: usize,
}

/// Everything produced by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub mode: EvaluationMode,
    pub model: NaiveBayesModel,
    pub result: EvaluationResult,
    pub counts: SplitCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_validation: Option<CrossValidationSummary>,
}

/// Actual and predicted labels of every row of `test`, in row order.
pub fn predict_labels<C: Classifier>(
    model: &C,
    test: &Dataset,
    target_column: &str,
) -> (Vec<String>, Vec<String>) {
    let actuals = test.target_labels(target_column);
    let preds = test.iter().map(|row| model.predict(row).label).collect();
    (actuals, preds)
}

/// Predict every row of `test` with `model` and score against its targets.
pub fn evaluate_model<C: Classifier>(model: &C, test: &Dataset, target_column: &str) -> EvaluationResult {
    let (actuals, preds) = predict_labels(model, test, target_column);
    let classes: Vec<String> = model.classes().iter().cloned().collect();
    compute_metrics(&classes, &actuals, &preds)
}

fn validate_columns(feature_columns: &[String], target_column: &str) -> Result<(), BayesError> {
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
    Ok(())
}

/// Train and evaluate once on an index split of `data`.
fn run_split(
    data: &Dataset,
    split: &Split,
    feature_columns: &[String],
    target_column: &str,
) -> Result<(NaiveBayesModel, EvaluationResult), BayesError> {
    let train = data.select(&split.train);
    let test = data.select(&split.test);
    let model = NaiveBayesModel::train(&train, feature_columns, target_column)?;
    let result = evaluate_model(&model, &test, target_column);
    log::info!(
        "Evaluated on {} held-out rows: accuracy {:.4}, macro F1 {:.4}",
        test.len(),
        result.accuracy,
        result.macro_f1
    );
    Ok((model, result))
}

/// Evaluate a Naive Bayes model on `dataset` with the given split `mode`.
///
/// Rows with an empty target are removed first; manual indices address the
/// cleaned rows.
///
/// # Errors
///
/// * `MissingRequiredColumn` for a blank target or empty feature list.
/// * `EmptyDataset` when `dataset` has no rows.
/// * `NoClassesFound` when no row is labeled.
/// * `InvalidSplitConfiguration` for an empty manual side or fewer than two
///   labeled rows in cross-validation.
pub fn evaluate<R: Rng + ?Sized>(
    mode: &EvaluationMode,
    dataset: &Dataset,
    feature_columns: &[String],
    target_column: &str,
    rng: &mut R,
) -> Result<EvaluationOutcome, BayesError> {
    validate_columns(feature_columns, target_column)?;
    if dataset.is_empty() {
        return Err(BayesError::EmptyDataset);
    }
    let data = clean(dataset, target_column);
    if data.is_empty() {
        return Err(BayesError::NoClassesFound {
            target_column: target_column.to_string(),
        });
    }
    let n = data.len();
    log::info!(
        "Evaluating mode '{}' on {} labeled rows ({} supplied)",
        mode.name(),
        n,
        dataset.len()
    );

    match mode {
        EvaluationMode::Holdout { train_percent } => {
            let split = holdout_split(n, *train_percent, rng);
            let (model, result) = run_split(&data, &split, feature_columns, target_column)?;
            Ok(EvaluationOutcome {
                mode: mode.clone(),
                model,
                result,
                counts: SplitCounts {
                    total: n,
                    train: split.train.len(),
                    test: split.test.len(),
                },
                cross_validation: None,
            })
        }
        EvaluationMode::Manual {
            train_indices,
            test_indices,
        } => {
            let split = manual_split(n, train_indices, test_indices)?;
            let (model, result) = run_split(&data, &split, feature_columns, target_column)?;
            Ok(EvaluationOutcome {
                mode: mode.clone(),
                model,
                result,
                counts: SplitCounts {
                    total: n,
                    train: split.train.len(),
                    test: split.test.len(),
                },
                cross_validation: None,
            })
        }
        EvaluationMode::CrossValidation { folds } => {
            cross_validate(mode, &data, *folds, feature_columns, target_column, rng)
        }
    }
}

fn cross_validate<R: Rng + ?Sized>(
    mode: &EvaluationMode,
    data: &Dataset,
    folds: Option<usize>,
    feature_columns: &[String],
    target_column: &str,
    rng: &mut R,
) -> Result<EvaluationOutcome, BayesError> {
    let n = data.len();
    if n < 2 {
        return Err(BayesError::InvalidSplitConfiguration(format!(
            "cross-validation needs at least 2 labeled rows, got {}",
            n
        )));
    }
    let k = resolve_folds(folds).min(n);
    let fold_indices = k_fold_indices(n, k, rng);

    let mut fold_results = Vec::with_capacity(k);
    let mut pooled_actuals = Vec::with_capacity(n);
    let mut pooled_preds = Vec::with_capacity(n);
    for fold in 0..k {
        let split = fold_split(&fold_indices, fold);
        let train = data.select(&split.train);
        let test = data.select(&split.test);
        let model = NaiveBayesModel::train(&train, feature_columns, target_column)?;

        let (actuals, preds) = predict_labels(&model, &test, target_column);
        let classes: Vec<String> = model.classes.iter().cloned().collect();
        let result = compute_metrics(&classes, &actuals, &preds);
        log::debug!(
            "Fold {}: {} train / {} test rows, accuracy {:.4}",
            fold,
            split.train.len(),
            split.test.len(),
            result.accuracy
        );

        pooled_actuals.extend(actuals);
        pooled_preds.extend(preds);
        fold_results.push(FoldResult {
            fold,
            train_size: split.train.len(),
            test_size: split.test.len(),
            result,
        });
    }
    let summary = CrossValidationSummary::from_folds(fold_results);
    log::info!(
        "{}-fold cross-validation: accuracy {:.4} ± {:.4}",
        k,
        summary.mean_accuracy,
        summary.std_accuracy
    );

    let model = NaiveBayesModel::train(data, feature_columns, target_column)?;
    let classes: Vec<String> = model.classes.iter().cloned().collect();
    let result = compute_metrics(&classes, &pooled_actuals, &pooled_preds);

    Ok(EvaluationOutcome {
        mode: mode.clone(),
        model,
        result,
        counts: SplitCounts {
            total: n,
            train: n,
            test: summary.total_tested(),
        },
        cross_validation: Some(summary),
    })
}
