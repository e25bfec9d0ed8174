use anyhow::{Context, Result};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;

use bayes_classifiers::data_handling::Dataset;
use bayes_classifiers::error::BayesError;
use bayes_classifiers::evaluator::{evaluate, EvaluationOutcome};
use bayes_classifiers::io::{read_dataset, require_columns, write_scored_rows};
use bayes_classifiers::models::NaiveBayesModel;
use bayes_classifiers::preprocessing::{
    clean, detect_column_types, infer_candidate_target, ColumnType, DEFAULT_TYPE_SAMPLE,
};
use bayes_classifiers::report::evaluation_report;
use bayes_classifiers::scoring::{recommend, score_all, Recommendation};

use crate::naive_bayes::input::NaiveBayesConfig;

/// Column overview printed by `bayes columns`.
#[derive(Debug, Serialize)]
pub struct ColumnSummary {
    pub rows: usize,
    pub column_types: IndexMap<String, ColumnType>,
    pub candidate_target: Option<String>,
}

pub fn run_columns(path: &str) -> Result<ColumnSummary> {
    let dataset = read_dataset(path)?;
    Ok(ColumnSummary {
        rows: dataset.len(),
        column_types: detect_column_types(&dataset, DEFAULT_TYPE_SAMPLE),
        candidate_target: infer_candidate_target(&dataset),
    })
}

/// Load the data file and resolve the target column.
fn load(config: &NaiveBayesConfig) -> Result<(Dataset, String)> {
    let dataset = read_dataset(&config.data)?;
    let target = match &config.target_column {
        Some(t) => t.clone(),
        None => {
            let inferred = infer_candidate_target(&dataset).ok_or_else(|| {
                BayesError::MissingRequiredColumn("no target column given or inferable".to_string())
            })?;
            log::info!("No target column given; using '{}'", inferred);
            inferred
        }
    };
    if config.feature_columns.is_empty() {
        return Err(BayesError::MissingRequiredColumn("no feature columns selected".to_string()).into());
    }
    let mut required = config.feature_columns.clone();
    required.push(target.clone());
    require_columns(&dataset, &required)?;
    Ok((dataset, target))
}

fn rng_for(config: &NaiveBayesConfig) -> Box<dyn RngCore> {
    match config.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}

/// Train on the cleaned dataset.
pub fn run_train(config: &NaiveBayesConfig) -> Result<NaiveBayesModel> {
    let (dataset, target) = load(config)?;
    let data = clean(&dataset, &target);
    let model = NaiveBayesModel::train(&data, &config.feature_columns, &target)?;
    Ok(model)
}

/// Evaluate with the configured split and write the HTML report when enabled.
pub fn run_evaluate(config: &NaiveBayesConfig) -> Result<EvaluationOutcome> {
    let (dataset, target) = load(config)?;
    let mut rng = rng_for(config);
    let outcome = evaluate(
        &config.evaluation,
        &dataset,
        &config.feature_columns,
        &target,
        &mut rng,
    )?;

    if let Some(path) = &config.report_file {
        let title = format!("Naive Bayes evaluation: {} ({})", target, outcome.mode.name());
        evaluation_report(&outcome, &title)
            .save_to_file(path)
            .with_context(|| format!("Failed to write report: {}", path))?;
    }
    Ok(outcome)
}

/// Train on every labeled row, score all of them and rank for the
/// requested label.
pub fn run_recommend(config: &NaiveBayesConfig) -> Result<Recommendation> {
    let (dataset, target) = load(config)?;
    let label = config
        .label
        .clone()
        .context("A recommendation label is required (--label)")?;

    let data = clean(&dataset, &target);
    let model = NaiveBayesModel::train(&data, &config.feature_columns, &target)?;
    let scored = score_all(&model, &data);

    if let Some(path) = &config.output_file {
        let file = File::create(path).with_context(|| format!("Failed to create output file: {}", path))?;
        write_scored_rows(BufWriter::new(file), &scored, &model.classes)?;
        log::info!("Scored rows written to {}", path);
    }

    let recommendation = recommend(&scored, &model.classes, &label, &config.recommend);
    log::info!(
        "Recommended {} rows for '{}' ({:?})",
        recommendation.items.len(),
        label,
        recommendation.strategy
    );
    Ok(recommendation)
}
