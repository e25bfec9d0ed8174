use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use bayes_classifiers::config::{EvaluationMode, RecommendConfig};

use crate::util::{parse_index_list, parse_list, validate_tsv_or_csv_file};

/// Settings shared by every `bayes` subcommand.
///
/// Loaded from an optional JSON file, then overridden by command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NaiveBayesConfig {
    pub data: String,
    /// Inferred from the column names when unset.
    pub target_column: Option<String>,
    pub feature_columns: Vec<String>,
    pub evaluation: EvaluationMode,
    pub recommend: RecommendConfig,
    /// Requested recommendation label.
    pub label: Option<String>,
    pub report_file: Option<String>,
    /// Destination of scored rows (CSV).
    pub output_file: Option<String>,
    /// Seed for shuffled splits; unseeded when absent.
    pub seed: Option<u64>,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        NaiveBayesConfig {
            data: String::new(),
            target_column: None,
            feature_columns: Vec::new(),
            evaluation: EvaluationMode::default(),
            recommend: RecommendConfig::default(),
            label: None,
            report_file: Some(String::from("bayes_evaluation_report.html")),
            output_file: None,
            seed: None,
        }
    }
}

/// Value of `id` if the subcommand defines that argument and it was given.
fn arg<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    arg::<bool>(matches, id).unwrap_or(false)
}

impl NaiveBayesConfig {
    pub fn load(config_path: &PathBuf) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: NaiveBayesConfig = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        Ok(config)
    }

    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match arg::<PathBuf>(matches, "config") {
            Some(path) => {
                log::info!("Using config: {:?}", path);
                Self::load(&path)?
            }
            None => NaiveBayesConfig::default(),
        };

        if let Some(data) = arg::<String>(matches, "data") {
            config.data = data;
        }
        validate_tsv_or_csv_file(&config.data)?;

        if let Some(target) = arg::<String>(matches, "target") {
            config.target_column = Some(target);
        }
        if let Some(features) = arg::<String>(matches, "features") {
            config.feature_columns = parse_list(&features);
        }

        config.apply_evaluation_overrides(matches)?;

        if let Some(label) = arg::<String>(matches, "label") {
            config.label = Some(label);
        }
        if let Some(top) = arg::<usize>(matches, "top") {
            config.recommend.top_n = top;
        }
        if let Some(output_file) = arg::<String>(matches, "output_file") {
            config.output_file = Some(output_file);
        }
        if let Some(report) = arg::<String>(matches, "report") {
            config.report_file = Some(report);
        }
        if flag(matches, "no_report") {
            config.report_file = None;
        }
        if let Some(seed) = arg::<u64>(matches, "seed") {
            config.seed = Some(seed);
        }

        Ok(config)
    }

    fn apply_evaluation_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(mode) = arg::<String>(matches, "mode") {
            let parsed = EvaluationMode::from_str(&mode)?;
            if parsed.name() != self.evaluation.name() {
                self.evaluation = parsed;
            }
        }

        match &mut self.evaluation {
            EvaluationMode::Holdout { train_percent } => {
                if let Some(p) = arg::<f64>(matches, "train_percent") {
                    *train_percent = Some(p);
                }
            }
            EvaluationMode::CrossValidation { folds } => {
                if let Some(k) = arg::<usize>(matches, "folds") {
                    *folds = Some(k);
                }
            }
            EvaluationMode::Manual {
                train_indices,
                test_indices,
            } => {
                if let Some(list) = arg::<String>(matches, "train_indices") {
                    *train_indices = parse_index_list(&list)?;
                }
                if let Some(list) = arg::<String>(matches, "test_indices") {
                    *test_indices = parse_index_list(&list)?;
                }
            }
        }
        Ok(())
    }
}
