use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BayesError;

/// Training share used when none (or an unusable one) is supplied.
pub const DEFAULT_TRAIN_PERCENT: f64 = 80.0;
/// Fold count used when none is supplied.
pub const DEFAULT_FOLDS: usize = 5;
pub const MIN_FOLDS: usize = 2;
pub const MAX_FOLDS: usize = 10;

/// How rows are divided between training and testing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Random holdout split.
    #[serde(alias = "split")]
    Holdout { train_percent: Option<f64> },
    /// Shuffled k-fold cross-validation.
    #[serde(alias = "cv")]
    CrossValidation { folds: Option<usize> },
    /// Caller-chosen row indices into the cleaned dataset.
    Manual {
        train_indices: Vec<usize>,
        test_indices: Vec<usize>,
    },
}

impl Default for EvaluationMode {
    fn default() -> Self {
        EvaluationMode::Holdout {
            train_percent: Some(DEFAULT_TRAIN_PERCENT),
        }
    }
}

impl EvaluationMode {
    pub fn name(&self) -> &'static str {
        match self {
            EvaluationMode::Holdout { .. } => "split",
            EvaluationMode::CrossValidation { .. } => "cv",
            EvaluationMode::Manual { .. } => "manual",
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = BayesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "split" | "holdout" => Ok(EvaluationMode::Holdout {
                train_percent: None,
            }),
            "cv" | "kfold" | "k-fold" | "cross-validation" => {
                Ok(EvaluationMode::CrossValidation { folds: None })
            }
            "manual" => Ok(EvaluationMode::Manual {
                train_indices: Vec::new(),
                test_indices: Vec::new(),
            }),
            _ => Err(BayesError::InvalidSplitConfiguration(format!(
                "Unknown evaluation mode: {}. Expected one of split, cv, manual",
                s
            ))),
        }
    }
}

/// Coarse price buckets used when a requested label is not a model class.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PriceTiers {
    /// Column holding the price.
    pub column: String,
    /// Upper bound (inclusive) of the lowest tier.
    pub budget_max: f64,
    /// Upper bound (inclusive) of the middle tier.
    pub midrange_max: f64,
    /// Names of the low, middle and high tiers.
    pub labels: (String, String, String),
}

impl Default for PriceTiers {
    fn default() -> Self {
        Self {
            column: "price_idr".to_string(),
            budget_max: 3_000_000.0,
            midrange_max: 8_000_000.0,
            labels: (
                "budget".to_string(),
                "mid-range".to_string(),
                "flagship".to_string(),
            ),
        }
    }
}

/// Recommendation parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RecommendConfig {
    pub top_n: usize,
    pub price_tiers: PriceTiers,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            price_tiers: PriceTiers::default(),
        }
    }
}

impl RecommendConfig {
    pub fn new(top_n: usize, price_tiers: PriceTiers) -> Self {
        Self { top_n, price_tiers }
    }
}
