//! Probability annotation of rows and label-filtered recommendations.
//!
//! `score_all` turns raw class log-scores into a normalized distribution and
//! attaches it, with the predicted label, to a copy of each row. `recommend`
//! ranks those rows for a requested label, falling back to a price-tier
//! bucketing when the label is not one of the model's classes.
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::config::{PriceTiers, RecommendConfig};
use crate::data_handling::{DataRow, Dataset, Value};
use crate::models::Classifier;
use crate::stats::parse_number;

/// A row with its predicted label and class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    #[serde(flatten)]
    pub row: DataRow,
    pub predicted_label: String,
    pub probabilities: IndexMap<String, f64>,
}

impl ScoredRow {
    /// Probability assigned to `label`, `0.0` if unknown.
    pub fn probability(&self, label: &str) -> f64 {
        self.probabilities.get(label).copied().unwrap_or(0.0)
    }

    /// Probability of the predicted label.
    pub fn confidence(&self) -> f64 {
        self.probability(&self.predicted_label)
    }
}

/// Convert log-scores to probabilities.
///
/// The maximum is subtracted before exponentiating. If no score is finite
/// the distribution is uniform.
pub fn softmax(scores: &IndexMap<String, f64>) -> IndexMap<String, f64> {
    if scores.is_empty() {
        return IndexMap::new();
    }
    let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        let uniform = 1.0 / scores.len() as f64;
        return scores.keys().map(|k| (k.clone(), uniform)).collect();
    }
    let exps: Vec<f64> = scores.values().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    scores
        .keys()
        .zip(exps)
        .map(|(k, e)| (k.clone(), e / total))
        .collect()
}

/// Score every row of `dataset` with `model`.
pub fn score_all<C: Classifier>(model: &C, dataset: &Dataset) -> Vec<ScoredRow> {
    let scored: Vec<ScoredRow> = dataset
        .iter()
        .map(|row| {
            let prediction = model.predict(row);
            ScoredRow {
                row: row.clone(),
                predicted_label: prediction.label,
                probabilities: softmax(&prediction.scores),
            }
        })
        .collect();
    log::debug!("Scored {} rows with {}", scored.len(), model.name());
    scored
}

impl PriceTiers {
    /// Tier of `row` from its price column, `None` if the price is unusable.
    pub fn tier_for(&self, row: &DataRow) -> Option<String> {
        let price = parse_number(row.get(&self.column))?;
        let (budget, midrange, flagship) = &self.labels;
        let tier = if price <= self.budget_max {
            budget
        } else if price <= self.midrange_max {
            midrange
        } else {
            flagship
        };
        Some(tier.clone())
    }

    /// Copy of `dataset` with the tier written into `tier_column`.
    ///
    /// Rows without a usable price get a missing value.
    pub fn with_price_tier(&self, dataset: &Dataset, tier_column: &str) -> Dataset {
        dataset
            .iter()
            .map(|row| {
                let tier = self.tier_for(row).map(Value::Text).unwrap_or(Value::Missing);
                row.with_value(tier_column, tier)
            })
            .collect()
    }
}

/// How a recommendation list was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendStrategy {
    /// Ranked by the model's probability for the requested class.
    ByProbability,
    /// Requested label is a price tier, not a class.
    PriceTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub label: String,
    pub strategy: RecommendStrategy,
    pub items: Vec<ScoredRow>,
}

fn rank_descending<F>(rows: &mut [ScoredRow], key: F)
where
    F: Fn(&ScoredRow) -> f64,
{
    rows.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(std::cmp::Ordering::Equal));
}

/// Top `config.top_n` rows for `label`.
///
/// When `label` is one of `classes`, only rows predicted as `label` are
/// kept, ranked by their probability for it. Otherwise only rows whose price tier equals `label` are kept,
/// ranked by the confidence of their own prediction. Sorting is stable, so
/// ties keep dataset order.
pub fn recommend(
    scored: &[ScoredRow],
    classes: &IndexSet<String>,
    label: &str,
    config: &RecommendConfig,
) -> Recommendation {
    let (strategy, mut items) = if classes.contains(label) {
        let predicted: Vec<ScoredRow> = scored
            .iter()
            .filter(|s| s.predicted_label == label)
            .cloned()
            .collect();
        (RecommendStrategy::ByProbability, predicted)
    } else {
        log::warn!(
            "Label '{}' is not a model class; falling back to price tiers on '{}'",
            label,
            config.price_tiers.column
        );
        let matching: Vec<ScoredRow> = scored
            .iter()
            .filter(|s| config.price_tiers.tier_for(&s.row).as_deref() == Some(label))
            .cloned()
            .collect();
        (RecommendStrategy::PriceTier, matching)
    };

    match strategy {
        RecommendStrategy::ByProbability => rank_descending(&mut items, |s| s.probability(label)),
        RecommendStrategy::PriceTier => rank_descending(&mut items, ScoredRow::confidence),
    }
    items.truncate(config.top_n);

    Recommendation {
        label: label.to_string(),
        strategy,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_is_stable_for_large_magnitudes() {
        let scores: IndexMap<String, f64> =
            [("a".to_string(), -1000.0), ("b".to_string(), -1001.0)].into_iter().collect();
        let probs = softmax(&scores);
        let sum: f64 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(probs["a"] > probs["b"]);
        let expected = 1.0 / (1.0 + (-1.0f64).exp());
        assert!((probs["a"] - expected).abs() < 1e-12);
    }

    #[test]
    fn softmax_of_nothing_is_empty() {
        assert!(softmax(&IndexMap::new()).is_empty());
    }

    #[test]
    fn softmax_without_finite_scores_is_uniform() {
        let scores: IndexMap<String, f64> = [
            ("a".to_string(), f64::NEG_INFINITY),
            ("b".to_string(), f64::NEG_INFINITY),
        ]
        .into_iter()
        .collect();
        let probs = softmax(&scores);
        assert_eq!(probs["a"], 0.5);
    }

    #[test]
    fn tiers_follow_thresholds() {
        let tiers = PriceTiers::default();
        let priced = |p: f64| -> DataRow { [("price_idr", Value::Number(p))].into_iter().collect() };
        assert_eq!(tiers.tier_for(&priced(2_500_000.0)).as_deref(), Some("budget"));
        assert_eq!(tiers.tier_for(&priced(3_000_000.0)).as_deref(), Some("budget"));
        assert_eq!(tiers.tier_for(&priced(5_000_000.0)).as_deref(), Some("mid-range"));
        assert_eq!(tiers.tier_for(&priced(12_000_000.0)).as_deref(), Some("flagship"));
        assert_eq!(tiers.tier_for(&DataRow::new()), None);
    }

    #[test]
    fn price_tier_column_is_added_to_copies() {
        let tiers = PriceTiers::default();
        let ds: Dataset = vec![[("price_idr", Value::from("Rp 9000000"))].into_iter().collect::<DataRow>()].into();
        let tiered = tiers.with_price_tier(&ds, "tier");
        assert_eq!(tiered.rows()[0].label("tier"), "flagship");
        assert!(!ds.rows()[0].contains("tier"));
    }
}
