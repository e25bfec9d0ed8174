mod common;

use bayes_classifiers::config::RecommendConfig;
use bayes_classifiers::models::NaiveBayesModel;
use bayes_classifiers::preprocessing::clean;
use bayes_classifiers::scoring::{recommend, score_all, RecommendStrategy};
use common::{names, phones};

fn scored_phones() -> (NaiveBayesModel, Vec<bayes_classifiers::scoring::ScoredRow>) {
    let data = clean(&phones(), "segment");
    let model = NaiveBayesModel::train(&data, &names(&["brand", "ram_gb"]), "segment").unwrap();
    let scored = score_all(&model, &data);
    (model, scored)
}

#[test]
fn score_all_is_idempotent_and_normalized() {
    let data = clean(&phones(), "segment");
    let model = NaiveBayesModel::train(&data, &names(&["brand", "ram_gb"]), "segment").unwrap();
    let first = score_all(&model, &data);
    let second = score_all(&model, &data);
    assert_eq!(first.len(), data.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.predicted_label, b.predicted_label);
        let total: f64 = a.probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(a.probabilities.values().all(|p| (0.0..=1.0).contains(p)));
    }
}

#[test]
fn scoring_leaves_input_rows_untouched() {
    let data = clean(&phones(), "segment");
    let before = data.clone();
    let (_, scored) = scored_phones();
    assert_eq!(data, before);
    assert_eq!(scored[0].row, data.rows()[0]);
}

#[test]
fn recommendations_rank_by_class_probability() {
    let (model, scored) = scored_phones();
    let config = RecommendConfig { top_n: 5, ..Default::default() };
    let rec = recommend(&scored, &model.classes, "premium", &config);
    assert_eq!(rec.strategy, RecommendStrategy::ByProbability);
    assert_eq!(rec.items.len(), 5);
    let probs: Vec<f64> = rec.items.iter().map(|s| s.probability("premium")).collect();
    assert!(probs.windows(2).all(|w| w[0] >= w[1]));
    assert!(rec.items.iter().all(|s| s.predicted_label == "premium"));
}

#[test]
fn recommendations_only_hold_rows_predicted_as_the_label() {
    let (model, scored) = scored_phones();
    let predicted_premium = scored.iter().filter(|s| s.predicted_label == "premium").count();
    let config = RecommendConfig { top_n: 20, ..Default::default() };
    assert!(config.top_n > predicted_premium);

    let rec = recommend(&scored, &model.classes, "premium", &config);
    assert_eq!(rec.items.len(), predicted_premium);
    assert!(rec.items.iter().all(|s| s.predicted_label == "premium"));
}

#[test]
fn unknown_label_falls_back_to_price_tiers() {
    let (model, scored) = scored_phones();
    let rec = recommend(&scored, &model.classes, "flagship", &RecommendConfig::default());
    assert_eq!(rec.strategy, RecommendStrategy::PriceTier);
    assert!(!rec.items.is_empty());
    assert!(rec.items.iter().all(|s| s.row.label("segment") == "premium"));
}

#[test]
fn unknown_tier_yields_nothing() {
    let (model, scored) = scored_phones();
    let rec = recommend(&scored, &model.classes, "refurbished", &RecommendConfig::default());
    assert!(rec.items.is_empty());
}
