use bayes_classifiers::config::{EvaluationMode, RecommendConfig};
use bayes_classifiers::data_handling::{DataRow, Dataset, Value};
use bayes_classifiers::evaluator::evaluate;
use bayes_classifiers::report::evaluation_report;
use bayes_classifiers::scoring::{recommend, score_all};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);

    // Three phone segments with overlapping RAM and distinct brands
    let segments = [("budget", 4.0, "Lumo"), ("mid", 8.0, "Orbit"), ("premium", 12.0, "Zenith")];
    let dataset: Dataset = (0..150)
        .map(|i| {
            let (segment, ram, brand) = segments[i % 3];
            let ram = ram + rng.gen_range(-2.0..2.0);
            let brand = if rng.gen_bool(0.8) { brand } else { segments[(i + 1) % 3].2 };
            [
                ("brand", Value::from(brand)),
                ("ram_gb", Value::Number(ram)),
                ("segment", Value::from(segment)),
            ]
            .into_iter()
            .collect::<DataRow>()
        })
        .collect();

    let features = vec!["brand".to_string(), "ram_gb".to_string()];
    let mode = EvaluationMode::CrossValidation { folds: Some(5) };
    let outcome = evaluate(&mode, &dataset, &features, "segment", &mut rng)?;
    println!(
        "5-fold accuracy: {:.3}, macro F1: {:.3}",
        outcome.result.accuracy, outcome.result.macro_f1
    );

    let scored = score_all(&outcome.model, &dataset);
    let top = recommend(&scored, &outcome.model.classes, "premium", &RecommendConfig::default());
    for item in top.items.iter().take(3) {
        println!(
            "{} / {:.1} GB -> p(premium) = {:.3}",
            item.row.label("brand"),
            item.row.get("ram_gb").as_label().parse::<f64>().unwrap_or(0.0),
            item.probability("premium")
        );
    }

    evaluation_report(&outcome, "Synthetic phone segments").save_to_file("synthetic_report.html")?;
    Ok(())
}
