//! HTML rendering of an [`EvaluationOutcome`].
use maud::{html, Markup};

use crate::evaluator::EvaluationOutcome;
use crate::metrics::{CrossValidationSummary, EvaluationResult};
use crate::report::plots::{plot_class_metrics, plot_fold_accuracy};
use crate::report::report::{Report, ReportSection};

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn confusion_table(result: &EvaluationResult) -> Markup {
    html! {
        table {
            tr {
                th { "actual \\ predicted" }
                @for class in &result.classes { th { (class) } }
            }
            @for (class, row) in result.classes.iter().zip(&result.confusion_matrix) {
                tr {
                    th { (class) }
                    @for count in row { td { (count) } }
                }
            }
        }
    }
}

fn per_class_table(result: &EvaluationResult) -> Markup {
    let get = |m: &indexmap::IndexMap<String, f64>, c: &str| m.get(c).copied().unwrap_or(0.0);
    html! {
        table {
            tr { th { "class" } th { "support" } th { "precision" } th { "recall" } th { "F1" } }
            @for class in &result.classes {
                tr {
                    th { (class) }
                    td { (result.support.get(class).copied().unwrap_or(0)) }
                    td { (format!("{:.4}", get(&result.precision_per_class, class.as_str()))) }
                    td { (format!("{:.4}", get(&result.recall_per_class, class.as_str()))) }
                    td { (format!("{:.4}", get(&result.f1_per_class, class.as_str()))) }
                }
            }
            tr {
                th { "macro" }
                td {}
                td { (format!("{:.4}", result.macro_precision)) }
                td { (format!("{:.4}", result.macro_recall)) }
                td { (format!("{:.4}", result.macro_f1)) }
            }
        }
    }
}

fn fold_table(summary: &CrossValidationSummary) -> Markup {
    html! {
        table {
            tr { th { "fold" } th { "train" } th { "test" } th { "accuracy" } th { "macro F1" } }
            @for fold in &summary.folds {
                tr {
                    th { (fold.fold + 1) }
                    td { (fold.train_size) }
                    td { (fold.test_size) }
                    td { (pct(fold.result.accuracy)) }
                    td { (format!("{:.4}", fold.result.macro_f1)) }
                }
            }
        }
        p { "Mean accuracy " (pct(summary.mean_accuracy)) " ± " (pct(summary.std_accuracy)) }
    }
}

/// Build the evaluation report for `outcome`.
pub fn evaluation_report(outcome: &EvaluationOutcome, title: &str) -> Report {
    let mut report = Report::new("bayes", env!("CARGO_PKG_VERSION"), None, title);
    let result = &outcome.result;

    let mut overview = ReportSection::new("Overview");
    overview.add_content(html! {
        p {
            "Mode: " b { (outcome.mode.name()) } ". "
            "Target column: " code { (outcome.model.target_column) } ". "
            "Features: " code { (outcome.model.feature_columns.join(", ")) } "."
        }
        table {
            tr { th { "rows" } th { "train" } th { "test" } th { "accuracy" } th { "macro F1" } }
            tr {
                td { (outcome.counts.total) }
                td { (outcome.counts.train) }
                td { (outcome.counts.test) }
                td { (pct(result.accuracy)) }
                td { (format!("{:.4}", result.macro_f1)) }
            }
        }
    });
    report.add_section(overview);

    let mut matrix = ReportSection::new("Confusion Matrix");
    matrix.add_content(confusion_table(result));
    report.add_section(matrix);

    let mut per_class = ReportSection::new("Per-class Metrics");
    per_class.add_content(per_class_table(result));
    if !result.classes.is_empty() {
        per_class.add_plot(plot_class_metrics(result, "Precision, recall and F1 by class"));
    }
    report.add_section(per_class);

    if let Some(summary) = &outcome.cross_validation {
        let mut folds = ReportSection::new("Cross-validation");
        folds.add_content(fold_table(summary));
        folds.add_plot(plot_fold_accuracy(summary, "Accuracy by fold"));
        report.add_section(folds);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvaluationMode;
    use crate::data_handling::{DataRow, Dataset, Value};
    use crate::evaluator::evaluate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset() -> Dataset {
        (0..12)
            .map(|i| {
                let (x, class) = if i % 2 == 0 { (1.0 + i as f64 * 0.01, "A") } else { (5.0 + i as f64 * 0.01, "B") };
                [("x", Value::Number(x)), ("label", Value::from(class))]
                    .into_iter()
                    .collect::<DataRow>()
            })
            .collect()
    }

    #[test]
    fn cross_validation_report_has_fold_section() {
        let mut rng = StdRng::seed_from_u64(9);
        let mode = EvaluationMode::CrossValidation { folds: Some(3) };
        let outcome = evaluate(&mode, &dataset(), &["x".to_string()], "label", &mut rng).unwrap();
        let report = evaluation_report(&outcome, "CV run");
        let titles: Vec<&str> = report.sections().iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec!["Overview", "Confusion Matrix", "Per-class Metrics", "Cross-validation"]
        );
        assert!(report.render().into_string().contains("Mean accuracy"));
    }

    #[test]
    fn holdout_report_skips_fold_section() {
        let mut rng = StdRng::seed_from_u64(9);
        let outcome = evaluate(
            &EvaluationMode::default(),
            &dataset(),
            &["x".to_string()],
            "label",
            &mut rng,
        )
        .unwrap();
        let report = evaluation_report(&outcome, "Holdout run");
        assert_eq!(report.sections().len(), 3);
    }
}
