use plotly::layout::{Axis, BarMode, Layout};
use plotly::{Bar, Plot};

use crate::metrics::{CrossValidationSummary, EvaluationResult};

/// Grouped bars of precision, recall and F1 for every class.
pub fn plot_class_metrics(result: &EvaluationResult, title: &str) -> Plot {
    let classes = result.classes.clone();
    let series = [
        ("Precision", &result.precision_per_class),
        ("Recall", &result.recall_per_class),
        ("F1", &result.f1_per_class),
    ];

    let mut plot = Plot::new();
    for (name, values) in series {
        let y: Vec<f64> = classes
            .iter()
            .map(|c| values.get(c).copied().unwrap_or(0.0))
            .collect();
        plot.add_trace(Bar::new(classes.clone(), y).name(name));
    }
    plot.set_layout(
        Layout::new()
            .title(title)
            .bar_mode(BarMode::Group)
            .x_axis(Axis::new().title("Class"))
            .y_axis(Axis::new().title("Score").range(vec![0.0, 1.0])),
    );
    plot
}

/// Accuracy of each cross-validation fold.
pub fn plot_fold_accuracy(summary: &CrossValidationSummary, title: &str) -> Plot {
    let folds: Vec<String> = summary
        .folds
        .iter()
        .map(|f| format!("Fold {}", f.fold + 1))
        .collect();
    let accuracy: Vec<f64> = summary.folds.iter().map(|f| f.result.accuracy).collect();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(folds, accuracy).name("Accuracy"));
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Fold"))
            .y_axis(Axis::new().title("Accuracy").range(vec![0.0, 1.0])),
    );
    plot
}
