#![allow(dead_code)]
use bayes_classifiers::data_handling::{DataRow, Dataset, Value};

pub fn row(pairs: &[(&str, Value)]) -> DataRow {
    pairs.iter().cloned().collect()
}

/// Ten rows: six "A" around x = 10 and four "B" around x = 20, each with
/// population variance 1.
pub fn two_gaussians() -> Dataset {
    let a = [9.0, 11.0, 9.0, 11.0, 9.0, 11.0];
    let b = [19.0, 21.0, 19.0, 21.0];
    a.iter()
        .map(|&x| row(&[("x", Value::Number(x)), ("label", Value::from("A"))]))
        .chain(
            b.iter()
                .map(|&x| row(&[("x", Value::Number(x)), ("label", Value::from("B"))])),
        )
        .collect()
}

/// Class A is mostly red, class B mostly blue.
pub fn colors() -> Dataset {
    let pairs = [
        ("red", "A"),
        ("red", "A"),
        ("red", "A"),
        ("blue", "A"),
        ("red", "B"),
        ("blue", "B"),
        ("blue", "B"),
        ("blue", "B"),
    ];
    pairs.iter()
        .map(|(color, class)| row(&[("color", Value::from(*color)), ("label", Value::from(*class))]))
        .collect()
}

/// Phone-like rows with mixed columns, a messy price column and a few
/// unlabeled rows.
pub fn phones() -> Dataset {
    let mut rows = Vec::new();
    for i in 0..30 {
        let (segment, ram, brand, price) = match i % 3 {
            0 => ("budget", 3.0 + (i % 2) as f64, "Lumo", 1_800_000.0 + i as f64 * 10_000.0),
            1 => ("mid", 6.0 + (i % 2) as f64, "Orbit", 5_000_000.0 + i as f64 * 10_000.0),
            _ => ("premium", 12.0 + (i % 2) as f64, "Zenith", 14_000_000.0 + i as f64 * 10_000.0),
        };
        rows.push(row(&[
            ("brand", Value::from(brand)),
            ("ram_gb", Value::Number(ram)),
            ("price_idr", Value::from(format!("Rp {}", price))),
            ("segment", Value::from(segment)),
        ]));
    }
    rows.push(row(&[
        ("brand", Value::from("Lumo")),
        ("ram_gb", Value::Number(4.0)),
        ("price_idr", Value::from("Rp 2000000")),
        ("segment", Value::Missing),
    ]));
    rows.into()
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
