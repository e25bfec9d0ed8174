//! Statistics helpers for the Naive Bayes engine.
//!
//! Numeric coercion from heterogeneous cells, mean / population variance,
//! and Gaussian density evaluation.
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

use crate::data_handling::Value;

/// Floor applied to every stored variance.
pub const VARIANCE_EPSILON: f64 = 1e-9;

/// Coerce a cell to a finite number.
///
/// Numbers pass through when finite. Text is stripped of every character
/// that is not a digit, `.` or `-`, and the longest leading float literal of
/// what remains is parsed (so `"Rp 1.250.000"` reads as `1.25`, and
/// `"12-3"` as `12`). Missing or unparsable cells yield `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Missing => None,
        Value::Number(n) => n.is_finite().then_some(*n),
        Value::Text(s) => {
            let stripped: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            parse_float_prefix(&stripped)
        }
    }
}

/// True when `parse_number` would succeed.
pub fn is_numeric_value(value: &Value) -> bool {
    parse_number(value).is_some()
}

/// Parse the longest prefix of `s` shaped like `-?digits(.digits)?`.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if frac_digits > 0 || digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Population variance floored at [`VARIANCE_EPSILON`].
///
/// An empty slice yields the floor.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return VARIANCE_EPSILON;
    }
    let var = values.iter().population_variance();
    if var.is_finite() {
        var.max(VARIANCE_EPSILON)
    } else {
        VARIANCE_EPSILON
    }
}

/// Population standard deviation, `0.0` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sd = values.iter().population_std_dev();
    if sd.is_finite() {
        sd
    } else {
        0.0
    }
}

/// Normal density at `x`. Degenerate parameters yield `0.0`.
pub fn gaussian_density(x: f64, mean: f64, variance: f64) -> f64 {
    let std_dev = variance.max(VARIANCE_EPSILON).sqrt();
    match Normal::new(mean, std_dev) {
        Ok(normal) => {
            let p = normal.pdf(x);
            if p.is_finite() {
                p
            } else {
                0.0
            }
        }
        Err(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_and_separators() {
        assert_eq!(parse_number(&Value::from("Rp 4500")), Some(4500.0));
        assert_eq!(parse_number(&Value::from("12.5 kg")), Some(12.5));
        assert_eq!(parse_number(&Value::from("-3")), Some(-3.0));
    }

    #[test]
    fn takes_the_leading_float_literal() {
        assert_eq!(parse_number(&Value::from("1.250.000")), Some(1.25));
        assert_eq!(parse_number(&Value::from("12-3")), Some(12.0));
        assert_eq!(parse_number(&Value::from(".5")), Some(0.5));
    }

    #[test]
    fn rejects_text_without_digits() {
        assert_eq!(parse_number(&Value::from("red")), None);
        assert_eq!(parse_number(&Value::from("-")), None);
        assert_eq!(parse_number(&Value::from("")), None);
        assert_eq!(parse_number(&Value::Missing), None);
        assert_eq!(parse_number(&Value::Number(f64::NAN)), None);
    }

    #[test]
    fn variance_is_floored() {
        assert_eq!(population_variance(&[4.0, 4.0, 4.0]), VARIANCE_EPSILON);
        assert!((population_variance(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn density_peaks_at_the_mean() {
        let at_mean = gaussian_density(10.0, 10.0, 1.0);
        let expected = 1.0 / (2.0 * std::f64::consts::PI).sqrt();
        assert!((at_mean - expected).abs() < 1e-12);
        assert!(gaussian_density(12.0, 10.0, 1.0) < at_mean);
    }
}
