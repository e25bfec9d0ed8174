//! Train/test index splitting: random holdout, k-fold, and manual lists.
//!
//! All functions work on row indices and take the random source as a
//! parameter, so callers choose between `thread_rng()` and a seeded
//! generator.
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_FOLDS, DEFAULT_TRAIN_PERCENT, MAX_FOLDS, MIN_FOLDS};
use crate::error::BayesError;

/// Row indices assigned to training and to testing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Uniformly shuffled `0..n`.
pub fn shuffled_indices<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Effective training share: absent, non-finite or zero means the default.
pub fn resolve_train_percent(train_percent: Option<f64>) -> f64 {
    match train_percent {
        Some(p) if p.is_finite() && p != 0.0 => p,
        _ => DEFAULT_TRAIN_PERCENT,
    }
}

/// Number of training rows for `n` rows at `train_percent`.
///
/// `floor(p / 100 * n)` clamped to `[1, n]`; shares above 100 train on
/// every row and leave the test set empty.
pub fn train_count(n: usize, train_percent: Option<f64>) -> usize {
    if n == 0 {
        return 0;
    }
    let p = resolve_train_percent(train_percent);
    let raw = (p * n as f64 / 100.0).floor();
    if raw < 1.0 {
        1
    } else {
        (raw as usize).min(n)
    }
}

/// Shuffle `0..n` and cut it at [`train_count`].
pub fn holdout_split<R: Rng + ?Sized>(n: usize, train_percent: Option<f64>, rng: &mut R) -> Split {
    let indices = shuffled_indices(n, rng);
    let cut = train_count(n, train_percent);
    log::debug!("Holdout split: {} train / {} test rows", cut, n - cut);
    Split {
        train: indices[..cut].to_vec(),
        test: indices[cut..].to_vec(),
    }
}

/// Effective fold count: default 5, clamped to `[2, 10]`.
pub fn resolve_folds(folds: Option<usize>) -> usize {
    folds.unwrap_or(DEFAULT_FOLDS).clamp(MIN_FOLDS, MAX_FOLDS)
}

/// Partition `0..n` into `k` disjoint folds.
///
/// Indices are shuffled, then dealt round-robin, so fold sizes differ by at
/// most one.
pub fn k_fold_indices<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let k = k.max(1);
    let mut folds: Vec<Vec<usize>> = vec![Vec::with_capacity(n / k + 1); k];
    for (position, idx) in shuffled_indices(n, rng).into_iter().enumerate() {
        folds[position % k].push(idx);
    }
    folds
}

/// Split for fold `fold`: its own rows test, every other fold trains.
pub fn fold_split(folds: &[Vec<usize>], fold: usize) -> Split {
    let mut train = Vec::new();
    for (i, rows) in folds.iter().enumerate() {
        if i != fold {
            train.extend_from_slice(rows);
        }
    }
    Split {
        train,
        test: folds.get(fold).cloned().unwrap_or_default(),
    }
}

/// Validate caller-supplied index lists against `n` rows.
///
/// Out-of-range indices are dropped without error. Either list ending up
/// empty is an `InvalidSplitConfiguration`.
pub fn manual_split(n: usize, train: &[usize], test: &[usize]) -> Result<Split, BayesError> {
    let keep = |indices: &[usize], side: &str| -> Vec<usize> {
        let kept: Vec<usize> = indices.iter().copied().filter(|&i| i < n).collect();
        if kept.len() < indices.len() {
            log::warn!(
                "Dropped {} out-of-range {} indices (dataset has {} rows)",
                indices.len() - kept.len(),
                side,
                n
            );
        }
        kept
    };
    let split = Split {
        train: keep(train, "train"),
        test: keep(test, "test"),
    };
    if split.train.is_empty() {
        return Err(BayesError::InvalidSplitConfiguration(
            "manual split has no usable train indices".to_string(),
        ));
    }
    if split.test.is_empty() {
        return Err(BayesError::InvalidSplitConfiguration(
            "manual split has no usable test indices".to_string(),
        ));
    }
    Ok(split)
}
