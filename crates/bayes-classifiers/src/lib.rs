//! bayes-classifiers: hybrid Gaussian / categorical Naive Bayes for tabular data.
//!
//! The crate trains a Naive Bayes model over mixed numeric and categorical
//! columns, evaluates it with holdout, k-fold or manual splits, turns
//! predictions into per-row class probabilities, and builds ranked
//! recommendation lists. Data loading, HTML reporting and plotting helpers
//! are included for the command-line front end.
//!
//! Everything runs single-threaded on in-memory rows. Randomized splits take
//! an explicit `rand::Rng`, so seeded generators give reproducible runs.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluator;
pub mod io;
pub mod metrics;
pub mod model_selection;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod scoring;
pub mod stats;

pub use error::BayesError;
