use indexmap::IndexSet;

use crate::data_handling::DataRow;
use crate::models::naive_bayes::Prediction;

/// Contract between a trained model and the evaluation / scoring layers.
///
/// Implementations are immutable once built; `predict` must not fail and
/// must return raw (unnormalized) log-scores keyed by class.
pub trait Classifier {
    /// Classes known to the model, in the order used for confusion-matrix
    /// indexing and tie-breaking.
    fn classes(&self) -> &IndexSet<String>;

    /// Score one row and pick its label.
    fn predict(&self, row: &DataRow) -> Prediction;

    /// Optional human readable name for the model
    fn name(&self) -> &str { "classifier" }
}
