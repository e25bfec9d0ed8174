pub mod classifier_trait;
pub mod naive_bayes;

pub use classifier_trait::Classifier;
pub use naive_bayes::{NaiveBayesModel, Prediction};
