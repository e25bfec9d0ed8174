pub mod naive_bayes;
pub mod util;
