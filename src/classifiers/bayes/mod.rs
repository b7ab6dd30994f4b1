pub mod naive_bayes;

pub use naive_bayes::do_naive_bayes_prediction;
