mod oracle_classifier;
mod vec_stream;

pub use oracle_classifier::OracleClassifier;
pub use vec_stream::VecStream;
