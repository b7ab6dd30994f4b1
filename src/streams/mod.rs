pub mod arff;
pub mod generators;
mod stream;

pub use arff::ArffFileStream;
pub use generators::{SeaFunction, SeaGenerator};
pub use stream::Stream;
