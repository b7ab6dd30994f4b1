//! Fixtures shared by unit tests: small headers, in-memory streams and
//! classifier stand-ins for exercising the evaluation loop.

pub mod dummies;
pub mod spies;
pub mod stubs;

pub use dummies::{
    ClassifierNoneVotes, header_binary, header_nominal_xy, header_numeric_binary, instance,
    nominal_row, numeric_row,
};
pub use spies::{TrainSpyClassifier, TrainSpyHandle};
pub use stubs::{OracleClassifier, VecStream};
