mod classifier_none_votes;
mod headers;

pub use classifier_none_votes::ClassifierNoneVotes;
pub use headers::{
    header_binary, header_nominal_xy, header_numeric_binary, instance, nominal_row, numeric_row,
};
