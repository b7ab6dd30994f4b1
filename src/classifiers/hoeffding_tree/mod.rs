mod config;
mod hoeffding_bound;
mod hoeffding_tree;
pub mod instance_conditional_test;
mod leaf_prediction_option;
pub mod nodes;
pub mod split_criteria;

pub use config::HoeffdingTreeConfig;
pub use hoeffding_bound::compute_hoeffding_bound;
pub use hoeffding_tree::HoeffdingTree;
pub use leaf_prediction_option::LeafPredictionOption;
