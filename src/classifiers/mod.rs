pub mod attribute_class_observers;
pub mod bayes;
mod classifier;
pub mod conditional_tests;
pub mod hoeffding_tree;

pub use classifier::Classifier;
pub use hoeffding_tree::{HoeffdingTree, HoeffdingTreeConfig};
