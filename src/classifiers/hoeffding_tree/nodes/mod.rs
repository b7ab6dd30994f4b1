mod learning_node;
mod node;
mod split_node;

pub use learning_node::{LeafPredictor, LearningNode};
pub use node::{FoundNode, Node, NodeId, ParentBranch};
pub use split_node::SplitNode;
