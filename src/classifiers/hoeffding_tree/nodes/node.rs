use crate::classifiers::hoeffding_tree::nodes::{LearningNode, SplitNode};
use crate::core::class_distribution::ClassDistribution;
use std::fmt;

/// Stable handle of a node inside a tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub enum Node {
    Split(SplitNode),
    Learning(LearningNode),
}

impl Node {
    pub fn observed_class_distribution(&self) -> &ClassDistribution {
        match self {
            Node::Split(s) => s.observed_class_distribution(),
            Node::Learning(l) => l.observed_class_distribution(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Learning(_))
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Node::Split(s) => Some(s),
            Node::Learning(_) => None,
        }
    }

    pub fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match self {
            Node::Split(s) => Some(s),
            Node::Learning(_) => None,
        }
    }

    pub fn as_learning(&self) -> Option<&LearningNode> {
        match self {
            Node::Learning(l) => Some(l),
            Node::Split(_) => None,
        }
    }

    pub fn as_learning_mut(&mut self) -> Option<&mut LearningNode> {
        match self {
            Node::Learning(l) => Some(l),
            Node::Split(_) => None,
        }
    }
}

/// A split node together with the branch an instance took out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentBranch {
    pub parent: NodeId,
    pub branch: usize,
}

/// Where routing stopped. `node` is `None` when the branch taken from
/// `parent_branch` has no child yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundNode {
    pub node: Option<NodeId>,
    pub parent_branch: Option<ParentBranch>,
}

impl FoundNode {
    pub fn new(node: Option<NodeId>, parent_branch: Option<ParentBranch>) -> Self {
        Self {
            node,
            parent_branch,
        }
    }
}
