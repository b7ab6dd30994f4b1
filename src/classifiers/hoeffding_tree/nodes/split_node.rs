use crate::classifiers::hoeffding_tree::instance_conditional_test::{
    InstanceConditionalTest, SplitTest,
};
use crate::classifiers::hoeffding_tree::nodes::NodeId;
use crate::core::class_distribution::ClassDistribution;
use crate::core::instances::Instance;
use std::collections::BTreeMap;

/// Internal node. Children are populated lazily: an absent branch means no
/// instance has been routed there yet.
#[derive(Clone, Debug)]
pub struct SplitNode {
    observed_class_distribution: ClassDistribution,
    split_test: SplitTest,
    children: BTreeMap<usize, NodeId>,
}

impl SplitNode {
    pub fn new(split_test: SplitTest, observed_class_distribution: ClassDistribution) -> Self {
        Self {
            observed_class_distribution,
            split_test,
            children: BTreeMap::new(),
        }
    }

    pub fn observed_class_distribution(&self) -> &ClassDistribution {
        &self.observed_class_distribution
    }

    pub fn split_test(&self) -> &SplitTest {
        &self.split_test
    }

    /// Panics when `index` is beyond the split test's branch limit.
    pub fn set_child(&mut self, index: usize, child: NodeId) {
        if let Some(max) = self.split_test.max_branches() {
            assert!(
                index < max,
                "branch {index} out of range for a split with {max} branches"
            );
        }
        self.children.insert(index, child);
    }

    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.children.get(&index).copied()
    }

    /// Children in branch order.
    pub fn children(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.children.iter().map(|(&b, &id)| (b, id))
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn instance_child_index(&self, instance: &dyn Instance) -> Option<usize> {
        self.split_test.branch_for_instance(instance)
    }
}
