use crate::classifiers::Classifier;
use crate::classifiers::attribute_class_observers::AttributeObserver;
use crate::classifiers::hoeffding_tree::HoeffdingTreeConfig;
use crate::classifiers::hoeffding_tree::compute_hoeffding_bound;
use crate::classifiers::hoeffding_tree::instance_conditional_test::InstanceConditionalTest;
use crate::classifiers::hoeffding_tree::nodes::{
    FoundNode, LeafPredictor, LearningNode, Node, NodeId, ParentBranch, SplitNode,
};
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::class_distribution::ClassDistribution;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::{SchemaError, VfdtError};
use crate::utils::math::category_index;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, instrument};

struct ModelContext {
    header: Arc<InstanceHeader>,
    empty_distribution: ClassDistribution,
}

/// Splitting a leaf replaces its arena slot in place, so a [`NodeId`] held by
/// a parent stays valid.
pub struct HoeffdingTree {
    config: HoeffdingTreeConfig,
    split_criterion: Box<dyn SplitCriterion>,
    context: Option<ModelContext>,
    nodes: Vec<Node>,
    tree_root: Option<NodeId>,
    decision_node_count: usize,
    active_leaf_node_count: usize,
    inactive_leaf_node_count: usize,
    growth_allowed: bool,
    training_weight_seen_by_model: f64,
}

impl HoeffdingTree {
    pub fn new(config: HoeffdingTreeConfig) -> Result<Self, VfdtError> {
        config.validate()?;
        let split_criterion = config.split_criterion.build(config.min_branch_fraction);
        Ok(Self {
            config,
            split_criterion,
            context: None,
            nodes: Vec::new(),
            tree_root: None,
            decision_node_count: 0,
            active_leaf_node_count: 0,
            inactive_leaf_node_count: 0,
            growth_allowed: true,
            training_weight_seen_by_model: 0.0,
        })
    }

    /// Returns the trainable attribute indices and the class index.
    pub fn initialize(
        &mut self,
        header: Arc<InstanceHeader>,
    ) -> Result<(Vec<usize>, usize), SchemaError> {
        let class_index = header.class_index();
        let num_attributes = header.number_of_attributes();
        let class_attribute = header.attribute_at_index(class_index).ok_or(
            SchemaError::ClassIndexOutOfRange {
                class_index,
                num_attributes,
            },
        )?;
        let class_name = class_attribute.name();
        let num_classes = header
            .class_attribute()
            .ok_or_else(|| SchemaError::TargetNotNominal {
                name: class_name.clone(),
            })?
            .number_of_values();
        let empty_distribution = ClassDistribution::new(num_classes)
            .map_err(|_| SchemaError::EmptyTarget { name: class_name })?;

        let mut trainable = Vec::with_capacity(num_attributes.saturating_sub(1));
        for index in (0..num_attributes).filter(|&i| i != class_index) {
            let Some(attribute) = header.attribute_at_index(index) else {
                continue;
            };
            if AttributeObserver::for_attribute(attribute, num_classes, self.config.num_bins)
                .is_none()
            {
                return Err(SchemaError::UnsupportedAttribute {
                    name: attribute.name(),
                    index,
                });
            }
            trainable.push(index);
        }

        self.context = Some(ModelContext {
            header,
            empty_distribution: empty_distribution.clone(),
        });
        self.nodes.clear();
        self.decision_node_count = 0;
        self.active_leaf_node_count = 1;
        self.inactive_leaf_node_count = 0;
        self.training_weight_seen_by_model = 0.0;
        self.tree_root = self.new_learning_node(empty_distribution);

        debug!(
            num_classes,
            num_attributes = trainable.len(),
            "hoeffding tree initialised"
        );
        Ok((trainable, class_index))
    }

    pub fn config(&self) -> &HoeffdingTreeConfig {
        &self.config
    }

    pub fn header(&self) -> Option<&Arc<InstanceHeader>> {
        self.context.as_ref().map(|c| &c.header)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree_root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn decision_node_count(&self) -> usize {
        self.decision_node_count
    }

    pub fn active_leaf_node_count(&self) -> usize {
        self.active_leaf_node_count
    }

    pub fn inactive_leaf_node_count(&self) -> usize {
        self.inactive_leaf_node_count
    }

    pub fn node_count(&self) -> usize {
        self.decision_node_count + self.active_leaf_node_count + self.inactive_leaf_node_count
    }

    pub fn training_weight_seen_by_model(&self) -> f64 {
        self.training_weight_seen_by_model
    }

    /// A lone leaf has depth 0.
    pub fn tree_depth(&self) -> usize {
        self.tree_root.map_or(0, |root| self.subtree_depth(root))
    }

    fn subtree_depth(&self, id: NodeId) -> usize {
        match &self.nodes[id.0] {
            Node::Learning(_) => 0,
            Node::Split(split) => {
                1 + split
                    .children()
                    .map(|(_, child)| self.subtree_depth(child))
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    pub fn is_growth_allowed(&self) -> bool {
        self.growth_allowed
    }

    pub fn set_growth_allowed(&mut self, growth_allowed: bool) {
        self.growth_allowed = growth_allowed;
    }

    fn new_learning_node(&mut self, initial_class_observations: ClassDistribution) -> Option<NodeId> {
        let ctx = self.context.as_ref()?;
        let header = &ctx.header;
        let num_classes = ctx.empty_distribution.len();
        let observers = (0..header.number_of_attributes())
            .map(|index| {
                if index == header.class_index() {
                    return None;
                }
                header.attribute_at_index(index).and_then(|attribute| {
                    AttributeObserver::for_attribute(attribute, num_classes, self.config.num_bins)
                })
            })
            .collect();

        let node = LearningNode::new(
            initial_class_observations,
            observers,
            LeafPredictor::from(self.config.leaf_prediction),
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Learning(node));
        Some(id)
    }

    /// Routes `instance` from the root. Stops at a split node whose test
    /// has no answer, or reports the empty branch it reached.
    pub fn filter_instance_to_leaf(&self, instance: &dyn Instance) -> FoundNode {
        let Some(mut current) = self.tree_root else {
            return FoundNode::new(None, None);
        };
        let mut parent_branch = None;

        loop {
            let Node::Split(split) = &self.nodes[current.0] else {
                return FoundNode::new(Some(current), parent_branch);
            };
            let Some(branch) = split.instance_child_index(instance) else {
                return FoundNode::new(Some(current), parent_branch);
            };
            let next_parent = ParentBranch {
                parent: current,
                branch,
            };
            match split.get_child(branch) {
                Some(child) => {
                    current = child;
                    parent_branch = Some(next_parent);
                }
                None => return FoundNode::new(None, Some(next_parent)),
            }
        }
    }

    pub fn find_learning_nodes(&self) -> Vec<FoundNode> {
        let mut found = Vec::new();
        if let Some(root) = self.tree_root {
            self.find_learning_nodes_rec(root, None, &mut found);
        }
        found
    }

    fn find_learning_nodes_rec(
        &self,
        id: NodeId,
        parent_branch: Option<ParentBranch>,
        found: &mut Vec<FoundNode>,
    ) {
        match &self.nodes[id.0] {
            Node::Learning(_) => found.push(FoundNode::new(Some(id), parent_branch)),
            Node::Split(split) => {
                for (branch, child) in split.children() {
                    self.find_learning_nodes_rec(
                        child,
                        Some(ParentBranch { parent: id, branch }),
                        found,
                    );
                }
            }
        }
    }

    pub fn activate_learning_node(&mut self, id: NodeId) {
        let Some(Node::Learning(leaf)) = self.nodes.get_mut(id.0) else {
            return;
        };
        if leaf.is_active() {
            return;
        }
        leaf.set_active(true);
        self.active_leaf_node_count += 1;
        self.inactive_leaf_node_count -= 1;
    }

    pub fn deactivate_learning_node(&mut self, id: NodeId) {
        let Some(Node::Learning(leaf)) = self.nodes.get_mut(id.0) else {
            return;
        };
        if !leaf.is_active() {
            return;
        }
        leaf.set_active(false);
        self.active_leaf_node_count -= 1;
        self.inactive_leaf_node_count += 1;
        debug!(node = %id, "learning node deactivated");
    }

    pub fn deactivate_all_leaves(&mut self) {
        for found in self.find_learning_nodes() {
            if let Some(id) = found.node {
                self.deactivate_learning_node(id);
            }
        }
    }

    pub fn observed_class_distribution_at_leaves_reachable_through(
        &self,
        id: NodeId,
    ) -> Option<ClassDistribution> {
        let node = self.nodes.get(id.0)?;
        let mut result = node.observed_class_distribution().clone();
        if let Node::Split(split) = node {
            for (_, child) in split.children() {
                if let Some(below) = self.observed_class_distribution_at_leaves_reachable_through(child)
                {
                    result += &below;
                }
            }
        }
        Some(result)
    }

    #[instrument(level = "debug", skip(self))]
    fn attempt_to_split(&mut self, node_id: NodeId, parent_branch: Option<ParentBranch>) {
        let Some(Node::Learning(leaf)) = self.nodes.get_mut(node_id.0) else {
            return;
        };
        if leaf.observed_class_distribution_is_pure() {
            return;
        }

        let mut best_suggestions = leaf.get_best_split_suggestions(
            self.split_criterion.as_ref(),
            self.config.no_pre_prune,
            self.config.binary_splits,
        );

        let mut bound = None;
        let should_split = if best_suggestions.len() < 2 {
            !best_suggestions.is_empty()
        } else {
            let pre_split_dist = leaf.observed_class_distribution();
            let hoeffding_bound = compute_hoeffding_bound(
                self.split_criterion.get_range_of_merit(pre_split_dist),
                self.config.split_confidence,
                pre_split_dist.total_weight(),
            );
            bound = Some(hoeffding_bound);
            let best_merit = best_suggestions[best_suggestions.len() - 1].merit;
            let second_best_merit = best_suggestions[best_suggestions.len() - 2].merit;

            if self.config.remove_poor_attributes {
                let poor_atts: BTreeSet<usize> = best_suggestions
                    .iter()
                    .filter_map(|s| s.split_test.as_ref().map(|t| (s.merit, t)))
                    .filter_map(|(merit, test)| match test.get_atts_test_depends_on()[..] {
                        [att] if best_merit - merit > hoeffding_bound => Some(att),
                        _ => None,
                    })
                    .collect();
                for att in poor_atts {
                    leaf.disable_attribute(att);
                }
            }

            best_merit - second_best_merit > hoeffding_bound
                || hoeffding_bound < self.config.tie_threshold
        };

        if !should_split {
            return;
        }

        let Some(split_decision) = best_suggestions.pop() else {
            return;
        };
        let Some(split_test) = split_decision.split_test else {
            self.deactivate_learning_node(node_id);
            return;
        };

        let pre_split_dist = leaf.observed_class_distribution().clone();
        let num_splits = split_decision.resulting_class_distributions.len();
        let description = self
            .context
            .as_ref()
            .map(|ctx| split_test.describe_condition_for_branch(0, &ctx.header))
            .unwrap_or_default();

        let mut new_split = SplitNode::new(split_test, pre_split_dist);
        for (branch, dist) in split_decision.resulting_class_distributions.into_iter().enumerate() {
            if let Some(child) = self.new_learning_node(dist) {
                new_split.set_child(branch, child);
            }
        }
        self.nodes[node_id.0] = Node::Split(new_split);

        self.active_leaf_node_count = (self.active_leaf_node_count + num_splits).saturating_sub(1);
        self.decision_node_count += 1;

        debug!(
            node = %node_id,
            ?parent_branch,
            condition = %description,
            merit = split_decision.merit,
            ?bound,
            num_splits,
            "split materialised"
        );
    }

    pub fn describe_tree(&self) -> String {
        let mut out = String::new();
        if let (Some(root), Some(ctx)) = (self.tree_root, self.context.as_ref()) {
            let width = self.nodes[root.0].observed_class_distribution().non_zero_length();
            self.describe_subtree(root, 0, width, ctx, &mut out);
        }
        out
    }

    fn describe_subtree(
        &self,
        id: NodeId,
        indent: usize,
        width: usize,
        ctx: &ModelContext,
        out: &mut String,
    ) {
        match &self.nodes[id.0] {
            Node::Split(split) => {
                for (branch, child) in split.children() {
                    let condition = split
                        .split_test()
                        .describe_condition_for_branch(branch, &ctx.header);
                    let _ = writeln!(out, "{:indent$}if {condition}: ", "");
                    self.describe_subtree(child, indent + 2, width, ctx, out);
                }
            }
            Node::Learning(leaf) => {
                let dist = leaf.observed_class_distribution();
                let class_name = ctx
                    .header
                    .attribute_at_index(ctx.header.class_index())
                    .map(|a| a.name())
                    .unwrap_or_default();
                let label = ctx
                    .header
                    .class_label(dist.max_class_index().unwrap_or(0));
                let weights: Vec<String> = dist
                    .as_slice()
                    .iter()
                    .take(width)
                    .map(|&w| format_weight(w))
                    .collect();
                let _ = writeln!(
                    out,
                    "{:indent$}Leaf [{class_name}] = {label} weights: {{{}}}",
                    "",
                    weights.join("|")
                );
            }
        }
    }
}

fn format_weight(w: f64) -> String {
    let s = format!("{w:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

impl Classifier for HoeffdingTree {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let Some(ctx) = &self.context else {
            return vec![0.0; instance.number_of_classes()];
        };
        let found = self.filter_instance_to_leaf(instance);
        let Some(id) = found.node.or(found.parent_branch.map(|pb| pb.parent)) else {
            return vec![0.0; ctx.empty_distribution.len()];
        };

        match &self.nodes[id.0] {
            Node::Learning(leaf) => leaf.get_class_votes(instance, self.config.nb_threshold),
            Node::Split(split) => split.observed_class_distribution().as_slice().to_vec(),
        }
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), VfdtError> {
        self.initialize(header)?;
        Ok(())
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        let Some(ctx) = &self.context else {
            debug!("model not initialised, skipping instance");
            return;
        };
        let num_classes = ctx.empty_distribution.len();
        let Some(class_index) = instance
            .class_value()
            .and_then(|v| category_index(v, num_classes))
        else {
            debug!(class_value = ?instance.class_value(), "missing or unknown class, skipping instance");
            return;
        };
        let weight = instance.weight();
        if !weight.is_finite() || weight < 0.0 {
            debug!(weight, "unusable instance weight, skipping instance");
            return;
        }
        let empty_distribution = ctx.empty_distribution.clone();

        let found = self.filter_instance_to_leaf(instance);
        let leaf_id = match (found.node, found.parent_branch) {
            (Some(id), _) => id,
            (None, Some(pb)) => {
                let Some(id) = self.new_learning_node(empty_distribution) else {
                    return;
                };
                if let Some(split) = self.nodes[pb.parent.0].as_split_mut() {
                    split.set_child(pb.branch, id);
                }
                self.active_leaf_node_count += 1;
                debug!(node = %id, parent = %pb.parent, branch = pb.branch, "learning node created");
                id
            }
            (None, None) => return,
        };

        let Some(leaf) = self.nodes[leaf_id.0].as_learning_mut() else {
            return;
        };
        leaf.learn_from_instance(instance, class_index);
        self.training_weight_seen_by_model += weight;

        if self.growth_allowed && leaf.is_active() {
            let weight_seen = leaf.get_weight_seen();
            if weight_seen - leaf.get_weight_seen_at_last_split_evaluation()
                >= self.config.grace_period as f64
            {
                leaf.set_weight_seen_at_last_split_evaluation(weight_seen);
                self.attempt_to_split(leaf_id, found.parent_branch);
            }
        }
    }

    fn model_description(&self) -> Option<String> {
        self.context.as_ref().map(|_| self.describe_tree())
    }
}
