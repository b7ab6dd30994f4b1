use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::class_distribution::ClassDistribution;

#[derive(Clone, Debug, Default)]
pub struct NullAttributeClassObserver {}

impl NullAttributeClassObserver {
    pub fn new() -> Self {
        NullAttributeClassObserver {}
    }
}

impl AttributeClassObserver for NullAttributeClassObserver {
    fn observe_attribute_class(&mut self, _att_val: f64, _class_val: usize, _weight: f64) {}

    fn probability_of_attribute_value_given_class(&self, _att_val: f64, _class_val: usize) -> f64 {
        0.0
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        _criterion: &dyn SplitCriterion,
        _pre_split_dist: &ClassDistribution,
        _att_index: usize,
        _binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        None
    }

    fn total_weight_observed(&self) -> f64 {
        0.0
    }
}
