use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::instance_conditional_test::NumericAttributeBinaryTest;
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::class_distribution::ClassDistribution;
use crate::core::estimators::GaussianEstimator;

#[derive(Clone, Debug)]
pub struct GaussianNumericAttributeClassObserver {
    attribute_value_distribution_per_class: Vec<Option<GaussianEstimator>>,
    num_bins_option: usize,
}

impl GaussianNumericAttributeClassObserver {
    pub fn new(num_classes: usize, num_bins: usize) -> Self {
        GaussianNumericAttributeClassObserver {
            attribute_value_distribution_per_class: vec![None; num_classes],
            num_bins_option: num_bins,
        }
    }

    pub fn get_split_point_suggestions(&self) -> Vec<f64> {
        let mut min_val = f64::INFINITY;
        let mut max_val = f64::NEG_INFINITY;

        for est in self.attribute_value_distribution_per_class.iter().flatten() {
            min_val = min_val.min(est.min_observed());
            max_val = max_val.max(est.max_observed());
        }

        if !(min_val.is_finite() && max_val.is_finite()) {
            return vec![];
        }

        let range = max_val - min_val;
        let mut suggestions: Vec<f64> = Vec::with_capacity(self.num_bins_option);

        for i in 0..self.num_bins_option {
            let split_value =
                (range / (self.num_bins_option as f64 + 1.0)) * (i as f64 + 1.0) + min_val;
            if split_value > min_val
                && split_value < max_val
                && suggestions.last() != Some(&split_value)
            {
                suggestions.push(split_value);
            }
        }

        suggestions
    }

    pub fn get_class_dists_resulting_from_binary_split(
        &self,
        split_value: f64,
        template: &ClassDistribution,
    ) -> Vec<ClassDistribution> {
        let mut lhs = template.zeros_like();
        let mut rhs = template.zeros_like();

        for (class_idx, est_opt) in self.attribute_value_distribution_per_class.iter().enumerate() {
            let Some(est) = est_opt else { continue };
            if split_value < est.min_observed() {
                rhs.add(class_idx, est.total_weight());
            } else if split_value >= est.max_observed() {
                lhs.add(class_idx, est.total_weight());
            } else {
                let w = est.estimated_weight_split(split_value);
                lhs.add(class_idx, w.less + w.equal);
                rhs.add(class_idx, w.greater);
            }
        }
        vec![lhs, rhs]
    }
}

impl AttributeClassObserver for GaussianNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if att_val.is_nan() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        let Some(slot) = self.attribute_value_distribution_per_class.get_mut(class_val) else {
            return;
        };
        slot.get_or_insert_with(GaussianEstimator::new)
            .observe(att_val, weight);
    }

    fn probability_of_attribute_value_given_class(&self, att_val: f64, class_val: usize) -> f64 {
        match self.attribute_value_distribution_per_class.get(class_val) {
            Some(Some(est)) => est.probability_density(att_val),
            _ => 0.0,
        }
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &ClassDistribution,
        att_index: usize,
        _binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        let mut best: Option<AttributeSplitSuggestion> = None;

        for split_value in self.get_split_point_suggestions() {
            let post_dists =
                self.get_class_dists_resulting_from_binary_split(split_value, pre_split_dist);
            let merit = criterion.get_merit_of_split(pre_split_dist, &post_dists);

            if best.as_ref().is_none_or(|b| merit > b.merit) {
                best = Some(AttributeSplitSuggestion::new(
                    Some(NumericAttributeBinaryTest::new(att_index, split_value, true).into()),
                    post_dists,
                    merit,
                ));
            }
        }
        best
    }

    fn total_weight_observed(&self) -> f64 {
        self.attribute_value_distribution_per_class
            .iter()
            .flatten()
            .map(GaussianEstimator::total_weight)
            .sum()
    }
}
