use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::instance_conditional_test::{
    NominalAttributeBinaryTest, NominalAttributeMultiwayTest,
};
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::class_distribution::ClassDistribution;
use crate::utils::math::category_index;

#[derive(Clone, Debug)]
pub struct NominalAttributeClassObserver {
    total_weight_observed: f64,
    missing_weight_observed: f64,
    attribute_value_distribution_per_class: Vec<Vec<f64>>,
    num_values: usize,
}

impl NominalAttributeClassObserver {
    pub fn new(num_values: usize, num_classes: usize) -> NominalAttributeClassObserver {
        NominalAttributeClassObserver {
            total_weight_observed: 0.0,
            missing_weight_observed: 0.0,
            attribute_value_distribution_per_class: vec![vec![0.0; num_values]; num_classes],
            num_values,
        }
    }

    pub fn missing_weight_observed(&self) -> f64 {
        self.missing_weight_observed
    }

    fn value_slot(&self, att_val: f64) -> Option<usize> {
        category_index(att_val, self.num_values)
    }

    pub fn get_class_dists_resulting_from_multiway_split(
        &self,
        template: &ClassDistribution,
    ) -> Vec<ClassDistribution> {
        let mut dists = vec![template.zeros_like(); self.num_values];
        for (class_idx, row) in self.attribute_value_distribution_per_class.iter().enumerate() {
            for (val_idx, &count) in row.iter().enumerate() {
                dists[val_idx].add(class_idx, count);
            }
        }
        dists
    }

    pub fn get_class_dists_resulting_from_binary_split(
        &self,
        val_index: usize,
        template: &ClassDistribution,
    ) -> Vec<ClassDistribution> {
        let mut lhs = template.zeros_like();
        let mut rhs = template.zeros_like();

        for (class_idx, row) in self.attribute_value_distribution_per_class.iter().enumerate() {
            let lhs_count = row.get(val_index).copied().unwrap_or(0.0);
            let rhs_count = row.iter().sum::<f64>() - lhs_count;
            lhs.add(class_idx, lhs_count);
            rhs.add(class_idx, rhs_count);
        }
        vec![lhs, rhs]
    }
}

impl AttributeClassObserver for NominalAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        if !weight.is_finite() || weight < 0.0 {
            return;
        }
        let slot = self.value_slot(att_val).and_then(|v| {
            self.attribute_value_distribution_per_class
                .get_mut(class_val)
                .map(|row| &mut row[v])
        });
        match slot {
            Some(cell) => *cell += weight,
            None => self.missing_weight_observed += weight,
        }
        self.total_weight_observed += weight;
    }

    /// Laplace-smoothed: `(count + 1) / (class_total + num_values)`.
    fn probability_of_attribute_value_given_class(&self, att_val: f64, class_val: usize) -> f64 {
        let Some(row) = self.attribute_value_distribution_per_class.get(class_val) else {
            return 0.0;
        };
        let count = self
            .value_slot(att_val)
            .map_or(0.0, |v| row[v]);
        let sum: f64 = row.iter().sum();
        (count + 1.0) / (sum + self.num_values as f64)
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &ClassDistribution,
        att_index: usize,
        binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        let mut best: Option<AttributeSplitSuggestion> = None;

        if !binary_only {
            let post_split_dists = self.get_class_dists_resulting_from_multiway_split(pre_split_dist);
            let merit = criterion.get_merit_of_split(pre_split_dist, &post_split_dists);
            best = Some(AttributeSplitSuggestion::new(
                Some(NominalAttributeMultiwayTest::new(att_index).into()),
                post_split_dists,
                merit,
            ));
        }

        for val_index in 0..self.num_values {
            let post_split_dists =
                self.get_class_dists_resulting_from_binary_split(val_index, pre_split_dist);
            let merit = criterion.get_merit_of_split(pre_split_dist, &post_split_dists);

            if best.as_ref().is_none_or(|b| merit > b.merit) {
                best = Some(AttributeSplitSuggestion::new(
                    Some(NominalAttributeBinaryTest::new(att_index, val_index).into()),
                    post_split_dists,
                    merit,
                ));
            }
        }
        best
    }

    fn total_weight_observed(&self) -> f64 {
        self.total_weight_observed
    }
}
