use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::classifiers::hoeffding_tree::split_criteria::split_criterion::branch_weights;
use crate::core::class_distribution::ClassDistribution;

/// One minus the weight-averaged Gini impurity of the branches.
#[derive(Debug, Clone, Copy, Default)]
pub struct GiniSplitCriterion;

impl GiniSplitCriterion {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_gini(distribution: &ClassDistribution, sum_of_weights: f64) -> f64 {
        if sum_of_weights <= 0.0 {
            return 1.0;
        }
        distribution
            .as_slice()
            .iter()
            .fold(1.0, |gini, w| gini - (w / sum_of_weights).powi(2))
    }
}

impl SplitCriterion for GiniSplitCriterion {
    fn get_range_of_merit(&self, _pre_split_distribution: &ClassDistribution) -> f64 {
        1.0
    }

    fn get_merit_of_split(
        &self,
        _pre_split_distribution: &ClassDistribution,
        post_split_distributions: &[ClassDistribution],
    ) -> f64 {
        let (weights, total) = branch_weights(post_split_distributions);
        if total <= 0.0 {
            return 0.0;
        }
        let gini: f64 = post_split_distributions
            .iter()
            .zip(&weights)
            .filter(|(_, w)| **w > 0.0)
            .map(|(d, w)| (w / total) * Self::compute_gini(d, *w))
            .sum();
        1.0 - gini
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(weights: &[f64]) -> ClassDistribution {
        ClassDistribution::from_weights(weights.to_vec()).unwrap()
    }

    #[test]
    fn pure_branches_score_one() {
        let c = GiniSplitCriterion::new();
        let merit = c.get_merit_of_split(
            &dist(&[5.0, 5.0]),
            &[dist(&[5.0, 0.0]), dist(&[0.0, 5.0])],
        );
        assert!((merit - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mixed_branch_scores_half() {
        let c = GiniSplitCriterion::new();
        let pre = dist(&[5.0, 5.0]);
        let merit = c.get_merit_of_split(&pre, std::slice::from_ref(&pre));
        assert!((merit - 0.5).abs() < 1e-12);
        assert_eq!(c.get_range_of_merit(&pre), 1.0);
    }
}
