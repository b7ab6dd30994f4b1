use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::classifiers::hoeffding_tree::split_criteria::split_criterion::branch_weights;
use crate::core::class_distribution::ClassDistribution;

pub const DEFAULT_MIN_BRANCH_FRACTION: f64 = 0.01;

/// Information gain, in bits. Splits where fewer than two branches carry more
/// than `min_branch_fraction` of the weight score negative infinity.
#[derive(Debug, Clone, Copy)]
pub struct InfoGainSplitCriterion {
    min_branch_fraction: f64,
}

impl Default for InfoGainSplitCriterion {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_BRANCH_FRACTION)
    }
}

impl InfoGainSplitCriterion {
    pub fn new(min_branch_fraction: f64) -> Self {
        Self {
            min_branch_fraction,
        }
    }

    pub fn min_branch_fraction(&self) -> f64 {
        self.min_branch_fraction
    }

    /// Weight-averaged entropy across branches.
    pub fn weighted_entropy(dists: &[ClassDistribution]) -> f64 {
        let (weights, total) = branch_weights(dists);
        if total <= 0.0 {
            return 0.0;
        }
        let sum: f64 = dists
            .iter()
            .zip(&weights)
            .map(|(d, w)| w * d.entropy())
            .sum();
        sum / total
    }

    pub fn num_subsets_greater_than_frac(dists: &[ClassDistribution], min_frac: f64) -> usize {
        let (weights, total) = branch_weights(dists);
        if total <= 0.0 {
            return 0;
        }
        weights.iter().filter(|&&w| w / total > min_frac).count()
    }
}

impl SplitCriterion for InfoGainSplitCriterion {
    fn get_range_of_merit(&self, pre_split_distribution: &ClassDistribution) -> f64 {
        (pre_split_distribution.non_zero_length().max(2) as f64).log2()
    }

    fn get_merit_of_split(
        &self,
        pre_split_distribution: &ClassDistribution,
        post_split_distributions: &[ClassDistribution],
    ) -> f64 {
        if Self::num_subsets_greater_than_frac(post_split_distributions, self.min_branch_fraction)
            < 2
        {
            return f64::NEG_INFINITY;
        }
        pre_split_distribution.entropy() - Self::weighted_entropy(post_split_distributions)
    }
}
