use crate::classifiers::hoeffding_tree::split_criteria::{
    GiniSplitCriterion, InfoGainSplitCriterion,
};
use crate::core::class_distribution::ClassDistribution;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Scores a candidate split of `pre_split_distribution` into
/// `post_split_distributions`. Higher is better.
pub trait SplitCriterion: Send + Sync {
    /// Largest possible merit for this distribution; the `R` in the
    /// Hoeffding bound.
    fn get_range_of_merit(&self, pre_split_distribution: &ClassDistribution) -> f64;

    fn get_merit_of_split(
        &self,
        pre_split_distribution: &ClassDistribution,
        post_split_distributions: &[ClassDistribution],
    ) -> f64;
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SplitCriterionOption {
    #[default]
    InfoGain,
    Gini,
}

impl SplitCriterionOption {
    pub fn build(self, min_branch_fraction: f64) -> Box<dyn SplitCriterion> {
        match self {
            SplitCriterionOption::InfoGain => {
                Box::new(InfoGainSplitCriterion::new(min_branch_fraction))
            }
            SplitCriterionOption::Gini => Box::new(GiniSplitCriterion::new()),
        }
    }
}

/// Weight carried by each distribution, and their sum.
pub(super) fn branch_weights(dists: &[ClassDistribution]) -> (Vec<f64>, f64) {
    let weights: Vec<f64> = dists.iter().map(ClassDistribution::total_weight).collect();
    let total = weights.iter().sum();
    (weights, total)
}
