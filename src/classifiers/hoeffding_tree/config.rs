use crate::classifiers::hoeffding_tree::LeafPredictionOption;
use crate::classifiers::hoeffding_tree::split_criteria::{
    DEFAULT_MIN_BRANCH_FRACTION, SplitCriterionOption,
};
use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_max_byte_size() -> usize {
    33_554_432
}
fn default_grace_period() -> usize {
    200
}
fn default_split_confidence() -> f64 {
    1e-7
}
fn default_tie_threshold() -> f64 {
    0.05
}
fn default_nb_threshold() -> f64 {
    0.0
}
fn default_num_bins() -> usize {
    10
}
fn default_min_branch_fraction() -> f64 {
    DEFAULT_MIN_BRANCH_FRACTION
}

/// Static settings of a [`HoeffdingTree`](crate::classifiers::HoeffdingTree),
/// read once at construction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HoeffdingTreeConfig {
    #[serde(default = "default_max_byte_size")]
    #[schemars(
        title = "Maximum byte size",
        description = "Memory budget for the tree (bytes). Accepted but not enforced.",
        default = "default_max_byte_size"
    )]
    pub max_byte_size: usize,

    #[serde(default = "default_grace_period")]
    #[schemars(
        title = "Grace period",
        description = "Weight a leaf should observe between split attempts.",
        default = "default_grace_period"
    )]
    pub grace_period: usize,

    #[serde(default)]
    #[schemars(title = "Split criterion", description = "info-gain or gini.")]
    pub split_criterion: SplitCriterionOption,

    #[serde(default = "default_split_confidence")]
    #[schemars(
        title = "Split confidence",
        description = "Allowed error in a split decision (0-1).",
        range(min = 0.0, max = 1.0),
        default = "default_split_confidence"
    )]
    pub split_confidence: f64,

    #[serde(default = "default_tie_threshold")]
    #[schemars(
        title = "Tie threshold",
        description = "Split anyway once the bound drops below this value.",
        default = "default_tie_threshold"
    )]
    pub tie_threshold: f64,

    #[serde(default)]
    #[schemars(
        title = "Enforce binary splits?",
        description = "Only allow binary splits."
    )]
    pub binary_splits: bool,

    #[serde(default)]
    #[schemars(
        title = "Disable poor attributes?",
        description = "Stop observing attributes that trail the best split by more than the bound."
    )]
    pub remove_poor_attributes: bool,

    #[serde(default)]
    #[schemars(
        title = "Disable pre-pruning?",
        description = "Do not consider the no-split candidate."
    )]
    pub no_pre_prune: bool,

    #[serde(default)]
    #[schemars(
        title = "Leaf prediction",
        description = "majority-class, naive-bayes or nb-adaptive."
    )]
    pub leaf_prediction: LeafPredictionOption,

    #[serde(default = "default_nb_threshold")]
    #[schemars(
        title = "Naive Bayes threshold",
        description = "Weight a naive-bayes leaf must see before using naive Bayes.",
        default = "default_nb_threshold"
    )]
    pub nb_threshold: f64,

    #[serde(default = "default_num_bins")]
    #[schemars(
        title = "Number of bins",
        description = "Candidate thresholds per numeric attribute.",
        default = "default_num_bins"
    )]
    pub num_bins: usize,

    #[serde(default = "default_min_branch_fraction")]
    #[schemars(
        title = "Minimum branch fraction",
        description = "Share of weight at least two branches need for a split to count.",
        range(min = 0.0, max = 0.5),
        default = "default_min_branch_fraction"
    )]
    pub min_branch_fraction: f64,
}

impl Default for HoeffdingTreeConfig {
    fn default() -> Self {
        Self {
            max_byte_size: default_max_byte_size(),
            grace_period: default_grace_period(),
            split_criterion: SplitCriterionOption::default(),
            split_confidence: default_split_confidence(),
            tie_threshold: default_tie_threshold(),
            binary_splits: false,
            remove_poor_attributes: false,
            no_pre_prune: false,
            leaf_prediction: LeafPredictionOption::default(),
            nb_threshold: default_nb_threshold(),
            num_bins: default_num_bins(),
            min_branch_fraction: default_min_branch_fraction(),
        }
    }
}

impl HoeffdingTreeConfig {
    #[must_use]
    pub fn with_grace_period(mut self, grace_period: usize) -> Self {
        self.grace_period = grace_period;
        self
    }

    #[must_use]
    pub fn with_split_criterion(mut self, split_criterion: SplitCriterionOption) -> Self {
        self.split_criterion = split_criterion;
        self
    }

    #[must_use]
    pub fn with_split_confidence(mut self, split_confidence: f64) -> Self {
        self.split_confidence = split_confidence;
        self
    }

    #[must_use]
    pub fn with_tie_threshold(mut self, tie_threshold: f64) -> Self {
        self.tie_threshold = tie_threshold;
        self
    }

    #[must_use]
    pub fn with_binary_splits(mut self, binary_splits: bool) -> Self {
        self.binary_splits = binary_splits;
        self
    }

    #[must_use]
    pub fn with_remove_poor_attributes(mut self, remove_poor_attributes: bool) -> Self {
        self.remove_poor_attributes = remove_poor_attributes;
        self
    }

    #[must_use]
    pub fn with_no_pre_prune(mut self, no_pre_prune: bool) -> Self {
        self.no_pre_prune = no_pre_prune;
        self
    }

    #[must_use]
    pub fn with_leaf_prediction(mut self, leaf_prediction: LeafPredictionOption) -> Self {
        self.leaf_prediction = leaf_prediction;
        self
    }

    #[must_use]
    pub fn with_nb_threshold(mut self, nb_threshold: f64) -> Self {
        self.nb_threshold = nb_threshold;
        self
    }

    #[must_use]
    pub fn with_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = num_bins;
        self
    }

    #[must_use]
    pub fn with_min_branch_fraction(mut self, min_branch_fraction: f64) -> Self {
        self.min_branch_fraction = min_branch_fraction;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_period == 0 {
            return Err(ConfigError::ZeroGracePeriod);
        }
        if self.split_confidence.is_nan()
            || self.split_confidence <= 0.0
            || self.split_confidence >= 1.0
        {
            return Err(ConfigError::SplitConfidence(self.split_confidence));
        }
        if self.tie_threshold.is_nan() || self.tie_threshold < 0.0 {
            return Err(ConfigError::TieThreshold(self.tie_threshold));
        }
        if self.num_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }
        if !(0.0..0.5).contains(&self.min_branch_fraction) {
            return Err(ConfigError::MinBranchFraction(self.min_branch_fraction));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::schema_for;
    use serde_json::json;

    #[test]
    fn default_functions_are_expected() {
        assert_eq!(default_max_byte_size(), 33_554_432);
        assert_eq!(default_grace_period(), 200);
        assert!((default_split_confidence() - 1e-7).abs() < f64::EPSILON);
        assert!((default_tie_threshold() - 0.05).abs() < f64::EPSILON);
        assert_eq!(default_nb_threshold(), 0.0);
        assert_eq!(default_num_bins(), 10);
        assert!((default_min_branch_fraction() - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let cfg: HoeffdingTreeConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg, HoeffdingTreeConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn enum_fields_use_kebab_case() {
        let cfg: HoeffdingTreeConfig = serde_json::from_value(json!({
            "split_criterion": "gini",
            "leaf_prediction": "majority-class",
            "grace_period": 50
        }))
        .unwrap();
        assert_eq!(cfg.split_criterion, SplitCriterionOption::Gini);
        assert_eq!(cfg.leaf_prediction, LeafPredictionOption::MajorityClass);
        assert_eq!(cfg.grace_period, 50);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let base = HoeffdingTreeConfig::default();
        assert!(matches!(
            base.clone().with_grace_period(0).validate(),
            Err(ConfigError::ZeroGracePeriod)
        ));
        assert!(matches!(
            base.clone().with_split_confidence(0.0).validate(),
            Err(ConfigError::SplitConfidence(_))
        ));
        assert!(matches!(
            base.clone().with_tie_threshold(-0.1).validate(),
            Err(ConfigError::TieThreshold(_))
        ));
        assert!(matches!(
            base.clone().with_num_bins(0).validate(),
            Err(ConfigError::ZeroBins)
        ));
        assert!(matches!(
            base.with_min_branch_fraction(0.5).validate(),
            Err(ConfigError::MinBranchFraction(_))
        ));
    }

    #[test]
    fn schema_lists_every_field() {
        let schema = serde_json::to_value(schema_for!(HoeffdingTreeConfig)).unwrap();
        let props = schema.get("properties").unwrap();
        for key in [
            "grace_period",
            "split_criterion",
            "split_confidence",
            "tie_threshold",
            "leaf_prediction",
            "nb_threshold",
            "num_bins",
        ] {
            assert!(props.get(key).is_some(), "missing {key}");
        }
    }
}
