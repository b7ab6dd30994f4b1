use crate::classifiers::attribute_class_observers::{
    AttributeClassObserver, AttributeObserver, NullAttributeClassObserver,
};
use crate::classifiers::bayes::do_naive_bayes_prediction;
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::LeafPredictionOption;
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::class_distribution::ClassDistribution;
use crate::core::instances::Instance;
use crate::utils::math::max_index;

/// How a leaf turns its statistics into class votes.
#[derive(Clone, Debug, PartialEq)]
pub enum LeafPredictor {
    MajorityClass,
    /// Naive Bayes once the leaf has seen at least `nb_threshold` weight.
    NaiveBayes,
    /// Whichever of majority class and naive Bayes has been right more often
    /// on the instances this leaf trained on.
    NaiveBayesAdaptive {
        mc_correct_weight: f64,
        nb_correct_weight: f64,
    },
}

impl From<LeafPredictionOption> for LeafPredictor {
    fn from(option: LeafPredictionOption) -> Self {
        match option {
            LeafPredictionOption::MajorityClass => LeafPredictor::MajorityClass,
            LeafPredictionOption::NaiveBayes => LeafPredictor::NaiveBayes,
            LeafPredictionOption::NbAdaptive => LeafPredictor::NaiveBayesAdaptive {
                mc_correct_weight: 0.0,
                nb_correct_weight: 0.0,
            },
        }
    }
}

/// A leaf. Active leaves feed their attribute observers and are considered
/// for splitting; inactive ones only count classes.
#[derive(Clone, Debug)]
pub struct LearningNode {
    observed_class_distribution: ClassDistribution,
    attribute_observers: Vec<Option<AttributeObserver>>,
    weight_seen_at_last_split_evaluation: f64,
    is_active: bool,
    predictor: LeafPredictor,
}

impl LearningNode {
    /// `attribute_observers` is indexed by header attribute position, with
    /// `None` in the class slot.
    pub fn new(
        initial_class_observations: ClassDistribution,
        attribute_observers: Vec<Option<AttributeObserver>>,
        predictor: LeafPredictor,
    ) -> Self {
        Self {
            weight_seen_at_last_split_evaluation: initial_class_observations.total_weight(),
            observed_class_distribution: initial_class_observations,
            attribute_observers,
            is_active: true,
            predictor,
        }
    }

    pub fn observed_class_distribution(&self) -> &ClassDistribution {
        &self.observed_class_distribution
    }

    pub fn attribute_observers(&self) -> &[Option<AttributeObserver>] {
        &self.attribute_observers
    }

    pub fn predictor(&self) -> &LeafPredictor {
        &self.predictor
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn get_weight_seen(&self) -> f64 {
        self.observed_class_distribution.total_weight()
    }

    pub fn get_weight_seen_at_last_split_evaluation(&self) -> f64 {
        self.weight_seen_at_last_split_evaluation
    }

    pub fn set_weight_seen_at_last_split_evaluation(&mut self, weight: f64) {
        self.weight_seen_at_last_split_evaluation = weight;
    }

    pub fn calculate_promise(&self) -> f64 {
        self.observed_class_distribution.promise()
    }

    pub fn observed_class_distribution_is_pure(&self) -> bool {
        self.observed_class_distribution.is_pure()
    }

    /// `class_index` must be a valid class of this leaf's distribution.
    pub fn learn_from_instance(&mut self, instance: &dyn Instance, class_index: usize) {
        let weight = instance.weight();

        if let LeafPredictor::NaiveBayesAdaptive {
            mc_correct_weight,
            nb_correct_weight,
        } = &mut self.predictor
        {
            if self.observed_class_distribution.max_class_index() == Some(class_index) {
                *mc_correct_weight += weight;
            }
            let nb_prediction = do_naive_bayes_prediction(
                instance,
                &self.observed_class_distribution,
                &self.attribute_observers,
            );
            if max_index(&nb_prediction) == Some(class_index) {
                *nb_correct_weight += weight;
            }
        }

        self.observed_class_distribution.add(class_index, weight);

        if !self.is_active {
            return;
        }
        for (att_index, slot) in self.attribute_observers.iter_mut().enumerate() {
            let Some(obs) = slot else { continue };
            let value = instance.value_at_index(att_index).unwrap_or(f64::NAN);
            obs.observe_attribute_class(value, class_index, weight);
        }
    }

    /// Candidate splits sorted by ascending merit. Unless `no_pre_prune`, the
    /// "do not split" candidate is included.
    pub fn get_best_split_suggestions(
        &self,
        criterion: &dyn SplitCriterion,
        no_pre_prune: bool,
        binary_only: bool,
    ) -> Vec<AttributeSplitSuggestion> {
        let pre_split_dist = &self.observed_class_distribution;
        let mut best_suggestions = Vec::with_capacity(self.attribute_observers.len() + 1);

        if !no_pre_prune {
            let merit = criterion
                .get_merit_of_split(pre_split_dist, std::slice::from_ref(pre_split_dist));
            best_suggestions.push(AttributeSplitSuggestion::new(None, Vec::new(), merit));
        }

        for (att_index, slot) in self.attribute_observers.iter().enumerate() {
            let Some(obs) = slot else { continue };
            if let Some(suggestion) = obs.get_best_evaluated_split_suggestion(
                criterion,
                pre_split_dist,
                att_index,
                binary_only,
            ) {
                best_suggestions.push(suggestion);
            }
        }

        best_suggestions.sort_by(AttributeSplitSuggestion::compare_merit);
        best_suggestions
    }

    /// Stops considering `att_index` at this leaf. Naive-Bayes leaves keep
    /// the observer because prediction still reads it.
    pub fn disable_attribute(&mut self, att_index: usize) {
        if self.predictor != LeafPredictor::MajorityClass {
            return;
        }
        if let Some(slot) = self.attribute_observers.get_mut(att_index)
            && slot.is_some()
        {
            *slot = Some(AttributeObserver::Null(NullAttributeClassObserver::new()));
        }
    }

    pub fn get_class_votes(&self, instance: &dyn Instance, nb_threshold: f64) -> Vec<f64> {
        let majority = || self.observed_class_distribution.as_slice().to_vec();
        let naive_bayes = || {
            do_naive_bayes_prediction(
                instance,
                &self.observed_class_distribution,
                &self.attribute_observers,
            )
        };

        match &self.predictor {
            LeafPredictor::MajorityClass => majority(),
            LeafPredictor::NaiveBayes => {
                if self.get_weight_seen() < nb_threshold {
                    majority()
                } else {
                    naive_bayes()
                }
            }
            LeafPredictor::NaiveBayesAdaptive {
                mc_correct_weight,
                nb_correct_weight,
            } => {
                if mc_correct_weight > nb_correct_weight {
                    majority()
                } else {
                    naive_bayes()
                }
            }
        }
    }
}
