use crate::classifiers::attribute_class_observers::{AttributeClassObserver, AttributeObserver};
use crate::classifiers::hoeffding_tree::instance_conditional_test::known_value;
use crate::core::class_distribution::ClassDistribution;
use crate::core::instances::Instance;
use tracing::warn;

/// Smallest factor multiplied into a class score, so one unseen value
/// cannot zero out a class on its own.
pub const MIN_PROBABILITY: f64 = 1e-75;

/// Naive-Bayes class scores from a leaf's statistics.
///
/// `attribute_observers` is indexed by header attribute position; `None`
/// slots (the class column) are skipped, as are observers that have seen no
/// weight and attributes whose value is missing on `instance`.
pub fn do_naive_bayes_prediction(
    instance: &dyn Instance,
    observed_class_distribution: &ClassDistribution,
    attribute_observers: &[Option<AttributeObserver>],
) -> Vec<f64> {
    let mut votes = vec![0.0; observed_class_distribution.len()];
    let observed_class_sum = observed_class_distribution.total_weight();
    if observed_class_sum == 0.0 {
        return votes;
    }

    for (class_index, vote) in votes.iter_mut().enumerate() {
        let mut score = observed_class_distribution.get(class_index) / observed_class_sum;

        for (att_index, slot) in attribute_observers.iter().enumerate() {
            let Some(obs) = slot else { continue };
            if obs.total_weight_observed() == 0.0 {
                continue;
            }
            let Some(x) = known_value(instance, att_index) else {
                continue;
            };

            let p = obs.probability_of_attribute_value_given_class(x, class_index);
            score *= p.max(MIN_PROBABILITY);
        }

        if score.is_nan() {
            warn!(class_index, "naive bayes score is NaN, using 0");
            score = 0.0;
        }
        *vote = score;
    }
    votes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::attribute_class_observers::{
        GaussianNumericAttributeClassObserver, NominalAttributeClassObserver,
    };
    use crate::testing::{header_nominal_xy, nominal_row};

    const EPS: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn empty_distribution_gives_zero_votes() {
        let h = header_nominal_xy();
        let dist = ClassDistribution::new(2).unwrap();
        let observers = vec![None, None];
        let votes = do_naive_bayes_prediction(&nominal_row(&h, 0.0, 0), &dist, &observers);
        assert_eq!(votes, vec![0.0, 0.0]);
    }

    #[test]
    fn multiplies_prior_by_likelihood() {
        let h = header_nominal_xy();
        let mut obs = NominalAttributeClassObserver::new(2, 2);
        obs.observe_attribute_class(0.0, 0, 3.0);
        obs.observe_attribute_class(1.0, 1, 1.0);
        let dist = ClassDistribution::from_weights(vec![3.0, 1.0]).unwrap();
        let observers = vec![Some(AttributeObserver::Nominal(obs)), None];

        let votes = do_naive_bayes_prediction(&nominal_row(&h, 0.0, 0), &dist, &observers);

        // class 0: 3/4 * (3+1)/(3+2); class 1: 1/4 * (0+1)/(1+2)
        assert!(approx_eq(votes[0], 0.75 * 0.8));
        assert!(approx_eq(votes[1], 0.25 / 3.0));
    }

    #[test]
    fn missing_values_and_unused_observers_are_skipped() {
        let h = header_nominal_xy();
        let dist = ClassDistribution::from_weights(vec![1.0, 3.0]).unwrap();
        let mut nominal = NominalAttributeClassObserver::new(2, 2);
        nominal.observe_attribute_class(0.0, 0, 1.0);
        let observers = vec![Some(AttributeObserver::Nominal(nominal)), None];

        let votes = do_naive_bayes_prediction(&nominal_row(&h, f64::NAN, 0), &dist, &observers);
        assert!(approx_eq(votes[0], 0.25));
        assert!(approx_eq(votes[1], 0.75));

        let unused = vec![
            Some(AttributeObserver::Numeric(
                GaussianNumericAttributeClassObserver::new(2, 10),
            )),
            None,
        ];
        let votes = do_naive_bayes_prediction(&nominal_row(&h, 1.0, 0), &dist, &unused);
        assert!(approx_eq(votes[1], 0.75));
    }

    #[test]
    fn zero_likelihood_is_floored() {
        let h = header_nominal_xy();
        let mut obs = GaussianNumericAttributeClassObserver::new(2, 10);
        obs.observe_attribute_class(5.0, 0, 1.0);
        let dist = ClassDistribution::from_weights(vec![1.0, 0.0]).unwrap();
        let observers = vec![Some(AttributeObserver::Numeric(obs)), None];

        let votes = do_naive_bayes_prediction(&nominal_row(&h, 1.0, 0), &dist, &observers);
        assert!(approx_eq(votes[0], MIN_PROBABILITY));
        assert_eq!(votes[1], 0.0);
    }

    #[test]
    fn nan_score_becomes_zero_vote() {
        // an infinite class weight makes the prior inf / inf
        let h = header_nominal_xy();
        let mut obs = NominalAttributeClassObserver::new(2, 2);
        obs.observe_attribute_class(0.0, 0, 1.0);
        let dist = ClassDistribution::from_weights(vec![f64::INFINITY, 1.0]).unwrap();
        let observers = vec![Some(AttributeObserver::Nominal(obs)), None];

        let votes = do_naive_bayes_prediction(&nominal_row(&h, 0.0, 0), &dist, &observers);
        assert_eq!(votes, vec![0.0, 0.0]);
    }
}
