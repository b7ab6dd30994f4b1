use crate::classifiers::hoeffding_tree::instance_conditional_test::SplitTest;
use crate::core::class_distribution::ClassDistribution;
use std::cmp::Ordering;

/// A candidate split: the test (or `None` for "do not split"), the class
/// distribution each branch would start with, and its merit.
#[derive(Clone, Debug)]
pub struct AttributeSplitSuggestion {
    pub split_test: Option<SplitTest>,
    pub resulting_class_distributions: Vec<ClassDistribution>,
    pub merit: f64,
}

impl AttributeSplitSuggestion {
    pub fn new(
        split_test: Option<SplitTest>,
        resulting_class_distributions: Vec<ClassDistribution>,
        merit: f64,
    ) -> Self {
        Self {
            split_test,
            resulting_class_distributions,
            merit,
        }
    }

    pub fn number_of_splits(&self) -> usize {
        self.resulting_class_distributions.len()
    }

    pub fn resulting_class_distribution_from_split(
        &self,
        split_index: usize,
    ) -> Option<&ClassDistribution> {
        self.resulting_class_distributions.get(split_index)
    }

    pub fn get_merit(&self) -> f64 {
        self.merit
    }

    /// Ascending by merit. NaN compares equal so sorting stays stable.
    pub fn compare_merit(&self, other: &Self) -> Ordering {
        self.merit
            .partial_cmp(&other.merit)
            .unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(w: &[f64]) -> ClassDistribution {
        ClassDistribution::from_weights(w.to_vec()).unwrap()
    }

    #[test]
    fn sorting_is_ascending_and_stable() {
        let mut v = vec![
            AttributeSplitSuggestion::new(None, vec![dist(&[1.0, 0.0])], 0.5),
            AttributeSplitSuggestion::new(None, vec![dist(&[2.0, 0.0])], f64::NEG_INFINITY),
            AttributeSplitSuggestion::new(None, vec![dist(&[3.0, 0.0])], 0.5),
            AttributeSplitSuggestion::new(None, vec![dist(&[4.0, 0.0])], 0.1),
        ];
        v.sort_by(AttributeSplitSuggestion::compare_merit);

        let firsts: Vec<f64> = v
            .iter()
            .map(|s| s.resulting_class_distributions[0].get(0))
            .collect();
        assert_eq!(firsts, vec![2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn exposes_branch_distributions() {
        let s = AttributeSplitSuggestion::new(
            None,
            vec![dist(&[1.0, 2.0]), dist(&[3.0, 4.0])],
            0.0,
        );
        assert_eq!(s.number_of_splits(), 2);
        assert_eq!(
            s.resulting_class_distribution_from_split(1),
            Some(&dist(&[3.0, 4.0]))
        );
        assert!(s.resulting_class_distribution_from_split(2).is_none());
    }
}
