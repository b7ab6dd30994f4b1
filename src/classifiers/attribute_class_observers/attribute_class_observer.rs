use crate::classifiers::attribute_class_observers::{
    GaussianNumericAttributeClassObserver, NominalAttributeClassObserver,
    NullAttributeClassObserver,
};
use crate::classifiers::conditional_tests::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterion;
use crate::core::attributes::{Attribute, NominalAttribute, NumericAttribute};
use crate::core::class_distribution::ClassDistribution;

pub trait AttributeClassObserver {
    /// Rows with a negative or non-finite weight are ignored.
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64);

    fn probability_of_attribute_value_given_class(&self, att_val: f64, class_val: usize) -> f64;

    /// `att_index` is the attribute's position in the instance header.
    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &ClassDistribution,
        att_index: usize,
        binary_only: bool,
    ) -> Option<AttributeSplitSuggestion>;

    fn total_weight_observed(&self) -> f64;
}

#[derive(Clone, Debug)]
pub enum AttributeObserver {
    Nominal(NominalAttributeClassObserver),
    Numeric(GaussianNumericAttributeClassObserver),
    Null(NullAttributeClassObserver),
}

impl AttributeObserver {
    /// `None` for string and other unobservable attributes.
    pub fn for_attribute(
        attribute: &dyn Attribute,
        num_classes: usize,
        num_bins: usize,
    ) -> Option<Self> {
        let any = attribute.as_any();
        if let Some(nominal) = any.downcast_ref::<NominalAttribute>() {
            return Some(AttributeObserver::Nominal(NominalAttributeClassObserver::new(
                nominal.number_of_values(),
                num_classes,
            )));
        }
        if any.is::<NumericAttribute>() {
            return Some(AttributeObserver::Numeric(
                GaussianNumericAttributeClassObserver::new(num_classes, num_bins),
            ));
        }
        None
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeObserver::Null(_))
    }

    fn inner(&self) -> &dyn AttributeClassObserver {
        match self {
            AttributeObserver::Nominal(o) => o,
            AttributeObserver::Numeric(o) => o,
            AttributeObserver::Null(o) => o,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn AttributeClassObserver {
        match self {
            AttributeObserver::Nominal(o) => o,
            AttributeObserver::Numeric(o) => o,
            AttributeObserver::Null(o) => o,
        }
    }
}

impl AttributeClassObserver for AttributeObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize, weight: f64) {
        self.inner_mut()
            .observe_attribute_class(att_val, class_val, weight)
    }

    fn probability_of_attribute_value_given_class(&self, att_val: f64, class_val: usize) -> f64 {
        self.inner()
            .probability_of_attribute_value_given_class(att_val, class_val)
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &ClassDistribution,
        att_index: usize,
        binary_only: bool,
    ) -> Option<AttributeSplitSuggestion> {
        self.inner().get_best_evaluated_split_suggestion(
            criterion,
            pre_split_dist,
            att_index,
            binary_only,
        )
    }

    fn total_weight_observed(&self) -> f64 {
        self.inner().total_weight_observed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::StringAttribute;

    #[test]
    fn picks_observer_by_attribute_kind() {
        let nominal = NominalAttribute::from_labels("a", vec!["x".into(), "y".into()]);
        let numeric = NumericAttribute::new("b".into());
        let text = StringAttribute::new("c".into());

        assert!(matches!(
            AttributeObserver::for_attribute(&nominal, 2, 10),
            Some(AttributeObserver::Nominal(_))
        ));
        assert!(matches!(
            AttributeObserver::for_attribute(&numeric, 2, 10),
            Some(AttributeObserver::Numeric(_))
        ));
        assert!(AttributeObserver::for_attribute(&text, 2, 10).is_none());
    }

    #[test]
    fn null_observer_is_inert() {
        let mut o = AttributeObserver::Null(NullAttributeClassObserver::new());
        o.observe_attribute_class(1.0, 0, 3.0);
        assert!(o.is_null());
        assert_eq!(o.total_weight_observed(), 0.0);
        assert_eq!(o.probability_of_attribute_value_given_class(1.0, 0), 0.0);
    }
}
