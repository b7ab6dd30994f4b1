use crate::core::instances::Instance;
use crate::evaluation::Measurement;

/// Online evaluator of predictive performance.
///
/// Consumes labelled instances with the class votes a learner produced for
/// them, before training, and exposes aggregated metrics through
/// [`performance`](PerformanceEvaluator::performance).
pub trait PerformanceEvaluator {
    /// Clears all accumulated state.
    fn reset(&mut self);

    /// Feeds one labelled instance and its class votes. Instances with a
    /// missing class or unusable votes may be skipped.
    fn add_result(&mut self, example: &dyn Instance, class_votes: Vec<f64>);

    fn performance(&self) -> Vec<Measurement>;
}

pub trait PerformanceEvaluatorExt {
    /// Value of the measurement called `name`, if the evaluator reports one.
    fn metric(&self, name: &str) -> Option<f64>;
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metric(&self, name: &str) -> Option<f64> {
        self.performance()
            .into_iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }
}
