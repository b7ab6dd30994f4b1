/// Online scalar estimator.
///
/// Values arrive one at a time through [`add`](Estimator::add) together with
/// their weight, and [`estimation`](Estimator::estimation) reports the
/// current estimate.
pub trait Estimator {
    fn add(&mut self, value: f64, weight: f64);

    fn estimation(&self) -> f64;
}
