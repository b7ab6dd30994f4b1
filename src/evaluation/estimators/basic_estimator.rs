use crate::evaluation::estimators::Estimator;

/// Weighted streaming mean, `Σ w·v / Σ w`. `NaN` values and non-positive
/// weights are ignored; the estimate is `NaN` until something was added.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicEstimator {
    weight: f64,
    sum: f64,
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, value: f64, weight: f64) {
        if value.is_nan() || weight.is_nan() || weight <= 0.0 {
            return;
        }
        self.weight += weight;
        self.sum += value * weight;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn empty_estimate_is_nan() {
        assert!(BasicEstimator::default().estimation().is_nan());
    }

    #[test]
    fn weights_scale_contributions() {
        let mut e = BasicEstimator::default();
        e.add(1.0, 3.0);
        e.add(0.0, 1.0);
        e.add(f64::NAN, 5.0);
        e.add(1.0, 0.0);
        assert!((e.estimation() - 0.75).abs() < EPS);
    }
}
