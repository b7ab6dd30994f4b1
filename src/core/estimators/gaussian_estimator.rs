use crate::utils::math::normal_probability;
use std::f64::consts::PI;

/// Weight of a Gaussian sample falling below, at, and above a value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightSplit {
    pub less: f64,
    pub equal: f64,
    pub greater: f64,
}

/// Weighted incremental mean and variance (Welford), plus the observed range.
#[derive(Clone, Debug)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
    min_observed: f64,
    max_observed: f64,
}

impl Default for GaussianEstimator {
    fn default() -> Self {
        Self {
            weight_sum: 0.0,
            mean: 0.0,
            variance_sum: 0.0,
            min_observed: f64::INFINITY,
            max_observed: f64::NEG_INFINITY,
        }
    }
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-finite values and non-positive weights are ignored.
    #[inline]
    pub fn observe(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || weight <= 0.0 || !weight.is_finite() {
            return;
        }

        if self.weight_sum > 0.0 {
            self.weight_sum += weight;
            let last_mean = self.mean;
            self.mean += weight * (value - last_mean) / self.weight_sum;
            self.variance_sum += weight * (value - last_mean) * (value - self.mean);
        } else {
            self.mean = value;
            self.weight_sum = weight;
        }

        self.min_observed = self.min_observed.min(value);
        self.max_observed = self.max_observed.max(value);
    }

    pub fn total_weight(&self) -> f64 {
        self.weight_sum
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min_observed(&self) -> f64 {
        self.min_observed
    }

    pub fn max_observed(&self) -> f64 {
        self.max_observed
    }

    /// Sample variance; zero until more than one unit of weight is seen.
    pub fn variance(&self) -> f64 {
        if self.weight_sum > 1.0 {
            self.variance_sum / (self.weight_sum - 1.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Normal density at `value`. With zero spread the estimator is a spike:
    /// 1 exactly at the mean, 0 elsewhere.
    pub fn probability_density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let std_dev = self.std_dev();
        if std_dev > 0.0 {
            let diff = value - self.mean;
            return (1.0 / ((2.0 * PI).sqrt() * std_dev))
                * ((-diff * diff) / (2.0 * std_dev * std_dev)).exp();
        }
        if value == self.mean { 1.0 } else { 0.0 }
    }

    pub fn estimated_weight_split(&self, value: f64) -> WeightSplit {
        let equal = self.probability_density(value) * self.weight_sum;
        let std_dev = self.std_dev();
        let less = if std_dev > 0.0 {
            normal_probability((value - self.mean) / std_dev) * self.weight_sum - equal
        } else if value < self.mean {
            self.weight_sum - equal
        } else {
            0.0
        };
        let greater = (self.weight_sum - equal - less).max(0.0);
        WeightSplit {
            less,
            equal,
            greater,
        }
    }

    /// Folds another estimator's statistics into this one.
    pub fn merge(&mut self, other: &GaussianEstimator) {
        if other.weight_sum <= 0.0 {
            return;
        }
        if self.weight_sum <= 0.0 {
            *self = other.clone();
            return;
        }
        let total = self.weight_sum + other.weight_sum;
        let old_mean = self.mean;
        self.mean = self.mean * (self.weight_sum / total) + other.mean * (other.weight_sum / total);
        self.variance_sum += other.variance_sum
            + (self.weight_sum * other.weight_sum / total) * (other.mean - old_mean).powi(2);
        self.weight_sum = total;
        self.min_observed = self.min_observed.min(other.min_observed);
        self.max_observed = self.max_observed.max(other.max_observed);
    }
}
