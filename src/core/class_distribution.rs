use crate::error::DistributionError;
use std::ops::AddAssign;

/// Accumulated weight per target class.
///
/// The length is fixed at construction and always equals the number of
/// classes of the tree it belongs to. Weights only grow, except through
/// [`ClassDistribution::combine`] which produces a new accumulator.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDistribution {
    weights: Vec<f64>,
}

impl ClassDistribution {
    pub fn new(num_classes: usize) -> Result<Self, DistributionError> {
        Self::from_weights(vec![0.0; num_classes])
    }

    pub fn from_weights(weights: Vec<f64>) -> Result<Self, DistributionError> {
        if weights.is_empty() {
            return Err(DistributionError::Empty);
        }
        Ok(Self { weights })
    }

    /// An all-zero distribution with the same number of classes.
    pub fn zeros_like(&self) -> Self {
        Self {
            weights: vec![0.0; self.weights.len()],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Panics when `class_index` is not a class of this distribution.
    #[inline]
    pub fn add(&mut self, class_index: usize, weight: f64) {
        self.weights[class_index] += weight;
    }

    /// Weight of `class_index`, or 0 for an unknown class.
    #[inline]
    pub fn get(&self, class_index: usize) -> f64 {
        self.weights.get(class_index).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Element-wise sum into a new distribution.
    pub fn combine(&self, other: &ClassDistribution) -> ClassDistribution {
        let mut out = self.clone();
        out += other;
        out
    }

    /// Shannon entropy, in bits, of the normalised distribution. Zero when
    /// nothing has been observed.
    pub fn entropy(&self) -> f64 {
        let mut entropy = 0.0;
        let mut sum = 0.0;
        for &d in &self.weights {
            if d > 0.0 {
                entropy -= d * d.log2();
                sum += d;
            }
        }
        if sum > 0.0 {
            ((entropy + sum * sum.log2()) / sum).max(0.0)
        } else {
            0.0
        }
    }

    /// Index of the heaviest class; the first one wins ties. `None` when every
    /// weight is zero.
    pub fn max_class_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_weight = 0.0;
        for (i, &w) in self.weights.iter().enumerate() {
            if w > best_weight {
                best = Some(i);
                best_weight = w;
            }
        }
        best
    }

    pub fn non_zero_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    /// One past the index of the last non-zero class.
    pub fn non_zero_length(&self) -> usize {
        self.weights
            .iter()
            .rposition(|&w| w != 0.0)
            .map_or(0, |i| i + 1)
    }

    pub fn is_pure(&self) -> bool {
        self.non_zero_count() < 2
    }

    /// Weight that does not belong to the majority class.
    pub fn promise(&self) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        let max = self.max_class_index().map_or(0.0, |i| self.weights[i]);
        total - max
    }
}

impl AddAssign<&ClassDistribution> for ClassDistribution {
    fn add_assign(&mut self, other: &ClassDistribution) {
        debug_assert_eq!(self.len(), other.len(), "class distribution length mismatch");
        for (d, s) in self.weights.iter_mut().zip(&other.weights) {
            *d += *s;
        }
    }
}
