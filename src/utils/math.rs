use std::f64::consts::SQRT_2;

/// Standard normal CDF.
#[inline]
pub fn normal_probability(z: f64) -> f64 {
    0.5 * (1.0 + libm::erf(z / SQRT_2))
}

/// Index of the first largest value; `None` only for an empty slice.
pub fn max_index(values: &[f64]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut max_i = 0usize;
    let mut max_v = *first;
    for (i, &v) in rest.iter().enumerate() {
        if v > max_v {
            max_v = v;
            max_i = i + 1;
        }
    }
    Some(max_i)
}

/// `value` as a category index below `num_values`. Non-integral, negative
/// and out-of-range values give `None`.
#[inline]
pub fn category_index(value: f64, num_values: usize) -> Option<usize> {
    (value >= 0.0 && value.fract() == 0.0 && value < num_values as f64).then_some(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_index_prefers_first_of_ties() {
        assert_eq!(max_index(&[0.1, 2.5, 1.0]), Some(1));
        assert_eq!(max_index(&[1.0, 1.0]), Some(0));
        assert_eq!(max_index(&[0.0, 0.0, 0.0]), Some(0));
        assert_eq!(max_index(&[]), None);
    }

    #[test]
    fn category_index_rejects_fractions_and_overflow() {
        assert_eq!(category_index(1.0, 2), Some(1));
        assert_eq!(category_index(0.0, 1), Some(0));
        assert_eq!(category_index(0.7, 2), None);
        assert_eq!(category_index(2.0, 2), None);
        assert_eq!(category_index(-1.0, 2), None);
        assert_eq!(category_index(f64::NAN, 2), None);
        assert_eq!(category_index(f64::INFINITY, 2), None);
    }

    #[test]
    fn normal_probability_known_points() {
        assert!((normal_probability(0.0) - 0.5).abs() < 1e-15);
        assert!((normal_probability(1.96) - 0.975).abs() < 1e-3);
        assert!((normal_probability(-1.96) - 0.025).abs() < 1e-3);
    }
}
