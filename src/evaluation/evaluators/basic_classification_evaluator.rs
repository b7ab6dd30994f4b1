use crate::core::instances::Instance;
use crate::evaluation::{Estimator, Measurement, PerformanceEvaluator};

/// Online classification evaluator.
///
/// Tracks weighted accuracy, the marginals of true and predicted classes for
/// Cohen's kappa, and two baselines:
/// - **no-change**: predict the previous true class (`kappa_t`);
/// - **majority**: predict the most frequent true class so far (`kappa_m`).
pub struct BasicClassificationEvaluator<E: Estimator + Default> {
    weight_correct: E,
    predicted_marginal: Vec<E>,
    true_marginal: Vec<E>,
    num_classes: usize,
    weight_correct_no_change: E,
    weight_majority: E,
    last_true_class: Option<usize>,
    total_weight: f64,
}

impl<E: Estimator + Default> BasicClassificationEvaluator<E> {
    pub fn new(num_classes: usize) -> Self {
        let make_vec = || (0..num_classes).map(|_| E::default()).collect::<Vec<_>>();
        Self {
            weight_correct: E::default(),
            predicted_marginal: make_vec(),
            true_marginal: make_vec(),
            num_classes,
            weight_correct_no_change: E::default(),
            weight_majority: E::default(),
            last_true_class: None,
            total_weight: 0.0,
        }
    }

    #[inline]
    fn argmax(v: &[f64]) -> Option<usize> {
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for (i, &x) in v.iter().enumerate() {
            if !x.is_finite() {
                continue;
            }
            if best.is_none() || x > best_value {
                best = Some(i);
                best_value = x;
            }
        }
        best
    }

    fn majority_class(&self) -> Option<usize> {
        let estimates: Vec<f64> = self.true_marginal.iter().map(E::estimation).collect();
        Self::argmax(&estimates)
    }

    fn ensure_classes(&mut self, k: usize) {
        if k > self.num_classes {
            let add = k - self.num_classes;
            self.predicted_marginal.extend((0..add).map(|_| E::default()));
            self.true_marginal.extend((0..add).map(|_| E::default()));
            self.num_classes = k;
        }
    }

    fn kappa_against(p_o: f64, baseline: f64) -> f64 {
        let d = 1.0 - baseline;
        if d.abs() > f64::EPSILON {
            (p_o - baseline) / d
        } else {
            f64::NAN
        }
    }
}

impl<E: Estimator + Default> PerformanceEvaluator for BasicClassificationEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::new(self.num_classes)
    }

    fn add_result(&mut self, example: &dyn Instance, class_votes: Vec<f64>) {
        let Some(yf) = example.class_value() else {
            return;
        };
        if !yf.is_finite() || yf < 0.0 {
            return;
        }
        let y = yf as usize;
        let w = example.weight();
        if w.is_nan() || w <= 0.0 {
            return;
        }
        let Some(yhat) = Self::argmax(&class_votes) else {
            return;
        };

        self.ensure_classes(class_votes.len().max(y + 1));
        self.total_weight += w;

        let hit = |c: usize, target: usize| if c == target { 1.0 } else { 0.0 };

        self.weight_correct.add(hit(yhat, y), w);

        if let Some(prev) = self.last_true_class {
            self.weight_correct_no_change.add(hit(prev, y), w);
        }
        if let Some(maj) = self.majority_class() {
            self.weight_majority.add(hit(maj, y), w);
        }

        for (c, est) in self.predicted_marginal.iter_mut().enumerate() {
            est.add(hit(c, yhat), w);
        }
        for (c, est) in self.true_marginal.iter_mut().enumerate() {
            est.add(hit(c, y), w);
        }

        self.last_true_class = Some(y);
    }

    fn performance(&self) -> Vec<Measurement> {
        let p_o = self.weight_correct.estimation();
        let mut m = vec![Measurement::new("accuracy", p_o)];

        if self.total_weight <= 0.0 {
            m.extend([
                Measurement::new("kappa", 0.0),
                Measurement::new("kappa_t", 0.0),
                Measurement::new("kappa_m", 0.0),
            ]);
            return m;
        }

        let p_e: f64 = self
            .predicted_marginal
            .iter()
            .zip(&self.true_marginal)
            .map(|(p, t)| (p.estimation(), t.estimation()))
            .filter(|(p, t)| p.is_finite() && t.is_finite())
            .map(|(p, t)| p * t)
            .sum();

        m.push(Measurement::new("kappa", Self::kappa_against(p_o, p_e)));
        m.push(Measurement::new(
            "kappa_t",
            Self::kappa_against(p_o, self.weight_correct_no_change.estimation()),
        ));
        m.push(Measurement::new(
            "kappa_m",
            Self::kappa_against(p_o, self.weight_majority.estimation()),
        ));
        m
    }
}
