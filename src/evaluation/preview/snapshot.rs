use crate::evaluation::Measurement;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Metrics at one point of a prequential run. `seconds` is CPU time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub seconds: f64,
    #[serde(flatten)]
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    /// `accuracy` and `kappa` are picked out by name; every other measurement
    /// lands in `extras`. Absent headline metrics are `NaN`.
    pub fn from_measurements(
        instances_seen: u64,
        seconds: f64,
        measurements: impl IntoIterator<Item = Measurement>,
    ) -> Self {
        let mut extras: BTreeMap<String, f64> = measurements
            .into_iter()
            .map(|m| (m.name, m.value))
            .collect();
        Self {
            instances_seen,
            accuracy: extras.remove("accuracy").unwrap_or(f64::NAN),
            kappa: extras.remove("kappa").unwrap_or(f64::NAN),
            seconds,
            extras,
        }
    }

    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{v:.6}")
        }
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "seen={}, acc={}, kappa={}, t={:.3}s",
            self.instances_seen,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.seconds
        )?;
        for (k, v) in &self.extras {
            write!(f, ", {k}={}", Self::fmtv(*v))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_metrics_are_split_from_extras() {
        let s = Snapshot::from_measurements(
            7,
            0.5,
            vec![
                Measurement::new("kappa_m", 0.1),
                Measurement::new("accuracy", 0.75),
            ],
        );
        assert_eq!(s.accuracy, 0.75);
        assert!(s.kappa.is_nan());
        assert_eq!(s.extras, BTreeMap::from([("kappa_m".to_string(), 0.1)]));
    }

    #[test]
    fn display_lists_extras_in_key_order() {
        let s = Snapshot {
            instances_seen: 10,
            accuracy: 0.5,
            kappa: f64::NAN,
            seconds: 1.25,
            extras: BTreeMap::from([("kappa_t".to_string(), 0.25), ("kappa_m".to_string(), 0.0)]),
        };
        assert_eq!(
            s.to_string(),
            "seen=10, acc=0.500000, kappa=NaN, t=1.250s, kappa_m=0.000000, kappa_t=0.250000"
        );
    }
}
