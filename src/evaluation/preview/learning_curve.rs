use crate::evaluation::Snapshot;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CurveFormat {
    Csv,
    Tsv,
    Json,
}

/// Ordered snapshots of a prequential run.
#[derive(Debug, Default)]
pub struct LearningCurve {
    entries: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: CurveFormat) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        match fmt {
            CurveFormat::Csv => self.write_delimited(&mut w, ',')?,
            CurveFormat::Tsv => self.write_delimited(&mut w, '\t')?,
            CurveFormat::Json => {
                serde_json::to_writer_pretty(&mut w, &self.entries)?;
                writeln!(w)?;
            }
        }
        w.flush()
    }

    /// Extra columns are taken from the first snapshot.
    fn write_delimited<W: Write>(&self, w: &mut W, d: char) -> Result<(), Error> {
        let extra_keys: Vec<&String> = self
            .entries
            .first()
            .map(|s| s.extras.keys().collect())
            .unwrap_or_default();

        write!(w, "instances_seen{d}accuracy{d}kappa")?;
        for k in &extra_keys {
            write!(w, "{d}{k}")?;
        }
        writeln!(w, "{d}seconds")?;

        for s in &self.entries {
            write!(w, "{}{d}{:.12}{d}{:.12}", s.instances_seen, s.accuracy, s.kappa)?;
            for k in &extra_keys {
                let v = s.extras.get(*k).copied().unwrap_or(f64::NAN);
                write!(w, "{d}{v:.12}")?;
            }
            writeln!(w, "{d}{:.6}", s.seconds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::NamedTempFile;

    fn snap(seen: u64, acc: f64, kap: f64, kappa_t: f64, secs: f64) -> Snapshot {
        Snapshot {
            instances_seen: seen,
            accuracy: acc,
            kappa: kap,
            seconds: secs,
            extras: BTreeMap::from([("kappa_t".to_string(), kappa_t)]),
        }
    }

    fn two_rows() -> LearningCurve {
        let mut lc = LearningCurve::default();
        lc.push(snap(10, 1.0, 0.5, 0.125, 2.5));
        lc.push(snap(20, 0.25, 0.0, 1.5, 3.0));
        lc
    }

    #[test]
    fn default_is_empty() {
        let lc = LearningCurve::default();
        assert!(lc.is_empty());
        assert!(lc.latest().is_none());
    }

    #[test]
    fn latest_follows_pushes() {
        let lc = two_rows();
        assert_eq!(lc.len(), 2);
        assert_eq!(lc.latest().unwrap().instances_seen, 20);
        assert_eq!(lc.entries()[0].accuracy, 1.0);
    }

    #[test]
    fn export_csv() {
        let tf = NamedTempFile::new().unwrap();
        two_rows().export(tf.path(), CurveFormat::Csv).unwrap();
        let exp = "\
instances_seen,accuracy,kappa,kappa_t,seconds
10,1.000000000000,0.500000000000,0.125000000000,2.500000
20,0.250000000000,0.000000000000,1.500000000000,3.000000
";
        assert_eq!(fs::read_to_string(tf.path()).unwrap(), exp);
    }

    #[test]
    fn export_tsv() {
        let tf = NamedTempFile::new().unwrap();
        two_rows().export(tf.path(), CurveFormat::Tsv).unwrap();
        let got = fs::read_to_string(tf.path()).unwrap();
        assert!(got.starts_with("instances_seen\taccuracy\tkappa\tkappa_t\tseconds\n"));
        assert_eq!(got.lines().count(), 3);
    }

    #[test]
    fn export_json_flattens_extras() {
        let tf = NamedTempFile::new().unwrap();
        two_rows().export(tf.path(), CurveFormat::Json).unwrap();
        let got: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tf.path()).unwrap()).unwrap();
        let rows = got.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["instances_seen"], 10);
        assert_eq!(rows[0]["kappa_t"], 0.125);
        assert_eq!(rows[1]["accuracy"], 0.25);
    }

    #[test]
    fn nan_is_written_as_json_null() {
        let mut lc = LearningCurve::default();
        lc.push(snap(0, f64::NAN, 0.0, 0.0, 0.0));
        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Json).unwrap();
        let got: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tf.path()).unwrap()).unwrap();
        assert!(got[0]["accuracy"].is_null());
    }

    #[test]
    fn export_empty_curve() {
        let lc = LearningCurve::default();
        let tf = NamedTempFile::new().unwrap();
        lc.export(tf.path(), CurveFormat::Csv).unwrap();
        assert_eq!(
            fs::read_to_string(tf.path()).unwrap(),
            "instances_seen,accuracy,kappa,seconds\n"
        );
        lc.export(tf.path(), CurveFormat::Json).unwrap();
        assert_eq!(fs::read_to_string(tf.path()).unwrap(), "[]\n");
    }
}
