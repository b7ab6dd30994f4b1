use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use serde_json::{Map, Value};

use crate::classifiers::HoeffdingTreeConfig;
use crate::evaluation::CurveFormat;
use crate::streams::{ArffFileStream, SeaFunction, SeaGenerator, Stream};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Train and evaluate a Hoeffding tree on a data stream"
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a prequential (test-then-train) evaluation
    Run(RunArgs),
    /// Print the JSON schema of the learner configuration
    Schema,
    /// Print the default learner configuration as JSON
    Defaults,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// ARFF file to read instead of the SEA generator
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub arff: Option<PathBuf>,

    /// Zero-based class column of the ARFF file (default: last attribute)
    #[arg(long, value_name = "N", requires = "arff")]
    pub class_index: Option<usize>,

    /// SEA concept function (f1, f2, f3, f4)
    #[arg(long, default_value = "f1", value_name = "FUNCTION", conflicts_with = "arff")]
    pub sea_function: SeaFunction,

    /// Percentage of SEA labels flipped at random
    #[arg(
        long,
        default_value_t = 10,
        value_name = "PERCENT",
        value_parser = clap::value_parser!(u32).range(0..=100),
    )]
    pub sea_noise: u32,

    /// Seed of the SEA generator
    #[arg(long, default_value_t = 1, value_name = "SEED")]
    pub sea_seed: u64,

    /// Alternate SEA classes
    #[arg(long)]
    pub sea_balance: bool,

    /// JSON file with the learner configuration
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override learner parameters (key=value, nested keys with dots)
    #[arg(long = "learner-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub learner_params: Vec<KeyValue>,

    /// Stop after this many instances (omit for unlimited)
    #[arg(long, value_name = "N")]
    pub max_instances: Option<u64>,

    /// Stop after this many CPU seconds (omit for unlimited)
    #[arg(long, value_name = "SECONDS")]
    pub max_seconds: Option<u64>,

    /// Take a snapshot every N instances
    #[arg(
        long,
        default_value_t = 100_000,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sample_frequency: u64,

    /// File to dump the learning curve to after completion
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dump_file: Option<PathBuf>,

    /// Format of the dump file (csv, tsv, json)
    #[arg(long, default_value = "csv", value_name = "FORMAT")]
    pub dump_format: CurveFormat,

    /// Print the learned tree when the run ends
    #[arg(long)]
    pub print_tree: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl RunArgs {
    /// Defaults, then the `--config` file, then each `--learner-param` in
    /// order. The result is validated.
    pub fn learner_config(&self) -> Result<HoeffdingTreeConfig> {
        let mut params = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str::<Value>(&raw)
                    .with_context(|| format!("config {} is not valid JSON", path.display()))?
            }
            None => serde_json::to_value(HoeffdingTreeConfig::default())
                .context("failed to serialise default config")?,
        };
        apply_overrides(&mut params, &self.learner_params)?;

        let config: HoeffdingTreeConfig =
            serde_json::from_value(params).context("invalid learner configuration")?;
        config.validate().context("invalid learner configuration")?;
        Ok(config)
    }

    pub fn build_stream(&self) -> Result<Box<dyn Stream>> {
        match &self.arff {
            Some(path) => {
                let stream = ArffFileStream::new(path.clone(), self.class_index)
                    .with_context(|| format!("failed to open ARFF file {}", path.display()))?;
                Ok(Box::new(stream))
            }
            None => {
                let stream = SeaGenerator::new(
                    self.sea_function,
                    self.sea_balance,
                    self.sea_noise,
                    None,
                    self.sea_seed,
                )
                .context("failed to build SEA generator")?;
                Ok(Box::new(stream))
            }
        }
    }
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }
    ensure_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

/// JSON literal when it parses as one, otherwise a plain string.
fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::hoeffding_tree::LeafPredictionOption;
    use crate::classifiers::hoeffding_tree::split_criteria::SplitCriterionOption;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["vfdt", "run"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn parse_key_value_reads_json_literals() {
        let kv = parse_key_value("grace_period=50").unwrap();
        assert_eq!(kv.value, json!(50));
        let kv = parse_key_value("leaf_prediction = majority-class").unwrap();
        assert_eq!(kv.key, "leaf_prediction");
        assert_eq!(kv.value, json!("majority-class"));
        assert_eq!(parse_key_value("flag=").unwrap().value, json!(""));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn set_path_creates_nested_objects() {
        let mut v = json!({});
        set_path(&mut v, "a.b.c", json!(true)).unwrap();
        assert_eq!(v, json!({"a": {"b": {"c": true}}}));
        assert!(set_path(&mut v, "a.b.c.d", json!(1)).is_err());
        assert!(set_path(&mut v, "..", json!(1)).is_err());
    }

    #[test]
    fn defaults_without_overrides() {
        let args = run_args(&[]);
        assert_eq!(args.learner_config().unwrap(), HoeffdingTreeConfig::default());
        assert_eq!(args.sea_function, SeaFunction::F1);
        assert_eq!(args.dump_format, CurveFormat::Csv);
        assert_eq!(args.sample_frequency, 100_000);
    }

    #[test]
    fn learner_params_override_defaults() {
        let args = run_args(&[
            "--learner-param",
            "grace_period=50",
            "--learner-param",
            "split_criterion=gini",
            "--learner-param",
            "leaf_prediction=majority-class",
        ]);
        let config = args.learner_config().unwrap();
        assert_eq!(config.grace_period, 50);
        assert_eq!(config.split_criterion, SplitCriterionOption::Gini);
        assert_eq!(config.leaf_prediction, LeafPredictionOption::MajorityClass);
    }

    #[test]
    fn config_file_then_overrides() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"tie_threshold": 0.1, "grace_period": 10}}"#).unwrap();
        let path = f.path().to_str().unwrap().to_string();
        let args = run_args(&["--config", &path, "--learner-param", "grace_period=20"]);
        let config = args.learner_config().unwrap();
        assert_eq!(config.tie_threshold, 0.1);
        assert_eq!(config.grace_period, 20);
        assert_eq!(config.num_bins, 10);
    }

    #[test]
    fn invalid_learner_values_are_rejected() {
        assert!(run_args(&["--learner-param", "grace_period=0"]).learner_config().is_err());
        assert!(
            run_args(&["--learner-param", "leaf_prediction=oracle"])
                .learner_config()
                .is_err()
        );
    }

    #[test]
    fn sea_stream_is_the_default_source() {
        let args = run_args(&["--sea-function", "f3", "--sea-noise", "0"]);
        let mut stream = args.build_stream().unwrap();
        assert_eq!(stream.header().relation_name(), "SEA");
        assert!(stream.next_instance().is_some());
    }

    #[test]
    fn arff_source_conflicts_with_sea_options() {
        assert!(
            Cli::try_parse_from(["vfdt", "run", "--arff", "x.arff", "--sea-function", "f2"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["vfdt", "run", "--class-index", "1"]).is_err());
        assert!(Cli::try_parse_from(["vfdt", "run", "--sample-frequency", "0"]).is_err());
    }

    #[test]
    fn missing_arff_file_is_an_error() {
        let args = run_args(&["--arff", "no/such/file.arff"]);
        assert!(args.build_stream().is_err());
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        let cli = Cli::try_parse_from(["vfdt", "-vv", "defaults"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
        let cli = Cli::try_parse_from(["vfdt", "schema", "-q"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
        let cli = Cli::try_parse_from(["vfdt", "defaults"]).unwrap();
        assert_eq!(cli.log_level(), "info");
    }
}
