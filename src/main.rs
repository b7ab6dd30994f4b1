use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat};
use clap::Parser;
use schemars::schema_for;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vfdt::classifiers::{Classifier, HoeffdingTree, HoeffdingTreeConfig};
use vfdt::evaluation::{BasicClassificationEvaluator, BasicEstimator, Snapshot};
use vfdt::tasks::PrequentialEvaluator;
use vfdt::ui::cli::args::{Cli, Command, RunArgs};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const MAGENTA: &str = "\x1b[35m";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Schema => {
            let schema = schema_for!(HoeffdingTreeConfig);
            println!(
                "{}",
                serde_json::to_string_pretty(&schema).context("failed to render schema")?
            );
            Ok(())
        }
        Command::Defaults => {
            println!(
                "{}",
                serde_json::to_string_pretty(&HoeffdingTreeConfig::default())
                    .context("failed to render default config")?
            );
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = args.learner_config()?;
    let stream = args.build_stream()?;
    let num_classes = stream.header().number_of_classes();
    info!(relation = stream.header().relation_name(), num_classes, "stream ready");

    let learner: Box<dyn Classifier> =
        Box::new(HoeffdingTree::new(config).context("failed to build learner")?);
    let evaluator = Box::new(BasicClassificationEvaluator::<BasicEstimator>::new(num_classes));

    let board = StatusBoard {
        max_instances: args.max_instances,
        max_seconds: args.max_seconds,
        repaint: Duration::from_millis(150),
    };
    println!("{BOLD}{CYAN}vfdt prequential run{RESET}");
    println!(
        "{DIM}sample every {} instances, started {}{RESET}",
        args.sample_frequency,
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let (tx, rx) = mpsc::channel();
    let watcher = thread::spawn(move || board.watch(rx));

    let mut runner = PrequentialEvaluator::new(
        learner,
        stream,
        evaluator,
        args.max_instances,
        args.max_seconds,
        args.sample_frequency,
    )
    .context("failed to set up the prequential evaluation")?
    .with_progress(tx);

    runner.run().context("prequential evaluation failed")?;

    if let Some(path) = args.dump_file.as_ref().filter(|p| !p.as_os_str().is_empty()) {
        runner
            .curve()
            .export(path, args.dump_format)
            .with_context(|| format!("failed to write learning curve to {}", path.display()))?;
        info!(path = %path.display(), format = %args.dump_format, "learning curve written");
    }

    let description = if args.print_tree {
        runner.learner().model_description()
    } else {
        None
    };

    // dropping the runner closes the progress channel
    drop(runner);
    let _ = watcher.join();

    if let Some(tree) = description {
        print!("{tree}");
    }
    Ok(())
}

/// Single, repainted status line fed by the runner's snapshots.
struct StatusBoard {
    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    repaint: Duration,
}

impl StatusBoard {
    fn watch(self, rx: Receiver<Snapshot>) {
        let mut last_paint: Option<Instant> = None;
        let mut latest = None;
        for snapshot in rx {
            if last_paint.is_none_or(|t| t.elapsed() >= self.repaint) {
                self.paint(&snapshot, false);
                last_paint = Some(Instant::now());
            }
            latest = Some(snapshot);
        }
        if let Some(snapshot) = latest {
            self.paint(&snapshot, true);
        }
    }

    fn paint(&self, s: &Snapshot, last: bool) {
        let mut line = format!(
            "{GREEN}seen{RESET} {:>9}  {CYAN}acc{RESET} {}  {MAGENTA}kappa{RESET} {}",
            s.instances_seen,
            percent(s.accuracy),
            percent(s.kappa),
        );
        for key in ["kappa_t", "kappa_m"] {
            if let Some(v) = s.extras.get(key) {
                line.push_str(&format!("  {DIM}{key}{RESET} {}", percent(*v)));
            }
        }
        line.push_str(&format!("  {DIM}cpu{RESET} {:.3}s", s.seconds));
        if let Some(limit) = self.max_instances {
            line.push_str(&gauge("inst", s.instances_seen as f64, limit as f64));
        }
        if let Some(limit) = self.max_seconds {
            line.push_str(&gauge("time", s.seconds, limit as f64));
        }

        let mut out = io::stdout().lock();
        let _ = write!(out, "\r{line}\x1b[K{}", if last { "\n" } else { "" });
        let _ = out.flush();
    }
}

fn percent(v: f64) -> String {
    if v.is_nan() {
        format!("{DIM}    n/a{RESET}")
    } else {
        format!("{:>6.2}%", v * 100.0)
    }
}

fn gauge(label: &str, current: f64, limit: f64) -> String {
    const WIDTH: usize = 12;
    if limit <= 0.0 {
        return String::new();
    }
    let ratio = (current / limit).clamp(0.0, 1.0);
    let filled = (ratio * WIDTH as f64).round() as usize;
    format!(
        "  {DIM}{label}{RESET} [{}{}]",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled)
    )
}
