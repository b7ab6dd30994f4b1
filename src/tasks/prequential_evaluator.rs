use crate::classifiers::Classifier;
use crate::core::instance_header::InstanceHeader;
use crate::evaluation::{LearningCurve, PerformanceEvaluator, Snapshot};
use crate::streams::Stream;
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use cpu_time::ThreadTime;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    StreamExhausted,
    InstanceLimit,
    TimeLimit,
}

/// Test-then-train loop: every instance is first scored by the learner,
/// then used to train it. Snapshots are taken every `sample_frequency`
/// instances and once more at the end.
pub struct PrequentialEvaluator {
    learner: Box<dyn Classifier>,
    stream: Box<dyn Stream>,
    evaluator: Box<dyn PerformanceEvaluator>,
    curve: LearningCurve,
    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,
    processed: u64,
    clock: ThreadTime,
    progress: Option<Sender<Snapshot>>,
}

impl PrequentialEvaluator {
    /// Binds `learner` to the stream's header. Fails with `InvalidInput` for
    /// a zero `sample_frequency` and `InvalidData` when the learner rejects
    /// the header.
    pub fn new(
        mut learner: Box<dyn Classifier>,
        stream: Box<dyn Stream>,
        evaluator: Box<dyn PerformanceEvaluator>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, Error> {
        if sample_frequency == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "sample frequency must be at least 1",
            ));
        }

        let source = stream.header();
        let header = Arc::new(InstanceHeader::new(
            source.relation_name().to_string(),
            source.attributes.clone(),
            source.class_index(),
        ));
        learner
            .set_model_context(header)
            .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

        Ok(Self {
            learner,
            stream,
            evaluator,
            curve: LearningCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            processed: 0,
            clock: ThreadTime::now(),
            progress: None,
        })
    }

    /// Also send every snapshot to `tx`. A dropped receiver is ignored.
    #[must_use]
    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), Error> {
        self.clock = ThreadTime::now();
        info!(
            relation = self.stream.header().relation_name(),
            max_instances = ?self.max_instances,
            max_seconds = ?self.max_seconds,
            sample_frequency = self.sample_frequency,
            "prequential evaluation started"
        );

        let stop = loop {
            if let Some(stop) = self.limit_reached() {
                break stop;
            }
            let Some(instance) = self.stream.next_instance() else {
                break Stop::StreamExhausted;
            };

            let votes = self.learner.get_votes_for_instance(instance.as_ref());
            self.evaluator.add_result(instance.as_ref(), votes);
            self.learner.train_on_instance(instance.as_ref());
            self.processed += 1;

            if self.processed % self.sample_frequency == 0 {
                self.take_snapshot();
            }
        };

        self.take_snapshot();
        info!(processed = self.processed, ?stop, "prequential evaluation finished");
        Ok(())
    }

    fn limit_reached(&self) -> Option<Stop> {
        if !self.stream.has_more_instances() {
            Some(Stop::StreamExhausted)
        } else if self.max_instances.is_some_and(|n| self.processed >= n) {
            Some(Stop::InstanceLimit)
        } else if self
            .max_seconds
            .is_some_and(|s| self.clock.elapsed().as_secs() >= s)
        {
            Some(Stop::TimeLimit)
        } else {
            None
        }
    }

    pub fn curve(&self) -> &LearningCurve {
        &self.curve
    }

    /// The learner as trained so far.
    pub fn learner(&self) -> &dyn Classifier {
        self.learner.as_ref()
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn take_snapshot(&mut self) {
        let snapshot = Snapshot::from_measurements(
            self.processed,
            self.clock.elapsed().as_secs_f64(),
            self.evaluator.performance(),
        );
        debug!(%snapshot, "snapshot");

        if let Some(tx) = &self.progress {
            let _ = tx.send(snapshot.clone());
        }
        self.curve.push(snapshot);
    }
}
