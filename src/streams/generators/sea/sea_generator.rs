use std::io::{Error, ErrorKind};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::generators::sea::SeaFunction;
use crate::streams::stream::Stream;

const NUM_ATTRIBUTES: usize = 3;
const CLASS_LABELS: [&str; 2] = ["groupA", "groupB"];

fn sea_header() -> Arc<InstanceHeader> {
    let mut attributes: Vec<AttributeRef> = (1..=NUM_ATTRIBUTES)
        .map(|i| Arc::new(NumericAttribute::new(format!("attrib{i}"))) as AttributeRef)
        .collect();
    attributes.push(Arc::new(NominalAttribute::from_labels(
        "class",
        CLASS_LABELS.iter().map(|l| l.to_string()).collect(),
    )));
    Arc::new(InstanceHeader::new("SEA".into(), attributes, NUM_ATTRIBUTES))
}

/// Seeded SEA concept stream.
///
/// Three attributes are drawn uniformly from `[0, 10)`; the class is
/// `groupA` when `attrib1 + attrib2 <= threshold`. `attrib3` is noise. With
/// balancing on, accepted classes alternate starting with `groupB`.
#[derive(Debug)]
pub struct SeaGenerator {
    seed: u64,
    rng: StdRng,
    threshold: f64,
    noise_probability: f64,
    balance: bool,
    expect_group_a: bool,
    header: Arc<InstanceHeader>,
    limit: Option<u64>,
    emitted: u64,
}

impl SeaGenerator {
    /// `noise_percentage` (0 to 100) is the chance a label is flipped.
    pub fn new(
        function: SeaFunction,
        balance: bool,
        noise_percentage: u32,
        max_instances: Option<u64>,
        seed: u64,
    ) -> Result<Self, Error> {
        if noise_percentage > 100 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("noise percentage {noise_percentage} is above 100"),
            ));
        }
        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            threshold: function.threshold(),
            noise_probability: f64::from(noise_percentage) / 100.0,
            balance,
            expect_group_a: false,
            header: sea_header(),
            limit: max_instances,
            emitted: 0,
        })
    }

    /// A stream with its own threshold in `[0, 20]` instead of one of the
    /// four functions.
    pub fn with_threshold(
        threshold: f64,
        balance: bool,
        noise_percentage: u32,
        max_instances: Option<u64>,
        seed: u64,
    ) -> Result<Self, Error> {
        if !(0.0..=20.0).contains(&threshold) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("threshold {threshold} is outside [0, 20]"),
            ));
        }
        let mut generator =
            Self::new(SeaFunction::F1, balance, noise_percentage, max_instances, seed)?;
        generator.threshold = threshold;
        Ok(generator)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn draw(&mut self) -> ([f64; NUM_ATTRIBUTES], usize) {
        let values: [f64; NUM_ATTRIBUTES] =
            std::array::from_fn(|_| self.rng.random_range(0.0..10.0));
        let class = usize::from(values[0] + values[1] > self.threshold);
        (values, class)
    }

    fn draw_balanced(&mut self) -> ([f64; NUM_ATTRIBUTES], usize) {
        let wanted = usize::from(!self.expect_group_a);
        loop {
            let (values, class) = self.draw();
            if class == wanted {
                self.expect_group_a = !self.expect_group_a;
                return (values, class);
            }
        }
    }
}

impl Stream for SeaGenerator {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.limit.is_none_or(|max| self.emitted < max)
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }
        let (values, mut class) = if self.balance {
            self.draw_balanced()
        } else {
            self.draw()
        };
        if self.noise_probability > 0.0 && self.rng.random_bool(self.noise_probability) {
            class = 1 - class;
        }
        self.emitted += 1;

        let mut row = values.to_vec();
        row.push(class as f64);
        Some(Box::new(DenseInstance::new(Arc::clone(&self.header), row, 1.0)))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.emitted = 0;
        self.expect_group_a = false;
        Ok(())
    }
}
