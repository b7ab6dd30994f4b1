use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use crate::testing::dummies::header_binary;
use std::io::Error;
use std::sync::Arc;

/// Replays fixed rows. [`VecStream::new`] builds class-only rows over
/// [`header_binary`].
pub struct VecStream {
    pub header: Arc<InstanceHeader>,
    rows: Vec<Vec<f64>>,
    idx: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        Self::from_rows(
            header_binary(),
            labels.into_iter().map(|y| vec![y as f64]).collect(),
        )
    }

    pub fn from_rows(header: Arc<InstanceHeader>, rows: Vec<Vec<f64>>) -> Self {
        Self {
            header,
            rows,
            idx: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.idx < self.rows.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let row = self.rows.get(self.idx)?.clone();
        self.idx += 1;
        Some(Box::new(DenseInstance::new(Arc::clone(&self.header), row, 1.0)))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
