use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::VfdtError;
use crate::utils::math::max_index;
use std::sync::Arc;

pub trait Classifier {
    fn get_votes_for_instance(&self, instance: &dyn Instance) -> Vec<f64>;

    /// Binds the learner to a schema. Must be called before training.
    fn set_model_context(&mut self, header: Arc<InstanceHeader>) -> Result<(), VfdtError>;

    fn train_on_instance(&mut self, instance: &dyn Instance);

    /// Index of the strongest vote; 0 when nothing has been learned.
    fn predict(&self, instance: &dyn Instance) -> usize {
        max_index(&self.get_votes_for_instance(instance)).unwrap_or(0)
    }

    /// Human-readable rendering of the learned model, when the learner has one.
    fn model_description(&self) -> Option<String> {
        None
    }
}
