use crate::core::attributes::Attribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::instance::Instance;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DenseInstance {
    pub header: Arc<InstanceHeader>,
    pub values: Vec<f64>,
    pub weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> DenseInstance {
        DenseInstance {
            header,
            values,
            weight,
        }
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, new_value: f64) -> Result<(), Error> {
        if new_value < 0.0 || new_value.is_nan() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Weight cannot be negative",
            ));
        }
        self.weight = new_value;
        Ok(())
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "Index out of bounds"))?;
        *slot = new_value;
        Ok(())
    }

    fn is_missing_at_index(&self, index: usize) -> Result<bool, Error> {
        self.values
            .get(index)
            .map(|v| v.is_nan())
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "Index out of bounds"))
    }

    fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.header.attribute_at_index(index)
    }

    fn number_of_attributes(&self) -> usize {
        self.header.number_of_attributes()
    }

    fn class_index(&self) -> usize {
        self.header.class_index()
    }

    fn class_value(&self) -> Option<f64> {
        self.values.get(self.header.class_index()).copied()
    }

    fn is_class_missing(&self) -> bool {
        self.class_value().is_none_or(f64::is_nan)
    }

    fn number_of_classes(&self) -> usize {
        self.header.number_of_classes()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}
