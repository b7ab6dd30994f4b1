use crate::core::attributes::Attribute;
use std::any::Any;

/// Free-text column. It carries no numeric value, so rows store it as missing
/// and tree learners reject it at initialisation.
#[derive(Clone, Debug)]
pub struct StringAttribute {
    pub name: String,
}

impl StringAttribute {
    pub fn new(name: String) -> StringAttribute {
        StringAttribute { name }
    }
}

impl Attribute for StringAttribute {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} string", self.name)
    }
}
