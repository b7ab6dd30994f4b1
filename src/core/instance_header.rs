use crate::core::attributes::{Attribute, AttributeRef, NominalAttribute};
use std::fmt;

pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes.get(index).map(|a| a.as_ref() as &dyn Attribute)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// The class attribute, when the class index points at a nominal column.
    pub fn class_attribute(&self) -> Option<&NominalAttribute> {
        self.attributes
            .get(self.class_index)?
            .as_any()
            .downcast_ref::<NominalAttribute>()
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_attribute()
            .map(NominalAttribute::number_of_values)
            .unwrap_or(0)
    }

    /// Label of class `index`, falling back to the index itself.
    pub fn class_label(&self, index: usize) -> String {
        self.class_attribute()
            .and_then(|c| c.value(index))
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("class_index", &self.class_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}
