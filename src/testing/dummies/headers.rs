use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::DenseInstance;
use std::sync::Arc;

fn class_ab() -> AttributeRef {
    Arc::new(NominalAttribute::from_labels(
        "class",
        vec!["A".into(), "B".into()],
    )) as AttributeRef
}

/// A header holding only a binary class `{A, B}`.
pub fn header_binary() -> Arc<InstanceHeader> {
    Arc::new(InstanceHeader::new("bin".into(), vec![class_ab()], 0))
}

/// `att {x, y}` followed by `class {A, B}`.
pub fn header_nominal_xy() -> Arc<InstanceHeader> {
    let att = Arc::new(NominalAttribute::from_labels(
        "att",
        vec!["x".into(), "y".into()],
    )) as AttributeRef;
    Arc::new(InstanceHeader::new("nominal".into(), vec![att, class_ab()], 1))
}

/// Numeric `x` followed by `class {A, B}`.
pub fn header_numeric_binary() -> Arc<InstanceHeader> {
    let x = Arc::new(NumericAttribute::new("x".into())) as AttributeRef;
    Arc::new(InstanceHeader::new("numeric".into(), vec![x, class_ab()], 1))
}

pub fn instance(header: &Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> DenseInstance {
    DenseInstance::new(Arc::clone(header), values, weight)
}

pub fn nominal_row(header: &Arc<InstanceHeader>, att: f64, class: usize) -> DenseInstance {
    instance(header, vec![att, class as f64], 1.0)
}

pub fn numeric_row(header: &Arc<InstanceHeader>, x: f64, class: usize) -> DenseInstance {
    instance(header, vec![x, class as f64], 1.0)
}
