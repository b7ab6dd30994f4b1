pub mod attributes;
pub mod class_distribution;
pub mod estimators;
pub mod instance_header;
pub mod instances;
