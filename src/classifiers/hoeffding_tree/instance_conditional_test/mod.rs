
pub use instance_conditional_test::{InstanceConditionalTest, SplitTest};
pub use nominal_attribute_binary_test::NominalAttributeBinaryTest;
pub use nominal_attribute_multiway_test::NominalAttributeMultiwayTest;
pub use numeric_attribute_binary_test::NumericAttributeBinaryTest;

use crate::core::attributes::NominalAttribute;
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::math::category_index;

/// Value of attribute `index`, or `None` when it is absent or missing.
#[inline]
pub(crate) fn known_value(instance: &dyn Instance, index: usize) -> Option<f64> {
    instance.value_at_index(index).filter(|v| !v.is_nan())
}

/// Category of nominal attribute `index`. A value that names no declared
/// category is treated as missing.
pub(crate) fn known_category(instance: &dyn Instance, index: usize) -> Option<usize> {
    let value = known_value(instance, index)?;
    let nominal = instance
        .attribute_at_index(index)?
        .as_any()
        .downcast_ref::<NominalAttribute>()?;
    category_index(value, nominal.number_of_values())
}

pub(crate) fn attribute_name(header: &InstanceHeader, index: usize) -> String {
    header
        .attribute_at_index(index)
        .map(|a| a.name())
        .unwrap_or_else(|| format!("att {}", index + 1))
}

pub(crate) fn category_label(header: &InstanceHeader, index: usize, category: usize) -> String {
    header
        .attribute_at_index(index)
        .and_then(|a| a.as_any().downcast_ref::<NominalAttribute>())
        .and_then(|n| n.value(category))
        .map(str::to_string)
        .unwrap_or_else(|| category.to_string())
}
