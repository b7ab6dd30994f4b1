mod attribute;
mod nominal_attribute;
mod numeric_attribute;
mod string_attribute;

pub use attribute::{Attribute, AttributeRef};
pub use nominal_attribute::NominalAttribute;
pub use numeric_attribute::NumericAttribute;
pub use string_attribute::StringAttribute;
