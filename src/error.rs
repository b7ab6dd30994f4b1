use thiserror::Error;

/// Schema problems found while binding a learner to an [`InstanceHeader`].
///
/// [`InstanceHeader`]: crate::core::instance_header::InstanceHeader
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The header's class index does not point at any attribute.
    #[error("class index {class_index} is out of range for {num_attributes} attributes")]
    ClassIndexOutOfRange {
        class_index: usize,
        num_attributes: usize,
    },

    /// The target column must be nominal.
    #[error("target attribute '{name}' is not nominal")]
    TargetNotNominal { name: String },

    /// A nominal target needs at least one category.
    #[error("target attribute '{name}' declares no categories")]
    EmptyTarget { name: String },

    /// Feature columns must be numeric or nominal.
    #[error("attribute '{name}' at index {index} must be numeric or nominal")]
    UnsupportedAttribute { name: String, index: usize },
}

/// Out-of-range learner configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grace period must be positive")]
    ZeroGracePeriod,

    #[error("split confidence must lie in (0, 1), got {0}")]
    SplitConfidence(f64),

    #[error("tie threshold must be non-negative, got {0}")]
    TieThreshold(f64),

    #[error("number of bins must be positive")]
    ZeroBins,

    #[error("minimum branch fraction must lie in [0, 0.5), got {0}")]
    MinBranchFraction(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// A class distribution needs at least one class slot.
    #[error("class distribution must have at least one class")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VfdtError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),
}
