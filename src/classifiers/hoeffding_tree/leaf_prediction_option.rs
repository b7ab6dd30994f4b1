use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LeafPredictionOption {
    MajorityClass,
    NaiveBayes,
    #[default]
    #[serde(rename = "nb-adaptive")]
    #[strum(serialize = "nb-adaptive")]
    NbAdaptive,
}
