use strum_macros::{Display, EnumIter, EnumString};

/// The four SEA concepts. Each one labels a row `groupA` when
/// `attrib1 + attrib2 <= threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SeaFunction {
    F1,
    F2,
    F3,
    F4,
}

impl SeaFunction {
    pub fn threshold(self) -> f64 {
        match self {
            SeaFunction::F1 => 8.0,
            SeaFunction::F2 => 9.0,
            SeaFunction::F3 => 7.0,
            SeaFunction::F4 => 9.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(SeaFunction::from_str("f3").unwrap(), SeaFunction::F3);
        assert_eq!(SeaFunction::F4.to_string(), "f4");
        assert!(SeaFunction::from_str("f5").is_err());
    }
}
