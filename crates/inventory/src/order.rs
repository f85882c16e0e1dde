use core::str::FromStr;

use serde::{Deserialize, Serialize};

use satchel_core::DomainError;

/// Policy for [`crate::Inventory::order_by_method`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMethod {
    /// Smallest quantity first.
    Ascending,
    /// Largest quantity first.
    Descending,
}

impl OrderMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderMethod::Ascending => "ascending",
            OrderMethod::Descending => "descending",
        }
    }
}

impl core::fmt::Display for OrderMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(OrderMethod::Ascending),
            "descending" | "desc" => Ok(OrderMethod::Descending),
            other => Err(DomainError::invalid_argument(format!(
                "unknown order method `{other}`"
            ))),
        }
    }
}

/// Numeric codes as exposed to scripting/UI layers: `0` ascending, `1` descending.
impl TryFrom<i32> for OrderMethod {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderMethod::Ascending),
            1 => Ok(OrderMethod::Descending),
            other => Err(DomainError::invalid_argument(format!(
                "unknown order method code {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("asc".parse::<OrderMethod>().unwrap(), OrderMethod::Ascending);
        assert_eq!(" Descending ".parse::<OrderMethod>().unwrap(), OrderMethod::Descending);
        assert_eq!(OrderMethod::try_from(1).unwrap(), OrderMethod::Descending);
    }

    #[test]
    fn unknown_values_are_invalid_arguments() {
        assert!(matches!(
            "sideways".parse::<OrderMethod>(),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            OrderMethod::try_from(7),
            Err(DomainError::InvalidArgument(_))
        ));
    }
}
