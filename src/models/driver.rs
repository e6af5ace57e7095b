use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static DRIVER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid driver id regex"));

/// Opaque driver identifier, validated once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DriverId(String);

impl DriverId {
    pub const MAX_LEN: usize = 64;

    pub fn parse(raw: &str) -> AppResult<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(AppError::Validation("driver id must not be empty".into()));
        }
        if id.len() > Self::MAX_LEN {
            return Err(AppError::Validation(format!(
                "driver id longer than {} characters",
                Self::MAX_LEN
            )));
        }
        if !DRIVER_ID_RE.is_match(id) {
            return Err(AppError::Validation(format!(
                "driver id '{}' contains invalid characters",
                id
            )));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DriverId {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Self::parse(&value)
    }
}

impl From<DriverId> for String {
    fn from(value: DriverId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_plain_ids() {
        assert_eq!(DriverId::parse("  drv-07 ").unwrap().as_str(), "drv-07");
    }

    #[test]
    fn rejects_empty_and_odd_characters() {
        assert!(matches!(DriverId::parse("   "), Err(AppError::Validation(_))));
        assert!(matches!(DriverId::parse("a b"), Err(AppError::Validation(_))));
        assert!(DriverId::parse(&"x".repeat(65)).is_err());
    }
}
