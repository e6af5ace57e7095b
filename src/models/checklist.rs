use super::driver::DriverId;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKind {
    Pre,
    Post,
}

impl ChecklistKind {
    /// Accepts `pre`, `pre-trip`, `pretrip` (and the post variants).
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "pre" | "pretrip" => Some(Self::Pre),
            "post" | "posttrip" => Some(Self::Post),
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ChecklistKind::Pre => "pre",
            ChecklistKind::Post => "post",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pre" => Some(ChecklistKind::Pre),
            "post" => Some(ChecklistKind::Post),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistKind::Pre => "pre-trip",
            ChecklistKind::Post => "post-trip",
        }
    }
}

/// One inspection line (tires, lights, brakes, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub name: String,
    pub passed: bool,
}

impl ChecklistItem {
    /// Parse `name=pass` / `name=fail` (also ok/yes/no/true/false).
    pub fn parse(raw: &str) -> AppResult<Self> {
        let (name, verdict) = raw.split_once('=').ok_or_else(|| {
            AppError::Validation(format!("checklist item '{}' needs name=pass|fail", raw))
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(format!(
                "checklist item '{}' has no name",
                raw
            )));
        }

        let passed = match verdict.trim().to_lowercase().as_str() {
            "pass" | "ok" | "yes" | "true" => true,
            "fail" | "no" | "false" => false,
            other => {
                return Err(AppError::Validation(format!(
                    "checklist item '{}': unknown verdict '{}'",
                    name, other
                )));
            }
        };

        Ok(Self {
            name: name.to_string(),
            passed,
        })
    }
}

/// A submitted vehicle checklist. Pre-trip submissions clock the driver in,
/// post-trip submissions clock them out.
#[derive(Debug, Clone, Serialize)]
pub struct Checklist {
    pub id: i64,
    pub driver_id: DriverId,
    pub vehicle_id: Option<String>,
    pub kind: ChecklistKind,
    pub submitted_at: DateTime<Utc>,
    pub items: Vec<ChecklistItem>,
    pub notes: String,
    pub session_id: Option<i64>,
}

impl Checklist {
    pub fn new(
        driver_id: DriverId,
        kind: ChecklistKind,
        submitted_at: DateTime<Utc>,
        vehicle_id: Option<String>,
        items: Vec<ChecklistItem>,
        notes: String,
    ) -> Self {
        Self {
            id: 0,
            driver_id,
            vehicle_id,
            kind,
            submitted_at,
            items,
            notes,
            session_id: None,
        }
    }

    pub fn defects(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items.iter().filter(|i| !i.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accepts_trip_spellings() {
        assert_eq!(ChecklistKind::from_code("Pre-Trip"), Some(ChecklistKind::Pre));
        assert_eq!(ChecklistKind::from_code("post_trip"), Some(ChecklistKind::Post));
        assert_eq!(ChecklistKind::from_code("mid"), None);
    }

    #[test]
    fn item_parse() {
        let i = ChecklistItem::parse("brakes=pass").unwrap();
        assert!(i.passed);
        let i = ChecklistItem::parse(" left mirror = FAIL").unwrap();
        assert_eq!(i.name, "left mirror");
        assert!(!i.passed);
        assert!(ChecklistItem::parse("brakes").is_err());
        assert!(ChecklistItem::parse("=pass").is_err());
        assert!(ChecklistItem::parse("brakes=maybe").is_err());
    }
}
