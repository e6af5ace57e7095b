//! Route stop records.
//!
//! Stop rows come from several older exports whose key names drifted over
//! time. [`RawStop`] accepts every known spelling and [`RawStop::validate`]
//! turns it into the single typed [`RouteStop`] the grouping logic uses.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Pickup,
    Dropoff,
    SchoolArrival,
    SchoolDeparture,
}

impl StopType {
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pickup" | "pick_up" => Some(Self::Pickup),
            "dropoff" | "drop_off" => Some(Self::Dropoff),
            "school_arrival" | "school_dropoff" => Some(Self::SchoolArrival),
            "school_departure" | "school_pickup" => Some(Self::SchoolDeparture),
            _ => None,
        }
    }

    pub fn is_school(&self) -> bool {
        matches!(self, StopType::SchoolArrival | StopType::SchoolDeparture)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StopType::Pickup => "pickup",
            StopType::Dropoff => "dropoff",
            StopType::SchoolArrival => "school arrival",
            StopType::SchoolDeparture => "school departure",
        }
    }
}

/// A stop as it arrives from an export, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStop {
    #[serde(default, alias = "stop_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub route_id: Option<Value>,
    #[serde(default, alias = "stop_order", alias = "order")]
    pub sequence: Option<Value>,
    #[serde(default, alias = "type")]
    pub stop_type: Option<String>,
    #[serde(default)]
    pub student_id: Option<Value>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_address: Option<String>,
    #[serde(default)]
    pub school_id: Option<Value>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub school_address: Option<String>,
    #[serde(default, alias = "family_id")]
    pub household_id: Option<Value>,
    #[serde(default, alias = "stop_address")]
    pub address: Option<String>,
}

/// A validated route stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteStop {
    pub id: String,
    pub route_id: Option<String>,
    pub sequence: i64,
    pub stop_type: StopType,
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub student_address: Option<String>,
    pub school_id: Option<String>,
    pub school_name: Option<String>,
    pub school_address: Option<String>,
    pub household_id: Option<String>,
    pub address: Option<String>,
}

impl RouteStop {
    /// Minimal stop; tests and callers fill the optional fields directly.
    pub fn new(id: impl Into<String>, sequence: i64, stop_type: StopType) -> Self {
        Self {
            id: id.into(),
            route_id: None,
            sequence,
            stop_type,
            student_id: None,
            student_name: None,
            student_address: None,
            school_id: None,
            school_name: None,
            school_address: None,
            household_id: None,
            address: None,
        }
    }
}

/// Identifier fields arrive as strings or numbers.
fn id_field(row: usize, field: &str, v: Option<Value>) -> AppResult<Option<String>> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(text(Some(s))),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(AppError::Validation(format!(
            "stop row {}: {} has unsupported value {}",
            row, field, other
        ))),
    }
}

fn text(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl RawStop {
    /// `row` is the 1-based position in the input, used in error messages and
    /// as a fallback id.
    pub fn validate(self, row: usize) -> AppResult<RouteStop> {
        let sequence = match self.sequence {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            AppError::Validation(format!("stop row {}: missing or invalid sequence", row))
        })?;

        if sequence < 0 {
            return Err(AppError::Validation(format!(
                "stop row {}: sequence {} is negative",
                row, sequence
            )));
        }

        let raw_type = text(self.stop_type).unwrap_or_else(|| "pickup".to_string());
        let stop_type = StopType::from_code(&raw_type).ok_or_else(|| {
            AppError::Validation(format!("stop row {}: unknown stop type '{}'", row, raw_type))
        })?;

        Ok(RouteStop {
            id: id_field(row, "id", self.id)?.unwrap_or_else(|| format!("row{}", row)),
            route_id: id_field(row, "route_id", self.route_id)?,
            sequence,
            stop_type,
            student_id: id_field(row, "student_id", self.student_id)?,
            student_name: text(self.student_name),
            student_address: text(self.student_address),
            school_id: id_field(row, "school_id", self.school_id)?,
            school_name: text(self.school_name),
            school_address: text(self.school_address),
            household_id: id_field(row, "household_id", self.household_id)?,
            address: text(self.address),
        })
    }
}

/// Parse a JSON array of stop rows and validate each one.
pub fn parse_stops(json: &str) -> AppResult<Vec<RouteStop>> {
    let raw: Vec<RawStop> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| r.validate(i + 1))
        .collect()
}

/// Stops merged for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopGroup {
    pub sequence: i64,
    pub stop_type: StopType,
    pub school_id: Option<String>,
    pub school_name: Option<String>,
    pub household_id: Option<String>,
    pub student_ids: Vec<String>,
    pub student_name: String,
    pub address: Option<String>,
    pub stop_ids: Vec<String>,
}
