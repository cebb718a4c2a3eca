//! Wire shapes exchanged with the spreadsheet-backed endpoint.
//!
//! The sheet is loosely typed: columns may be missing, empty cells come back
//! as `null` or `""`, and numeric-looking cells may arrive as JSON numbers.
//! Everything is coerced here so the rest of the workspace only sees
//! [`Registrant`].

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Registrant, RowNumber, ACCREDITED_MARKER};

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrantRow {
    #[serde(rename = "Full Name", default, deserialize_with = "lenient_text")]
    pub full_name: String,
    #[serde(rename = "Email Address", default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(
        rename = "Your Upline Director",
        default,
        deserialize_with = "lenient_text"
    )]
    pub upline_director: String,
    #[serde(
        rename = "Your Upline World Team",
        default,
        deserialize_with = "lenient_text"
    )]
    pub upline_world_team: String,
    #[serde(rename = "Your Status", default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(rename = "Accredit", default, deserialize_with = "lenient_marker")]
    pub accredit: String,
    #[serde(rename = "rowNumber", deserialize_with = "lenient_row_number")]
    pub row_number: i64,
}

impl From<RegistrantRow> for Registrant {
    fn from(row: RegistrantRow) -> Self {
        Self {
            full_name: row.full_name,
            email: row.email,
            upline_director: row.upline_director,
            upline_world_team: row.upline_world_team,
            status: row.status,
            accredit: row.accredit,
            row_number: RowNumber(row.row_number),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAccreditedRequest {
    #[serde(rename = "rowNumber")]
    pub row_number: RowNumber,
}

/// Decodes a list response body into registrants.
pub fn decode_registrants(body: &[u8]) -> Result<Vec<Registrant>, serde_json::Error> {
    let rows: Vec<RegistrantRow> = serde_json::from_slice(body)?;
    Ok(rows.into_iter().map(Registrant::from).collect())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected a text cell, got {other}"
        ))),
    }
}

// A checkbox column exports booleans; `false` is an unchecked cell.
fn lenient_marker<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(true)) => Ok(ACCREDITED_MARKER.to_string()),
        Some(Value::Bool(false)) => Ok(String::new()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(D::Error::custom("expected a text cell for Accredit"))
        }
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        None | Some(Value::Null) => Ok(String::new()),
    }
}

fn lenient_row_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                return Ok(v);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(D::Error::custom(format!("rowNumber {n} is not an integer"))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("rowNumber '{s}' is not an integer"))),
        other => Err(D::Error::custom(format!(
            "rowNumber must be an integer, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
