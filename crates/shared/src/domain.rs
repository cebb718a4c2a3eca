use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RowNumber);

/// Value written into the accreditation marker after a successful mark call.
pub const ACCREDITED_MARKER: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    pub full_name: String,
    pub email: String,
    pub upline_director: String,
    pub upline_world_team: String,
    pub status: String,
    /// Empty means pending; anything else means accredited.
    pub accredit: String,
    pub row_number: RowNumber,
}

impl Registrant {
    pub fn is_accredited(&self) -> bool {
        !self.accredit.is_empty()
    }

    /// Fields the free-text search looks at, in column order.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            &self.full_name,
            &self.email,
            &self.upline_director,
            &self.upline_world_team,
            &self.status,
        ]
    }

    pub fn field(&self, field: SortField) -> &str {
        match field {
            SortField::FullName => &self.full_name,
            SortField::Email => &self.email,
            SortField::UplineDirector => &self.upline_director,
            SortField::UplineWorldTeam => &self.upline_world_team,
            SortField::Status => &self.status,
        }
    }

    pub fn mark_accredited(&mut self) {
        self.accredit = ACCREDITED_MARKER.to_string();
    }

    pub fn status_tier(&self) -> StatusTier {
        StatusTier::from_status(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    FullName,
    Email,
    UplineDirector,
    UplineWorldTeam,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::FullName,
        SortField::Email,
        SortField::UplineDirector,
        SortField::UplineWorldTeam,
        SortField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::FullName => "Full Name",
            SortField::Email => "Email Address",
            SortField::UplineDirector => "Upline Director",
            SortField::UplineWorldTeam => "Upline World Team",
            SortField::Status => "Status",
        }
    }

    /// Short name accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            SortField::FullName => "name",
            SortField::Email => "email",
            SortField::UplineDirector => "director",
            SortField::UplineWorldTeam => "team",
            SortField::Status => "status",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown sort field '{0}' (expected one of: name, email, director, team, status)")]
pub struct ParseSortFieldError(pub String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "full_name" | "full-name" => Ok(SortField::FullName),
            "email" | "email_address" => Ok(SortField::Email),
            "director" | "upline_director" | "upline-director" => Ok(SortField::UplineDirector),
            "team" | "world_team" | "world-team" | "upline_world_team" => {
                Ok(SortField::UplineWorldTeam)
            }
            "status" => Ok(SortField::Status),
            other => Err(ParseSortFieldError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column-header click: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Display grouping derived from the free-form status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Gold,
    Success,
    Warning,
    Secondary,
}

impl StatusTier {
    pub fn from_status(status: &str) -> Self {
        let lower = status.to_lowercase();
        if lower.contains("world") || lower.contains("diamond") {
            StatusTier::Gold
        } else if lower.contains("director") || lower.contains("senior") {
            StatusTier::Success
        } else if lower.contains("manager") || lower.contains("team") {
            StatusTier::Warning
        } else {
            StatusTier::Secondary
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
