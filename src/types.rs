use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::TableSetError;

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used for every backend, so filter arguments never depend on
/// the driver in use:
/// ```rust
/// use sql_tableset::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// True for the values an insert treats as "no key assigned yet".
    #[must_use]
    pub fn is_unset_key(&self) -> bool {
        matches!(self, RowValues::Null | RowValues::Int(0))
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        RowValues::Float(f64::from(value))
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The database kinds a configuration may name.
///
/// Parsing is case-insensitive and uses the configuration spellings
/// (`mysql`, `postgresql`, `sqlite`, `sqlserver`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `MySQL` / `MariaDB`
    #[value(name = "mysql")]
    Mysql,
    /// `PostgreSQL`
    #[value(name = "postgresql")]
    Postgresql,
    /// `SQLite`
    #[value(name = "sqlite")]
    Sqlite,
    /// SQL Server
    #[value(name = "sqlserver")]
    Sqlserver,
}

impl DatabaseType {
    /// Configuration spelling of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseType::Mysql => "mysql",
            DatabaseType::Postgresql => "postgresql",
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Sqlserver => "sqlserver",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = TableSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <DatabaseType as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_| TableSetError::UnsupportedDatabase(s.to_string()))
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
