//! Core types for the datagrid

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Declared data type of a grid column
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Boolean,
    /// Calendar date (time portion ignored)
    Date,
    /// Date with time of day
    DateTime,
    /// Date without any time or timezone component
    DateOnly,
}

impl ColumnType {
    /// Returns true for the three date flavours
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::DateOnly)
    }

    /// Returns true if case sensitivity can be relaxed for this type.
    ///
    /// Only text compares differently with case folding; every other type is
    /// always matched case-sensitively.
    pub fn supports_case_folding(&self) -> bool {
        matches!(self, Self::String)
    }
}

/// A typed filter operand
///
/// `Missing` is the absent-field marker produced by blank expansion. It is
/// never read from configuration and serializes as `null`; loading a saved
/// blank filter re-runs the expansion instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// NULL value
    #[default]
    Null,
    /// Field absent from the record
    #[serde(skip_deserializing)]
    Missing,
    /// Boolean
    Bool(bool),
    /// Any number (grids treat integers and floats alike)
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without timezone
    DateTime(NaiveDateTime),
    /// UTF-8 string
    String(String),
}

impl FilterValue {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Null, missing, or the empty string
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Null | FilterValue::Missing => true,
            FilterValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Name of the variant, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::Missing => "missing",
            FilterValue::Bool(_) => "boolean",
            FilterValue::Number(_) => "number",
            FilterValue::Date(_) => "date",
            FilterValue::DateTime(_) => "datetime",
            FilterValue::String(_) => "string",
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Null | FilterValue::Missing => Ok(()),
            FilterValue::Bool(v) => write!(f, "{}", v),
            FilterValue::Number(v) => {
                // Integral values render without a trailing ".0"
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            FilterValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            FilterValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            FilterValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value as f64)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value as f64)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        FilterValue::DateTime(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// Display/parse format descriptor attached to a column
///
/// Number patterns follow the `N2` / `C2` / `P0` convention (kind + decimal
/// places); date patterns are `chrono` strftime strings such as `%d/%m/%Y`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueFormat {
    pattern: String,
}

impl ValueFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
