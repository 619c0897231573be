//! Value coercion
//!
//! Turns a raw filter operand into a value of the column's declared type.
//! Coercion never fails loudly: unparsable input becomes [`Coerced::Invalid`]
//! and blank input becomes [`Coerced::Clear`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use datagrid_core::{Column, ColumnType, FilterValue};

use crate::services::ValueFormatter;

/// Formats tried, in order, when a date string does not match the column format
const DATE_TIME_FALLBACKS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const DATE_FALLBACKS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Result of coercing one operand
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// A typed value ready to be stored
    Value(FilterValue),
    /// Blank input; clears the column's filter
    Clear,
    /// Input that cannot be read as the column's type
    Invalid,
}

/// Coerce `raw` to the type of `column`
pub fn coerce(raw: &FilterValue, column: &Column, formatter: &dyn ValueFormatter) -> Coerced {
    if raw.is_blank() {
        return Coerced::Clear;
    }

    match column.column_type {
        ColumnType::Number => coerce_number(raw, column, formatter),
        ColumnType::Date | ColumnType::DateTime | ColumnType::DateOnly => {
            coerce_date(raw, column, formatter)
        }
        ColumnType::Boolean => coerce_bool(raw),
        ColumnType::String => match raw {
            FilterValue::String(_) => Coerced::Value(raw.clone()),
            other => Coerced::Value(FilterValue::String(other.to_string())),
        },
    }
}

fn coerce_number(raw: &FilterValue, column: &Column, formatter: &dyn ValueFormatter) -> Coerced {
    let text = match raw {
        FilterValue::Number(number) if number.is_finite() => return Coerced::Value(raw.clone()),
        FilterValue::Number(_) => return Coerced::Invalid,
        FilterValue::String(text) => text.trim(),
        _ => return Coerced::Invalid,
    };

    if let Some(format) = &column.format
        && let Some(FilterValue::Number(number)) =
            formatter.from_view(text, format, column.column_type)
        && number.is_finite()
    {
        return Coerced::Value(FilterValue::Number(number));
    }

    match text.parse::<f64>() {
        Ok(number) if number.is_finite() => Coerced::Value(FilterValue::Number(number)),
        _ => Coerced::Invalid,
    }
}

fn coerce_date(raw: &FilterValue, column: &Column, formatter: &dyn ValueFormatter) -> Coerced {
    let parsed = match raw {
        FilterValue::Date(_) | FilterValue::DateTime(_) => Some(raw.clone()),
        FilterValue::String(text) => {
            let text = text.trim();
            column
                .format
                .as_ref()
                .and_then(|format| formatter.from_view(text, format, column.column_type))
                .or_else(|| parse_date_text(text))
        }
        _ => None,
    };

    match parsed.and_then(|value| shape_date(value, column.column_type)) {
        Some(value) => Coerced::Value(value),
        None => Coerced::Invalid,
    }
}

/// Parse a date string in one of the common machine formats
pub(crate) fn parse_date_text(text: &str) -> Option<FilterValue> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(FilterValue::DateTime(date_time.naive_local()));
    }
    for pattern in DATE_TIME_FALLBACKS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(FilterValue::DateTime(date_time));
        }
    }
    for pattern in DATE_FALLBACKS {
        if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
            return Some(FilterValue::Date(date));
        }
    }
    None
}

/// Fit a parsed date to the column's date flavour
fn shape_date(value: FilterValue, column_type: ColumnType) -> Option<FilterValue> {
    match (value, column_type) {
        (FilterValue::Date(date), ColumnType::DateTime) => {
            Some(FilterValue::DateTime(date.and_time(NaiveTime::MIN)))
        }
        (FilterValue::DateTime(date_time), ColumnType::Date | ColumnType::DateOnly) => {
            Some(FilterValue::Date(date_time.date()))
        }
        (value @ (FilterValue::Date(_) | FilterValue::DateTime(_)), _) => Some(value),
        _ => None,
    }
}

fn coerce_bool(raw: &FilterValue) -> Coerced {
    match raw {
        FilterValue::Bool(_) => Coerced::Value(raw.clone()),
        FilterValue::Number(number) if *number == 1.0 => Coerced::Value(FilterValue::Bool(true)),
        FilterValue::Number(number) if *number == 0.0 => Coerced::Value(FilterValue::Bool(false)),
        FilterValue::String(text) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") || text == "1" {
                Coerced::Value(FilterValue::Bool(true))
            } else if text.eq_ignore_ascii_case("false") || text == "0" {
                Coerced::Value(FilterValue::Bool(false))
            } else {
                Coerced::Invalid
            }
        }
        _ => Coerced::Invalid,
    }
}
