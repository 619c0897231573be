//! Default value formatter
//!
//! Hosts with a localization layer plug their own [`ValueFormatter`]; this
//! one covers invariant-culture number patterns (`N2`, `C2`, `P0`) and
//! `chrono` strftime date patterns.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use datagrid_core::{ColumnType, FilterValue, ValueFormat};

use crate::services::ValueFormatter;

const CURRENCY_SYMBOL: &str = "$";
/// Longest fraction a number pattern may ask for; f64 carries no more
const MAX_DECIMALS: usize = 15;

/// Number pattern kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberPattern {
    Number(usize),
    Currency(usize),
    Percent(usize),
}

impl NumberPattern {
    fn parse(pattern: &str) -> Option<Self> {
        let mut chars = pattern.chars();
        let kind = chars.next()?.to_ascii_uppercase();
        let digits = chars.as_str();
        let decimals = if digits.is_empty() {
            2
        } else {
            digits.parse::<usize>().ok()?
        };
        if decimals > MAX_DECIMALS {
            return None;
        }
        match kind {
            'N' => Some(Self::Number(decimals)),
            'C' => Some(Self::Currency(decimals)),
            'P' => Some(Self::Percent(decimals)),
            _ => None,
        }
    }
}

/// Invariant-culture formatter
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatter;

impl ValueFormatter for DefaultFormatter {
    fn to_view(&self, value: &FilterValue, format: Option<&ValueFormat>) -> String {
        let Some(format) = format else {
            return value.to_string();
        };

        match value {
            FilterValue::Number(number) => match NumberPattern::parse(format.pattern()) {
                Some(NumberPattern::Number(decimals)) => group_digits(*number, decimals),
                Some(NumberPattern::Currency(decimals)) => {
                    let grouped = group_digits(number.abs(), decimals);
                    if *number < 0.0 {
                        format!("-{}{}", CURRENCY_SYMBOL, grouped)
                    } else {
                        format!("{}{}", CURRENCY_SYMBOL, grouped)
                    }
                }
                Some(NumberPattern::Percent(decimals)) => {
                    format!("{}%", group_digits(number * 100.0, decimals))
                }
                None => value.to_string(),
            },
            FilterValue::Date(date) => {
                let mut out = String::new();
                match write!(out, "{}", date.format(format.pattern())) {
                    Ok(()) => out,
                    Err(_) => value.to_string(),
                }
            }
            FilterValue::DateTime(date_time) => {
                let mut out = String::new();
                match write!(out, "{}", date_time.format(format.pattern())) {
                    Ok(()) => out,
                    Err(_) => value.to_string(),
                }
            }
            _ => value.to_string(),
        }
    }

    fn from_view(
        &self,
        text: &str,
        format: &ValueFormat,
        column_type: ColumnType,
    ) -> Option<FilterValue> {
        let text = text.trim();
        match column_type {
            ColumnType::Number => {
                let pattern = NumberPattern::parse(format.pattern())?;
                let cleaned: String = text
                    .chars()
                    .filter(|c| !matches!(c, ',' | ' ' | '%'))
                    .collect::<String>()
                    .replace(CURRENCY_SYMBOL, "");
                let number = cleaned.parse::<f64>().ok()?;
                match pattern {
                    NumberPattern::Percent(_) => Some(FilterValue::Number(number / 100.0)),
                    _ => Some(FilterValue::Number(number)),
                }
            }
            ColumnType::Date | ColumnType::DateOnly => {
                if let Ok(date) = NaiveDate::parse_from_str(text, format.pattern()) {
                    return Some(FilterValue::Date(date));
                }
                NaiveDateTime::parse_from_str(text, format.pattern())
                    .ok()
                    .map(|dt| FilterValue::Date(dt.date()))
            }
            ColumnType::DateTime => {
                if let Ok(date_time) = NaiveDateTime::parse_from_str(text, format.pattern()) {
                    return Some(FilterValue::DateTime(date_time));
                }
                NaiveDate::parse_from_str(text, format.pattern())
                    .ok()
                    .map(|date| FilterValue::DateTime(date.and_time(NaiveTime::MIN)))
            }
            ColumnType::String | ColumnType::Boolean => None,
        }
    }
}

/// Render `value` with `decimals` places and `,` thousands separators
fn group_digits(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(rendered.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
