//! Operator inference for filter bar input
//!
//! A filter bar cell only carries text, so the operator is read off the text
//! itself: comparison prefixes for numbers and dates, wildcard markers for
//! strings. The programmatic API never goes through here.

use datagrid_core::{Column, ColumnType, FilterOperator};

/// Operator and operand read from filter bar text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inference {
    Operator {
        operator: FilterOperator,
        value: String,
    },
    /// A bare comparison symbol with nothing to compare against
    Skip,
}

impl Inference {
    fn new(operator: FilterOperator, value: impl Into<String>) -> Self {
        Inference::Operator {
            operator,
            value: value.into(),
        }
    }
}

/// Infer the operator for `text` typed into `column`'s filter bar cell
pub fn infer(text: &str, column: &Column) -> Inference {
    let fixed = column.fixed_operator();
    match column.column_type {
        ColumnType::Number => infer_comparison(text, fixed),
        ColumnType::Date | ColumnType::DateTime | ColumnType::DateOnly => {
            if column.filter.bar_widget.is_none() {
                infer_comparison(text, fixed)
            } else {
                Inference::new(FilterOperator::Equal, text)
            }
        }
        ColumnType::String => {
            if let Some(operator) = fixed {
                return Inference::new(operator, text);
            }
            let operator = if is_wildcard_pattern(text) {
                FilterOperator::Wildcard
            } else if text.contains('%') {
                FilterOperator::Like
            } else {
                FilterOperator::StartsWith
            };
            Inference::new(operator, text)
        }
        ColumnType::Boolean => Inference::new(fixed.unwrap_or_default(), text),
    }
}

fn is_wildcard_pattern(text: &str) -> bool {
    text.contains('*') || text.contains('?') || text.to_ascii_lowercase().contains("%3f")
}

/// Scan for the first comparison symbol and split it out of the operand
fn infer_comparison(text: &str, fixed: Option<FilterOperator>) -> Inference {
    let trimmed = text.trim();
    let Some(start) = trimmed.find(['>', '<', '=', '!']) else {
        return Inference::new(fixed.unwrap_or_default(), trimmed);
    };

    let rest = &trimmed[start..];
    let mut symbol = rest.chars();
    let first = symbol.next().unwrap_or('=');
    let or_equal = symbol.next() == Some('=');
    let symbol_len = if or_equal { 2 } else { 1 };

    let operator = match (first, or_equal) {
        ('>', false) => FilterOperator::GreaterThan,
        ('>', true) => FilterOperator::GreaterThanOrEqual,
        ('<', false) => FilterOperator::LessThan,
        ('<', true) => FilterOperator::LessThanOrEqual,
        ('!', _) => FilterOperator::NotEqual,
        _ => FilterOperator::Equal,
    };

    let value = format!("{}{}", &trimmed[..start], &rest[symbol_len..]);
    let value = value.trim();
    if value.is_empty() {
        return Inference::Skip;
    }
    Inference::new(operator, value)
}
