//! Filter predicates and programmatic filter requests

use chrono::{NaiveDate, NaiveDateTime};
use datagrid_core::{ColumnType, FilterOperator, FilterValue, LogicalOperator};
use serde::{Deserialize, Serialize};

/// One field/operator/value/connective filter condition
///
/// This is also the tuple handed to the query layer, so the JSON shape is
/// kept close to what remote adaptors expect (`type`, camel-case flags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredPredicate")]
pub struct FilterPredicate {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
    /// Connective relative to same-field siblings
    pub predicate: LogicalOperator,
    pub case_sensitive: bool,
    pub ignore_accent: bool,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Identity of the owning column
    pub uid: String,
}

/// Serialized form of [`FilterPredicate`], with the value left untyped until
/// the declared column type is known
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPredicate {
    field: String,
    operator: FilterOperator,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    predicate: LogicalOperator,
    #[serde(default)]
    case_sensitive: bool,
    #[serde(default)]
    ignore_accent: bool,
    #[serde(rename = "type", default)]
    column_type: ColumnType,
    #[serde(default)]
    uid: String,
}

impl From<StoredPredicate> for FilterPredicate {
    fn from(stored: StoredPredicate) -> Self {
        let value = match stored.value {
            // text operands stay verbatim even when they read as a date
            serde_json::Value::String(text) if stored.column_type == ColumnType::String => {
                FilterValue::String(text)
            }
            other => serde_json::from_value(other.clone())
                .unwrap_or_else(|_| FilterValue::String(other.to_string())),
        };

        Self {
            field: stored.field,
            operator: stored.operator,
            value,
            predicate: stored.predicate,
            case_sensitive: stored.case_sensitive,
            ignore_accent: stored.ignore_accent,
            column_type: stored.column_type,
            uid: stored.uid,
        }
    }
}

impl FilterPredicate {
    /// Whether this predicate belongs to the column identified by `uid`/`field`
    pub fn belongs_to(&self, uid: &str, field: &str) -> bool {
        (!uid.is_empty() && self.uid == uid) || self.field == field
    }
}

/// Value operand of a filter request: one value, or a list expanded into one
/// predicate per element
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    Single(FilterValue),
    List(Vec<FilterValue>),
}

impl FilterInput {
    pub fn null() -> Self {
        FilterInput::Single(FilterValue::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FilterInput::List(_))
    }

    pub fn values(&self) -> &[FilterValue] {
        match self {
            FilterInput::Single(value) => std::slice::from_ref(value),
            FilterInput::List(values) => values,
        }
    }
}

macro_rules! impl_filter_input_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FilterInput {
                fn from(value: $ty) -> Self {
                    FilterInput::Single(value.into())
                }
            }

            impl From<Vec<$ty>> for FilterInput {
                fn from(values: Vec<$ty>) -> Self {
                    FilterInput::List(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

impl_filter_input_from!(
    &str,
    String,
    f64,
    i32,
    i64,
    bool,
    NaiveDate,
    NaiveDateTime,
    FilterValue,
);

/// A programmatic `filter_by_column` call
///
/// The operator is taken literally; no inference runs on this path.
///
/// # Example
///
/// ```
/// use datagrid_core::{FilterOperator, LogicalOperator};
/// use datagrid_filter::FilterRequest;
///
/// let request = FilterRequest::new("CustomerID", FilterOperator::Equal, vec!["VINET", "TOMSP"])
///     .predicate(LogicalOperator::Or)
///     .case_sensitive(true);
/// assert!(request.value.is_list());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterInput,
    pub predicate: Option<LogicalOperator>,
    pub case_sensitive: Option<bool>,
    pub ignore_accent: Option<bool>,
}

impl FilterRequest {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterInput>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            predicate: None,
            case_sensitive: None,
            ignore_accent: None,
        }
    }

    pub fn predicate(mut self, predicate: LogicalOperator) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn ignore_accent(mut self, ignore_accent: bool) -> Self {
        self.ignore_accent = Some(ignore_accent);
        self
    }
}
