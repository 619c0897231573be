//! Predicate reconciliation
//!
//! Each filter call builds a [`FilterOperation`]: the column, operator and
//! coerced operands of that one call. The operation turns itself into the
//! predicate group that replaces the column's current group in the store.

use datagrid_core::{Column, ColumnType, FilterOperator, FilterValue, LogicalOperator};
use tracing::debug;

use crate::predicate::FilterPredicate;
use crate::services::DataSourceKind;

/// Which entry point started an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    /// `filter_by_column`
    Api,
    /// Filter bar key or picker input
    FilterBar,
}

/// Context of a single filter call
#[derive(Debug, Clone)]
pub struct FilterOperation {
    pub column: Column,
    pub operator: FilterOperator,
    pub values: Vec<FilterValue>,
    pub is_list: bool,
    pub predicate: LogicalOperator,
    pub case_sensitive: bool,
    pub ignore_accent: bool,
    pub origin: FilterOrigin,
}

impl FilterOperation {
    /// Start an operation with the default connective and case handling
    pub fn new(
        column: Column,
        operator: FilterOperator,
        values: Vec<FilterValue>,
        is_list: bool,
        origin: FilterOrigin,
    ) -> Self {
        let values = values
            .into_iter()
            .map(|value| normalize_value(value, operator))
            .collect();
        let case_sensitive = !column.column_type.supports_case_folding();

        Self {
            column,
            operator,
            values,
            is_list,
            predicate: if is_list {
                LogicalOperator::Or
            } else {
                LogicalOperator::And
            },
            case_sensitive,
            ignore_accent: false,
            origin,
        }
    }

    /// Override the connective; `None` keeps the list/single default
    pub fn with_predicate(mut self, predicate: Option<LogicalOperator>) -> Self {
        if let Some(predicate) = predicate {
            self.predicate = predicate;
        }
        self
    }

    /// Override case sensitivity; only text columns accept `false`
    pub fn with_case_sensitivity(mut self, case_sensitive: Option<bool>) -> Self {
        self.case_sensitive = if self.column.column_type.supports_case_folding() {
            case_sensitive.unwrap_or(false)
        } else {
            true
        };
        self
    }

    pub fn with_ignore_accent(mut self, ignore_accent: bool) -> Self {
        self.ignore_accent = ignore_accent;
        self
    }

    pub fn field(&self) -> &str {
        &self.column.field
    }

    pub fn uid(&self) -> &str {
        &self.column.uid
    }

    /// The predicate group this operation stores for its column
    pub fn build_group(&self, data_source: DataSourceKind) -> Vec<FilterPredicate> {
        let mut group: Vec<FilterPredicate> = Vec::with_capacity(self.values.len());
        for value in &self.values {
            if group.iter().any(|p| &p.value == value) {
                continue;
            }
            group.push(self.predicate_for(value.clone()));
        }

        if !self.is_list && data_source == DataSourceKind::Local {
            expand_blanks(&mut group, self.column.column_type);
        }
        group
    }

    fn predicate_for(&self, value: FilterValue) -> FilterPredicate {
        FilterPredicate {
            field: self.column.field.clone(),
            operator: self.operator,
            value,
            predicate: self.predicate,
            case_sensitive: self.case_sensitive,
            ignore_accent: self.ignore_accent,
            column_type: self.column.column_type,
            uid: self.column.uid.clone(),
        }
    }
}

/// Empty strings become null; `like` operands gain `%` delimiters
fn normalize_value(value: FilterValue, operator: FilterOperator) -> FilterValue {
    match value {
        FilterValue::String(text) if text.is_empty() => FilterValue::Null,
        FilterValue::String(text) if operator == FilterOperator::Like && !text.contains('%') => {
            FilterValue::String(format!("%{}%", text))
        }
        other => other,
    }
}

/// Blank expansion
///
/// In-memory evaluation distinguishes null, the empty string and an absent
/// field, while a user filtering for "blank" means all three. An
/// `equal`/`notequal` group holding a single null gets siblings for the other
/// blank representations: `equal` joins them with `or`, `notequal` with `and`.
pub fn expand_blanks(group: &mut Vec<FilterPredicate>, column_type: ColumnType) {
    let [blank] = group.as_slice() else {
        return;
    };
    if !blank.operator.is_equality() || !blank.value.is_null() {
        return;
    }

    let connective = match blank.operator {
        FilterOperator::NotEqual => LogicalOperator::And,
        _ => LogicalOperator::Or,
    };
    let template = FilterPredicate {
        predicate: connective,
        ..blank.clone()
    };

    let mut siblings = Vec::with_capacity(2);
    if column_type == ColumnType::String {
        siblings.push(FilterValue::String(String::new()));
    }
    siblings.push(FilterValue::Missing);

    debug!(
        field = %template.field,
        operator = %template.operator,
        siblings = siblings.len(),
        "expanding blank filter"
    );

    group[0].predicate = connective;
    group.extend(siblings.into_iter().map(|value| FilterPredicate {
        value,
        ..template.clone()
    }));
}
