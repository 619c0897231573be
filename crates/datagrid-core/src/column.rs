//! Column descriptors

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ColumnType, FilterOperator, ValueFormat};

/// Kind of input control rendered in a column's filter bar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBarWidgetType {
    Text,
    Number,
    Date,
}

/// Per-column filter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnFilterOptions {
    /// Fixed operator used instead of inference
    pub operator: Option<FilterOperator>,
    /// Filter bar widget override; a date column with one gets no comparison prefixes
    pub bar_widget: Option<FilterBarWidgetType>,
    /// Column renders its own filter template; generic key handling must not filter it
    pub template: bool,
}

/// A grid column as seen by the filter engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub field: String,
    /// Stable identity, survives renames and reorders
    pub uid: String,
    pub header_text: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub format: Option<ValueFormat>,
    #[serde(default)]
    pub filter: ColumnFilterOptions,
    #[serde(default = "default_allow_filtering")]
    pub allow_filtering: bool,
}

fn default_allow_filtering() -> bool {
    true
}

impl Column {
    /// Create a filterable column with a fresh uid and the field as header
    pub fn new(field: impl Into<String>, column_type: ColumnType) -> Self {
        let field = field.into();
        Self {
            header_text: field.clone(),
            field,
            uid: Uuid::new_v4().to_string(),
            column_type,
            format: None,
            filter: ColumnFilterOptions::default(),
            allow_filtering: true,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn with_header(mut self, header_text: impl Into<String>) -> Self {
        self.header_text = header_text.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(ValueFormat::new(format));
        self
    }

    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.filter.operator = Some(operator);
        self
    }

    pub fn with_bar_widget(mut self, widget: FilterBarWidgetType) -> Self {
        self.filter.bar_widget = Some(widget);
        self
    }

    pub fn with_template(mut self) -> Self {
        self.filter.template = true;
        self
    }

    pub fn with_filtering(mut self, allow: bool) -> Self {
        self.allow_filtering = allow;
        self
    }

    /// Fixed operator configured for this column, if any
    pub fn fixed_operator(&self) -> Option<FilterOperator> {
        self.filter.operator
    }
}
