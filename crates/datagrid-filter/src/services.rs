//! Host grid collaborators
//!
//! The filter engine never reaches into the rendering layer, the editing
//! subsystem or the query layer directly. Everything it needs from the host
//! grid comes through the narrow traits in this module, bundled into a
//! [`GridHost`].

use std::sync::Arc;

use async_trait::async_trait;
use datagrid_core::{Column, ColumnType, FilterValue, ValueFormat};
use parking_lot::RwLock;

use crate::events::{ActionEventHandler, NoopActionHandler};
use crate::format::DefaultFormatter;

/// Live column descriptors of the grid
pub trait ColumnProvider: Send + Sync {
    /// Current columns, in display order
    fn columns(&self) -> Vec<Column>;

    /// Look up a single column by field name
    fn column(&self, field: &str) -> Option<Column> {
        self.columns().into_iter().find(|column| column.field == field)
    }
}

/// Column provider backed by an in-memory list the host can mutate
#[derive(Debug, Default)]
pub struct StaticColumns {
    columns: RwLock<Vec<Column>>,
}

impl StaticColumns {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns: RwLock::new(columns),
        }
    }

    /// Replace the whole column set
    pub fn set_columns(&self, columns: Vec<Column>) {
        *self.columns.write() = columns;
    }

    /// Remove a column by field, returning it if present
    pub fn remove(&self, field: &str) -> Option<Column> {
        let mut columns = self.columns.write();
        let index = columns.iter().position(|column| column.field == field)?;
        Some(columns.remove(index))
    }

    /// Rename a column's field, keeping its uid
    pub fn rename(&self, field: &str, new_field: impl Into<String>) -> bool {
        let mut columns = self.columns.write();
        match columns.iter_mut().find(|column| column.field == field) {
            Some(column) => {
                column.field = new_field.into();
                true
            }
            None => false,
        }
    }
}

impl ColumnProvider for StaticColumns {
    fn columns(&self) -> Vec<Column> {
        self.columns.read().clone()
    }

    fn column(&self, field: &str) -> Option<Column> {
        self.columns
            .read()
            .iter()
            .find(|column| column.field == field)
            .cloned()
    }
}

/// Gate consulted before any filter mutation while edits are pending
///
/// `Some(false)` aborts the operation; `Some(true)` and `None` let it proceed.
/// Implementations may await a confirmation dialog. The engine enforces no
/// timeout.
#[async_trait]
pub trait EditGuard: Send + Sync {
    async fn check_unsaved_changes(&self) -> Option<bool>;
}

/// Reversible display/parse pair for column values
pub trait ValueFormatter: Send + Sync {
    /// Render a value for display (pager summary, filter bar text)
    fn to_view(&self, value: &FilterValue, format: Option<&ValueFormat>) -> String;

    /// Parse display text back into a typed value, `None` when it does not parse
    fn from_view(&self, text: &str, format: &ValueFormat, column_type: ColumnType)
    -> Option<FilterValue>;
}

/// Pager/status line of the grid
pub trait StatusSurface: Send + Sync {
    fn set_pager_message(&self, text: &str);
}

/// Display capability of the filter bar widgets
pub trait FilterBarDisplay: Send + Sync {
    fn display_value(&self, field: &str) -> Option<String>;
    fn set_display_value(&self, field: &str, text: &str);
}

/// Where the grid's rows are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSourceKind {
    /// Rows are filtered in memory
    #[default]
    Local,
    /// Predicates are shipped to a remote query layer (OData and friends)
    Remote,
}

/// Everything the filter engine consumes from the host grid
#[derive(Clone)]
pub struct GridHost {
    pub columns: Arc<dyn ColumnProvider>,
    pub events: Arc<dyn ActionEventHandler>,
    pub formatter: Arc<dyn ValueFormatter>,
    pub edit_guard: Option<Arc<dyn EditGuard>>,
    pub status: Option<Arc<dyn StatusSurface>>,
    pub filter_bar: Option<Arc<dyn FilterBarDisplay>>,
    pub data_source: DataSourceKind,
}

impl GridHost {
    /// Create a host with the default formatter and a local data source
    pub fn new(columns: Arc<dyn ColumnProvider>) -> Self {
        Self {
            columns,
            events: Arc::new(NoopActionHandler),
            formatter: Arc::new(DefaultFormatter),
            edit_guard: None,
            status: None,
            filter_bar: None,
            data_source: DataSourceKind::Local,
        }
    }

    pub fn with_events(mut self, events: Arc<dyn ActionEventHandler>) -> Self {
        self.events = events;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_edit_guard(mut self, guard: Arc<dyn EditGuard>) -> Self {
        self.edit_guard = Some(guard);
        self
    }

    pub fn with_status_surface(mut self, status: Arc<dyn StatusSurface>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_filter_bar_display(mut self, display: Arc<dyn FilterBarDisplay>) -> Self {
        self.filter_bar = Some(display);
        self
    }

    pub fn with_data_source(mut self, data_source: DataSourceKind) -> Self {
        self.data_source = data_source;
        self
    }
}
