//! Datagrid Filter Engine
//!
//! This crate implements the filtering module of a data grid: the active
//! predicate list, operator inference for filter bar input, predicate
//! reconciliation and the cancelable begin/complete event protocol.
//!
//! # Architecture
//!
//! ```text
//! FilterBar (key / picker input, debounce)
//!     ↓
//! FilterEngine ← this crate's entry point
//!     ↓
//! inference → coercion → reconcile → PredicateStore
//!     ↓
//! GridHost collaborators (columns, events, edit guard, status, display)
//! ```
//!
//! Rendering, query execution and editing stay with the host grid. The
//! engine only talks to them through the traits in [`services`] and
//! [`events`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use datagrid_core::{Column, ColumnType, FilterOperator};
//! use datagrid_filter::{FilterEngine, FilterOutcome, FilterRequest, FilterSettings, GridHost, StaticColumns};
//!
//! let columns = StaticColumns::new(vec![Column::new("CustomerID", ColumnType::String)]);
//! let engine = FilterEngine::new(FilterSettings::default(), GridHost::new(Arc::new(columns))).unwrap();
//!
//! let outcome = smol::block_on(
//!     engine.filter_by_column(FilterRequest::new("CustomerID", FilterOperator::Contains, "VI")),
//! )
//! .unwrap();
//! assert_eq!(outcome, FilterOutcome::Applied);
//! assert_eq!(engine.predicates().len(), 1);
//! ```

pub mod coercion;
mod engine;
pub mod events;
mod filter_bar;
mod format;
pub mod inference;
mod predicate;
pub mod reconcile;
pub mod services;
mod settings;
mod store;

pub use engine::{
    BLANK_FILTER_TEXT, FilterBarValue, FilterEngine, FilterOutcome, INVALID_FILTER_MESSAGE,
};
pub use events::{ActionEvent, ActionEventHandler, ActionKind, FilterAction, NoopActionHandler};
pub use filter_bar::{FilterBar, FilterBarState, FilterKey, render_display_text};
pub use format::DefaultFormatter;
pub use predicate::{FilterInput, FilterPredicate, FilterRequest};
pub use services::{
    ColumnProvider, DataSourceKind, EditGuard, FilterBarDisplay, GridHost, StaticColumns,
    StatusSurface, ValueFormatter,
};
pub use settings::{FilterBarMode, FilterSettings};
pub use store::PredicateStore;
