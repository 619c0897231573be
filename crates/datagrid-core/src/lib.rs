//! Datagrid Core - Shared vocabulary for the data grid
//!
//! This crate provides the types every other datagrid crate depends on:
//!
//! - `Column` - Column descriptor as the host grid exposes it
//! - `ColumnType` / `FilterValue` - Declared column types and typed filter values
//! - `FilterOperator` / `LogicalOperator` - Comparison operators and connectives
//! - `GridError` - Error type for contract violations

mod column;
mod error;
mod operator;
mod types;

pub use column::*;
pub use error::*;
pub use operator::*;
pub use types::*;
