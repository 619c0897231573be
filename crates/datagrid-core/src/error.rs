//! Error types for the datagrid

use thiserror::Error;

/// Core error type for datagrid operations
///
/// Malformed end-user input never produces one of these; they signal that a
/// host supplied a broken configuration.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for datagrid operations
pub type Result<T> = std::result::Result<T, GridError>;
