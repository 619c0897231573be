//! Filter settings
//!
//! Persisted as camel-case JSON so a grid's initial filter state can live in
//! a plain configuration file next to its column definitions.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use datagrid_core::GridError;
use serde::{Deserialize, Serialize};

use crate::predicate::FilterPredicate;

/// When the filter bar evaluates its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterBarMode {
    /// Only the Enter key filters
    #[default]
    OnEnter,
    /// Every keystroke filters after `immediate_mode_delay`
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSettings {
    /// Global switch; a disabled grid ignores every filter request
    pub enabled: bool,
    pub mode: FilterBarMode,
    /// Debounce delay in milliseconds for [`FilterBarMode::Immediate`]
    pub immediate_mode_delay: u64,
    /// Show invalid-input messages on the pager
    pub show_filter_bar_status: bool,
    /// Default accent handling for new predicates
    pub ignore_accent: bool,
    /// Active predicates; initial predicates when loaded from configuration
    pub columns: Vec<FilterPredicate>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: FilterBarMode::OnEnter,
            immediate_mode_delay: 1500,
            show_filter_bar_status: true,
            ignore_accent: false,
            columns: Vec::new(),
        }
    }
}

impl FilterSettings {
    pub fn immediate_delay(&self) -> Duration {
        Duration::from_millis(self.immediate_mode_delay)
    }

    /// Check the settings for combinations the filter bar cannot honor
    pub fn validate(&self) -> datagrid_core::Result<()> {
        if self.mode == FilterBarMode::Immediate && self.immediate_mode_delay == 0 {
            return Err(GridError::Configuration(
                "immediate filter mode needs a non-zero immediateModeDelay".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(json).with_context(|| "Failed to parse filter settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No filter settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter settings from {:?}", path))?;
        Self::from_json_str(&content)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write filter settings to {:?}", path))?;

        tracing::debug!("Saved filter settings to {:?}", path);
        Ok(())
    }
}
