//! Filter bar widget contract
//!
//! The filter bar is the row of per-column inputs under the grid header.
//! [`FilterBar`] turns key and picker events into engine calls, debouncing
//! keystrokes in immediate mode. [`FilterBarState`] holds the text each cell
//! displays and is the [`FilterBarDisplay`] the engine writes back through.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use datagrid_core::{Column, ColumnType, FilterValue, Result};
use futures::FutureExt;
use futures::future::{AbortHandle, Abortable, BoxFuture};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::engine::{FilterBarValue, FilterEngine, FilterOutcome};
use crate::predicate::FilterPredicate;
use crate::services::{FilterBarDisplay, ValueFormatter};
use crate::settings::FilterBarMode;

/// Displayed text of every filter bar cell
#[derive(Debug, Default)]
pub struct FilterBarState {
    values: RwLock<HashMap<String, String>>,
}

impl FilterBarState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilterBarDisplay for FilterBarState {
    fn display_value(&self, field: &str) -> Option<String> {
        self.values.read().get(field).cloned()
    }

    fn set_display_value(&self, field: &str, text: &str) {
        self.values.write().insert(field.to_string(), text.to_string());
    }
}

/// Key released in a filter bar cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Enter,
    Char(char),
    Backspace,
    Delete,
}

struct PendingEvaluation {
    generation: u64,
    handle: AbortHandle,
}

/// Input handling for the filter bar row
///
/// Futures returned by the handlers are driven by the host on its UI
/// executor. At most one debounced evaluation is pending per column.
pub struct FilterBar {
    engine: Arc<FilterEngine>,
    state: Arc<FilterBarState>,
    pending: Arc<Mutex<HashMap<String, PendingEvaluation>>>,
    generation: AtomicU64,
}

impl FilterBar {
    /// `state` should be the display registered on the engine's host, so
    /// the engine's writes show up in the cells
    pub fn new(engine: Arc<FilterEngine>, state: Arc<FilterBarState>) -> Self {
        Self {
            engine,
            state,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Handle a key release with the cell's current `text`
    ///
    /// Returns the evaluation to run, or `None` when the key does not filter.
    pub fn on_key_up(
        &self,
        field: &str,
        key: FilterKey,
        text: &str,
    ) -> Option<BoxFuture<'static, Result<FilterOutcome>>> {
        self.state.set_display_value(field, text);

        let column = self.engine.column(field)?;
        if column.filter.template {
            return None;
        }

        if key == FilterKey::Enter {
            self.cancel_pending(field);
            return Some(self.evaluate(field, FilterBarValue::Text(text.to_string())));
        }

        let settings = self.engine.filter_settings();
        match settings.mode {
            FilterBarMode::OnEnter => None,
            FilterBarMode::Immediate => {
                Some(self.debounce(field, text.to_string(), settings.immediate_delay()))
            }
        }
    }

    /// Handle a typed value picked in a number or date widget
    pub fn on_value_change(
        &self,
        field: &str,
        value: FilterValue,
    ) -> BoxFuture<'static, Result<FilterOutcome>> {
        self.cancel_pending(field);
        self.state.set_display_value(field, &value.to_string());
        self.evaluate(field, FilterBarValue::Value(value))
    }

    /// Abort the pending debounced evaluation of `field`, if any
    pub fn cancel_pending(&self, field: &str) -> bool {
        match self.pending.lock().remove(field) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn has_pending(&self, field: &str) -> bool {
        self.pending.lock().contains_key(field)
    }

    pub fn display_value(&self, field: &str) -> Option<String> {
        self.state.display_value(field)
    }

    fn evaluate(&self, field: &str, input: FilterBarValue) -> BoxFuture<'static, Result<FilterOutcome>> {
        let engine = self.engine.clone();
        let field = field.to_string();
        async move { engine.filter_from_bar(&field, input).await }.boxed()
    }

    fn debounce(
        &self,
        field: &str,
        text: String,
        delay: Duration,
    ) -> BoxFuture<'static, Result<FilterOutcome>> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self
            .pending
            .lock()
            .insert(field.to_string(), PendingEvaluation { generation, handle })
        {
            previous.handle.abort();
        }

        let timer = Abortable::new(smol::Timer::after(delay), registration);
        let engine = self.engine.clone();
        let pending = self.pending.clone();
        let field = field.to_string();

        async move {
            if timer.await.is_err() {
                debug!(field = %field, "debounced filter superseded");
                return Ok(FilterOutcome::Superseded);
            }

            {
                let mut pending = pending.lock();
                if pending
                    .get(&field)
                    .is_some_and(|entry| entry.generation == generation)
                {
                    pending.remove(&field);
                }
            }
            engine.filter_from_bar(&field, FilterBarValue::Text(text)).await
        }
        .boxed()
    }
}

/// Filter bar text for a stored predicate group
///
/// Comparison operators on number and date columns get their typed prefix
/// back (`>=40`); list groups join their values with `, `.
pub fn render_display_text(
    group: &[FilterPredicate],
    column: &Column,
    formatter: &dyn ValueFormatter,
) -> String {
    let Some(first) = group.first() else {
        return String::new();
    };
    if first.value.is_null() {
        return String::new();
    }

    let values: Vec<String> = group
        .iter()
        .filter(|predicate| predicate.value != FilterValue::Missing)
        .map(|predicate| formatter.to_view(&predicate.value, column.format.as_ref()))
        .collect();

    let prefix = if column.column_type.is_date() || column.column_type == ColumnType::Number {
        first.operator.bar_symbol().unwrap_or_default()
    } else {
        ""
    };
    format!("{}{}", prefix, values.join(", "))
}
