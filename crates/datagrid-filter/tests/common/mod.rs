//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;

use datagrid_core::{Column, ColumnType};
use datagrid_filter::{
    ActionEvent, ActionEventHandler, ActionKind, DataSourceKind, EditGuard, FilterBarState,
    FilterEngine, FilterSettings, GridHost, StaticColumns, StatusSurface,
};

/// Initialize logging for tests if not already initialized
pub fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("datagrid_filter=debug".parse().unwrap()),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Event handler that records every event and can cancel begin events
#[derive(Default)]
pub struct RecordingEvents {
    pub begins: parking_lot::Mutex<Vec<ActionEvent>>,
    pub completes: parking_lot::Mutex<Vec<ActionEvent>>,
    cancel: parking_lot::Mutex<bool>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cancel(&self, cancel: bool) {
        *self.cancel.lock() = cancel;
    }

    pub fn begin_kinds(&self) -> Vec<ActionKind> {
        self.begins.lock().iter().map(|e| e.request_type).collect()
    }

    pub fn complete_kinds(&self) -> Vec<ActionKind> {
        self.completes.lock().iter().map(|e| e.request_type).collect()
    }

    pub fn begin_count(&self) -> usize {
        self.begins.lock().len()
    }

    pub fn complete_count(&self) -> usize {
        self.completes.lock().len()
    }

    pub fn reset(&self) {
        self.begins.lock().clear();
        self.completes.lock().clear();
    }
}

impl ActionEventHandler for RecordingEvents {
    fn action_begin(&self, event: &mut ActionEvent) {
        event.cancel = *self.cancel.lock();
        self.begins.lock().push(event.clone());
    }

    fn action_complete(&self, event: &ActionEvent) {
        self.completes.lock().push(event.clone());
    }
}

/// Edit guard answering from a script, then `None` once the script runs out
#[derive(Default)]
pub struct ScriptedEditGuard {
    answers: parking_lot::Mutex<VecDeque<Option<bool>>>,
    pub calls: parking_lot::Mutex<usize>,
}

impl ScriptedEditGuard {
    pub fn new(answers: Vec<Option<bool>>) -> Self {
        Self {
            answers: parking_lot::Mutex::new(answers.into()),
            calls: parking_lot::Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl EditGuard for ScriptedEditGuard {
    async fn check_unsaved_changes(&self) -> Option<bool> {
        *self.calls.lock() += 1;
        let answer = self.answers.lock().pop_front();
        answer.flatten()
    }
}

/// Status surface keeping every pager message
#[derive(Default)]
pub struct RecordingStatus {
    pub messages: parking_lot::Mutex<Vec<String>>,
}

impl RecordingStatus {
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }
}

impl StatusSurface for RecordingStatus {
    fn set_pager_message(&self, text: &str) {
        self.messages.lock().push(text.to_string());
    }
}

/// Columns of the orders grid used across the tests
pub fn order_columns() -> Vec<Column> {
    vec![
        Column::new("OrderID", ColumnType::Number).with_uid("col-order-id"),
        Column::new("CustomerID", ColumnType::String)
            .with_uid("col-customer-id")
            .with_header("Customer ID"),
        Column::new("Freight", ColumnType::Number)
            .with_uid("col-freight")
            .with_format("N2"),
        Column::new("OrderDate", ColumnType::Date).with_uid("col-order-date"),
        Column::new("ShipRegion", ColumnType::String).with_uid("col-ship-region"),
        Column::new("Verified", ColumnType::Boolean).with_uid("col-verified"),
        Column::new("ShipCountry", ColumnType::String)
            .with_uid("col-ship-country")
            .with_filtering(false),
    ]
}

/// An engine wired to recording collaborators
pub struct TestGrid {
    pub engine: Arc<FilterEngine>,
    pub columns: Arc<StaticColumns>,
    pub events: Arc<RecordingEvents>,
    pub status: Arc<RecordingStatus>,
    pub display: Arc<FilterBarState>,
}

pub struct TestGridBuilder {
    settings: FilterSettings,
    guard: Option<Arc<ScriptedEditGuard>>,
    data_source: DataSourceKind,
    with_display: bool,
}

impl TestGridBuilder {
    pub fn new() -> Self {
        Self {
            settings: FilterSettings::default(),
            guard: None,
            data_source: DataSourceKind::Local,
            with_display: true,
        }
    }

    pub fn settings(mut self, settings: FilterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn guard(mut self, guard: Arc<ScriptedEditGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn data_source(mut self, data_source: DataSourceKind) -> Self {
        self.data_source = data_source;
        self
    }

    pub fn without_display(mut self) -> Self {
        self.with_display = false;
        self
    }

    pub fn build(self) -> TestGrid {
        initialize_logging();

        let columns = Arc::new(StaticColumns::new(order_columns()));
        let events = Arc::new(RecordingEvents::new());
        let status = Arc::new(RecordingStatus::default());
        let display = Arc::new(FilterBarState::new());

        let mut host = GridHost::new(columns.clone())
            .with_events(events.clone())
            .with_status_surface(status.clone())
            .with_data_source(self.data_source);
        if self.with_display {
            host = host.with_filter_bar_display(display.clone());
        }
        if let Some(guard) = self.guard {
            host = host.with_edit_guard(guard);
        }

        let engine = Arc::new(FilterEngine::new(self.settings, host).unwrap());
        TestGrid {
            engine,
            columns,
            events,
            status,
            display,
        }
    }
}

pub fn grid() -> TestGrid {
    TestGridBuilder::new().build()
}
