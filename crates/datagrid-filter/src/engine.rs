//! Filter engine
//!
//! Owns the predicate store and runs every filter mutation through the same
//! pipeline:
//!
//! 1. resolve the column and coerce the operands
//! 2. build the column's new predicate group
//! 3. await the unsaved-edit gate
//! 4. fire the cancelable begin event
//! 5. commit, publish the pager summary and fire the complete event
//!
//! Malformed input never errors; it ends the pipeline early with a
//! [`FilterOutcome`]. `Err` is reserved for hosts that break a collaborator
//! contract.

use datagrid_core::{Column, FilterValue, LogicalOperator, Result};
use parking_lot::{Mutex, RwLock};
use strum::Display;
use tracing::{debug, info, warn};

use crate::coercion::{Coerced, coerce};
use crate::events::{ActionEvent, ActionKind, FilterAction};
use crate::filter_bar::render_display_text;
use crate::inference::{Inference, infer};
use crate::predicate::{FilterPredicate, FilterRequest};
use crate::reconcile::{FilterOperation, FilterOrigin};
use crate::services::GridHost;
use crate::settings::FilterSettings;
use crate::store::PredicateStore;

/// Status message set when filter input cannot be read as the column's type
pub const INVALID_FILTER_MESSAGE: &str = "Invalid filter value";

/// Pager summary text of a filter on blank values
pub const BLANK_FILTER_TEXT: &str = "(Blanks)";

/// How a filter operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FilterOutcome {
    /// A predicate group was committed
    Applied,
    /// One or more predicate groups were removed
    Cleared,
    /// The store already held the requested state; no events fired
    Unchanged,
    /// Unknown or non-filterable column, filtering disabled, or an incomplete
    /// filter bar token
    Skipped,
    /// The operand could not be coerced; the status message was set
    Invalid,
    /// A begin-event handler canceled the operation
    Canceled,
    /// The unsaved-edit gate refused the operation
    Aborted,
    /// A newer keystroke replaced this debounced evaluation
    Superseded,
}

impl FilterOutcome {
    /// Whether the predicate store was changed
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Applied | Self::Cleared)
    }
}

/// Input coming from a filter bar cell
#[derive(Debug, Clone, PartialEq)]
pub enum FilterBarValue {
    /// Raw typed text; the operator is inferred from it
    Text(String),
    /// Typed value from a picker widget
    Value(FilterValue),
}

#[derive(Debug, Default)]
struct FilterState {
    store: PredicateStore,
    status: Option<String>,
}

/// Filter engine of one grid
pub struct FilterEngine {
    settings: RwLock<FilterSettings>,
    host: GridHost,
    state: Mutex<FilterState>,
}

impl FilterEngine {
    /// Create an engine, hydrating the store from `settings.columns`
    ///
    /// Hydration fires no events. Predicates naming unknown or
    /// non-filterable columns, or holding values the column cannot take, are
    /// dropped with a warning.
    pub fn new(mut settings: FilterSettings, host: GridHost) -> Result<Self> {
        settings.validate()?;
        let initial = std::mem::take(&mut settings.columns);

        let engine = Self {
            settings: RwLock::new(settings),
            host,
            state: Mutex::new(FilterState::default()),
        };
        engine.hydrate(initial);
        Ok(engine)
    }

    fn hydrate(&self, predicates: Vec<FilterPredicate>) {
        if predicates.is_empty() {
            return;
        }

        let mut groups: Vec<(Column, Vec<FilterPredicate>)> = Vec::new();
        for predicate in predicates {
            let Some(column) = self.resolve_column(&predicate.uid, &predicate.field) else {
                warn!(field = %predicate.field, "dropping initial filter for unknown column");
                continue;
            };
            if !column.allow_filtering {
                warn!(field = %column.field, "dropping initial filter for non-filterable column");
                continue;
            }
            match groups.iter_mut().find(|(known, _)| known.field == column.field) {
                Some((_, group)) => group.push(predicate),
                None => groups.push((column, vec![predicate])),
            }
        }

        let mut restored = Vec::new();
        for (column, group) in groups {
            restored.extend(self.restore_group(column, group));
        }
        let store = PredicateStore::from_predicates(restored);

        debug!(predicates = store.len(), "hydrated filter store");
        let fields = store.fields();
        self.state.lock().store = store;

        self.publish_summary();
        for field in fields {
            self.sync_display(&field);
        }
    }

    /// Rebuild a configured group the way `filter_by_column` builds it
    ///
    /// Saved blank groups come back as several blank values (`Missing` is
    /// written as `null`) and are expanded again. Groups mixing operators
    /// never come out of the engine; their predicates are kept one by one.
    fn restore_group(&self, column: Column, group: Vec<FilterPredicate>) -> Vec<FilterPredicate> {
        let Some(first) = group.first().cloned() else {
            return Vec::new();
        };

        let mut values: Vec<FilterValue> = Vec::with_capacity(group.len());
        let mut kept: Vec<FilterPredicate> = Vec::with_capacity(group.len());
        for predicate in &group {
            let value = match coerce(&predicate.value, &column, &*self.host.formatter) {
                Coerced::Value(value) => value,
                Coerced::Clear => FilterValue::Null,
                Coerced::Invalid => {
                    warn!(
                        field = %column.field,
                        kind = predicate.value.kind(),
                        "dropping initial filter with invalid value"
                    );
                    continue;
                }
            };
            if !values.contains(&value) {
                values.push(value.clone());
            }
            kept.push(FilterPredicate {
                value,
                field: column.field.clone(),
                uid: column.uid.clone(),
                column_type: column.column_type,
                case_sensitive: predicate.case_sensitive
                    || !column.column_type.supports_case_folding(),
                ..predicate.clone()
            });
        }
        if values.is_empty() {
            return Vec::new();
        }

        if group.iter().any(|predicate| predicate.operator != first.operator) {
            return kept;
        }

        let blank_expanded = group.len() > 1 && group.iter().all(|p| p.value.is_blank());
        let is_list = !blank_expanded && (values.len() > 1 || first.predicate == LogicalOperator::Or);
        FilterOperation::new(column, first.operator, values, is_list, FilterOrigin::Api)
            .with_predicate(Some(first.predicate))
            .with_case_sensitivity(Some(first.case_sensitive))
            .with_ignore_accent(first.ignore_accent)
            .build_group(self.host.data_source)
    }

    /// Filter `request.field` with the operator and value(s) taken literally
    pub async fn filter_by_column(&self, request: FilterRequest) -> Result<FilterOutcome> {
        let Some(column) = self.filterable_column(&request.field) else {
            return Ok(FilterOutcome::Skipped);
        };

        let mut values = Vec::with_capacity(request.value.values().len());
        for raw in request.value.values() {
            match coerce(raw, &column, &*self.host.formatter) {
                Coerced::Value(value) => values.push(value),
                Coerced::Clear => values.push(FilterValue::Null),
                Coerced::Invalid => {
                    self.report_invalid(&column, raw);
                    return Ok(FilterOutcome::Invalid);
                }
            }
        }
        if values.is_empty() {
            debug!(field = %column.field, "empty value list, nothing to filter");
            return Ok(FilterOutcome::Skipped);
        }

        let ignore_accent = request
            .ignore_accent
            .unwrap_or_else(|| self.settings.read().ignore_accent);
        let operation = FilterOperation::new(
            column,
            request.operator,
            values,
            request.value.is_list(),
            FilterOrigin::Api,
        )
        .with_predicate(request.predicate)
        .with_case_sensitivity(request.case_sensitive)
        .with_ignore_accent(ignore_accent);

        self.execute(operation).await
    }

    /// Filter from a filter bar cell, inferring the operator from typed text
    ///
    /// Empty input removes the column's filter. The cell keeps its raw text
    /// when the input is invalid.
    pub async fn filter_from_bar(&self, field: &str, input: FilterBarValue) -> Result<FilterOutcome> {
        let Some(column) = self.filterable_column(field) else {
            return Ok(FilterOutcome::Skipped);
        };

        let (operator, raw) = match input {
            FilterBarValue::Text(text) => {
                if text.trim().is_empty() {
                    return self.remove_filtered_cols_by_field(field, false).await;
                }
                match infer(&text, &column) {
                    Inference::Operator { operator, value } => (operator, FilterValue::String(value)),
                    Inference::Skip => {
                        debug!(field = %field, text = %text, "incomplete filter token");
                        return Ok(FilterOutcome::Skipped);
                    }
                }
            }
            FilterBarValue::Value(value) => (column.fixed_operator().unwrap_or_default(), value),
        };

        let value = match coerce(&raw, &column, &*self.host.formatter) {
            Coerced::Value(value) => value,
            Coerced::Clear => return self.remove_filtered_cols_by_field(field, false).await,
            Coerced::Invalid => {
                self.report_invalid(&column, &raw);
                return Ok(FilterOutcome::Invalid);
            }
        };

        let ignore_accent = self.settings.read().ignore_accent;
        let operation = FilterOperation::new(
            column,
            operator,
            vec![value],
            false,
            FilterOrigin::FilterBar,
        )
        .with_case_sensitivity(None)
        .with_ignore_accent(ignore_accent);

        self.execute(operation).await
    }

    async fn execute(&self, operation: FilterOperation) -> Result<FilterOutcome> {
        let group = operation.build_group(self.host.data_source);
        let unchanged = self.state.lock().store.group_matches(
            operation.uid(),
            operation.field(),
            &group,
        );
        if unchanged {
            debug!(field = %operation.field(), "filter unchanged");
            return Ok(FilterOutcome::Unchanged);
        }

        if !self.confirm_unsaved_changes().await {
            warn!(field = %operation.field(), "filter aborted by unsaved edits");
            return Ok(FilterOutcome::Aborted);
        }

        // the store may have moved while the edit gate was pending
        let proposed = {
            let state = self.state.lock();
            if state
                .store
                .group_matches(operation.uid(), operation.field(), &group)
            {
                None
            } else {
                let mut proposed = state.store.clone();
                proposed.replace_group(operation.uid(), operation.field(), group.clone());
                Some(proposed)
            }
        };
        let Some(proposed) = proposed else {
            return Ok(FilterOutcome::Unchanged);
        };

        let mut begin = ActionEvent::new(ActionKind::Filtering, FilterAction::Filter, proposed.to_vec())
            .with_current(group.first().cloned(), Some(operation.column.clone()));
        self.host.events.action_begin(&mut begin);
        if begin.cancel {
            info!(field = %operation.field(), "filter canceled by handler");
            if operation.origin == FilterOrigin::FilterBar {
                self.sync_display(operation.field());
            }
            return Ok(FilterOutcome::Canceled);
        }

        let committed = {
            let mut state = self.state.lock();
            state
                .store
                .replace_group(operation.uid(), operation.field(), group.clone());
            state.status = None;
            state.store.to_vec()
        };
        info!(
            field = %operation.field(),
            operator = %operation.operator,
            predicates = group.len(),
            "filter applied"
        );

        self.publish_summary();
        if operation.origin == FilterOrigin::Api {
            self.sync_display(operation.field());
        }

        let complete = ActionEvent::new(ActionKind::Filtering, FilterAction::Filter, committed)
            .with_current(group.first().cloned(), Some(operation.column));
        self.host.events.action_complete(&complete);
        Ok(FilterOutcome::Applied)
    }

    /// Remove the filters of `fields`, or of every filtered column
    ///
    /// Fields without a filter are ignored. The whole batch runs inside one
    /// `Refresh` begin/complete pair and resets the filter bar text of every
    /// cleared column.
    pub async fn clear_filter(&self, fields: Option<&[&str]>) -> Result<FilterOutcome> {
        let targets: Vec<String> = {
            let filtered = self.state.lock().store.fields();
            match fields {
                None => filtered,
                Some(requested) => filtered
                    .into_iter()
                    .filter(|field| requested.contains(&field.as_str()))
                    .collect(),
            }
        };
        if targets.is_empty() {
            debug!("no filtered columns to clear");
            return Ok(FilterOutcome::Unchanged);
        }

        if !self.confirm_unsaved_changes().await {
            warn!(fields = ?targets, "clear aborted by unsaved edits");
            return Ok(FilterOutcome::Aborted);
        }

        let proposed = {
            let mut proposed = self.state.lock().store.clone();
            for field in &targets {
                let uid = group_uid(&proposed, field);
                proposed.remove_group(&uid, field);
            }
            proposed.to_vec()
        };

        let mut begin = ActionEvent::new(ActionKind::Refresh, FilterAction::ClearFilter, proposed);
        self.host.events.action_begin(&mut begin);
        if begin.cancel {
            info!(fields = ?targets, "clear canceled by handler");
            return Ok(FilterOutcome::Canceled);
        }

        for field in &targets {
            self.remove_field(field, true);
        }
        self.state.lock().status = None;
        info!(fields = ?targets, "filters cleared");

        self.publish_summary();
        let complete = ActionEvent::new(ActionKind::Refresh, FilterAction::ClearFilter, self.predicates());
        self.host.events.action_complete(&complete);
        Ok(FilterOutcome::Cleared)
    }

    /// Remove the filter of a single column
    ///
    /// With `is_clear_filter_bar` the column's filter bar text is reset too,
    /// when the host has a filter bar; otherwise the text is left as the
    /// user typed it.
    pub async fn remove_filtered_cols_by_field(
        &self,
        field: &str,
        is_clear_filter_bar: bool,
    ) -> Result<FilterOutcome> {
        let (uid, proposed, removed) = {
            let state = self.state.lock();
            if !state.store.contains_field(field) {
                return Ok(FilterOutcome::Unchanged);
            }
            let uid = group_uid(&state.store, field);
            let mut proposed = state.store.clone();
            let removed = proposed.remove_group(&uid, field);
            (uid, proposed.to_vec(), removed)
        };

        if !self.confirm_unsaved_changes().await {
            warn!(field = %field, "clear aborted by unsaved edits");
            return Ok(FilterOutcome::Aborted);
        }

        let column = self.resolve_column(&uid, field);
        let mut begin = ActionEvent::new(ActionKind::ClearFiltering, FilterAction::ClearFilter, proposed)
            .with_current(removed.first().cloned(), column.clone());
        self.host.events.action_begin(&mut begin);
        if begin.cancel {
            info!(field = %field, "clear canceled by handler");
            return Ok(FilterOutcome::Canceled);
        }

        self.remove_field(field, is_clear_filter_bar);
        self.state.lock().status = None;
        info!(field = %field, "filter cleared");

        self.publish_summary();
        let complete = ActionEvent::new(
            ActionKind::ClearFiltering,
            FilterAction::ClearFilter,
            self.predicates(),
        )
        .with_current(removed.first().cloned(), column);
        self.host.events.action_complete(&complete);
        Ok(FilterOutcome::Cleared)
    }

    /// Remove a column's group without firing events
    fn remove_field(&self, field: &str, clear_bar: bool) {
        let removed = {
            let mut state = self.state.lock();
            let uid = group_uid(&state.store, field);
            state.store.remove_group(&uid, field)
        };
        debug!(field = %field, predicates = removed.len(), "removed filter group");

        if clear_bar {
            match &self.host.filter_bar {
                Some(display) => display.set_display_value(field, ""),
                None => debug!(field = %field, "no filter bar display to reset"),
            }
        }
    }

    /// Drop predicates whose column left the grid
    ///
    /// Predicates follow their column through renames by uid. Returns how
    /// many predicates were dropped.
    pub fn prune_orphans(&self) -> usize {
        let columns = self.host.columns.columns();
        let dropped = self.state.lock().store.retain_mut(|predicate| {
            if let Some(column) = columns
                .iter()
                .find(|column| !predicate.uid.is_empty() && column.uid == predicate.uid)
            {
                predicate.field = column.field.clone();
                return true;
            }
            columns.iter().any(|column| column.field == predicate.field)
        });

        if dropped > 0 {
            info!(dropped, "pruned orphaned filters");
            self.publish_summary();
        }
        dropped
    }

    /// Settings snapshot, with the active predicates in `columns`
    pub fn filter_settings(&self) -> FilterSettings {
        let mut settings = self.settings.read().clone();
        settings.columns = self.predicates();
        settings
    }

    /// Turn filtering on or off; existing predicates stay in place
    pub fn set_enabled(&self, enabled: bool) {
        self.settings.write().enabled = enabled;
    }

    pub fn predicates(&self) -> Vec<FilterPredicate> {
        self.state.lock().store.to_vec()
    }

    /// Predicates of one column
    pub fn predicates_for(&self, field: &str) -> Vec<FilterPredicate> {
        let uid = self.column(field).map(|column| column.uid).unwrap_or_default();
        self.state.lock().store.group(&uid, field)
    }

    /// Last invalid-input message, cleared by the next committed change
    pub fn status_message(&self) -> Option<String> {
        self.state.lock().status.clone()
    }

    pub fn column(&self, field: &str) -> Option<Column> {
        self.host.columns.column(field)
    }

    pub fn host(&self) -> &GridHost {
        &self.host
    }

    /// Text the filter bar shows for the stored filter of `field`
    pub fn display_text(&self, field: &str) -> String {
        let Some(column) = self.column(field) else {
            return String::new();
        };
        let group = self.state.lock().store.group(&column.uid, field);
        render_display_text(&group, &column, &*self.host.formatter)
    }

    /// Pager summary of the active filters, `Header: v1, v2 && Header: v3`
    pub fn summary(&self) -> String {
        let predicates = self.predicates();
        let mut fields: Vec<&str> = Vec::new();
        for predicate in &predicates {
            if !fields.contains(&predicate.field.as_str()) {
                fields.push(&predicate.field);
            }
        }

        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let column = self.column(field);
            let header = column.as_ref().map_or(field, |column| column.header_text.as_str());
            let format = column.as_ref().and_then(|column| column.format.as_ref());

            let mut values: Vec<String> = Vec::new();
            for predicate in predicates.iter().filter(|p| p.field == field) {
                let text = match &predicate.value {
                    FilterValue::Missing => continue,
                    value if value.is_blank() => BLANK_FILTER_TEXT.to_string(),
                    value => self.host.formatter.to_view(value, format),
                };
                if !values.contains(&text) {
                    values.push(text);
                }
            }
            parts.push(format!("{}: {}", header, values.join(", ")));
        }
        parts.join(" && ")
    }

    fn publish_summary(&self) {
        if let Some(status) = &self.host.status {
            status.set_pager_message(&self.summary());
        }
    }

    fn report_invalid(&self, column: &Column, raw: &FilterValue) {
        debug!(field = %column.field, kind = raw.kind(), "invalid filter value");
        self.state.lock().status = Some(INVALID_FILTER_MESSAGE.to_string());

        let show = self.settings.read().show_filter_bar_status;
        if show && let Some(status) = &self.host.status {
            status.set_pager_message(INVALID_FILTER_MESSAGE);
        }
    }

    fn sync_display(&self, field: &str) {
        if let Some(display) = &self.host.filter_bar {
            display.set_display_value(field, &self.display_text(field));
        }
    }

    /// `false` only when the edit guard explicitly refuses
    async fn confirm_unsaved_changes(&self) -> bool {
        match &self.host.edit_guard {
            Some(guard) => guard.check_unsaved_changes().await != Some(false),
            None => true,
        }
    }

    fn filterable_column(&self, field: &str) -> Option<Column> {
        if !self.settings.read().enabled {
            debug!(field = %field, "filtering disabled");
            return None;
        }
        match self.column(field) {
            Some(column) if column.allow_filtering => Some(column),
            Some(_) => {
                debug!(field = %field, "column does not allow filtering");
                None
            }
            None => {
                debug!(field = %field, "unknown filter column");
                None
            }
        }
    }

    /// Find a column by uid first, then by field
    fn resolve_column(&self, uid: &str, field: &str) -> Option<Column> {
        if !uid.is_empty()
            && let Some(column) = self
                .host
                .columns
                .columns()
                .into_iter()
                .find(|column| column.uid == uid)
        {
            return Some(column);
        }
        self.column(field)
    }
}

/// Uid shared by the predicates stored for `field`
fn group_uid(store: &PredicateStore, field: &str) -> String {
    store
        .iter()
        .find(|predicate| predicate.field == field)
        .map(|predicate| predicate.uid.clone())
        .unwrap_or_default()
}
