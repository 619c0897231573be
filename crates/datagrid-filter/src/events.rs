//! Begin/complete action events
//!
//! Every mutating filter operation is wrapped in an event pair. The begin
//! event is cancelable: a handler that sets [`ActionEvent::cancel`] stops the
//! operation before anything is committed, and no complete event follows.

use datagrid_core::Column;
use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::predicate::FilterPredicate;

/// Kind of grid action an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ActionKind {
    /// A column's predicates are being set
    Filtering,
    /// A single column's predicates are being removed
    ClearFiltering,
    /// A batch of columns is being cleared
    Refresh,
}

/// Filter action carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FilterAction {
    Filter,
    ClearFilter,
}

/// Payload of a begin or complete event
///
/// On begin, `columns` is the predicate list as it will be once committed; on
/// complete it is the committed list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    pub request_type: ActionKind,
    pub action: FilterAction,
    pub current_filter_predicate: Option<FilterPredicate>,
    pub current_filter_column: Option<Column>,
    pub columns: Vec<FilterPredicate>,
    pub cancel: bool,
}

impl ActionEvent {
    pub fn new(request_type: ActionKind, action: FilterAction, columns: Vec<FilterPredicate>) -> Self {
        Self {
            request_type,
            action,
            current_filter_predicate: None,
            current_filter_column: None,
            columns,
            cancel: false,
        }
    }

    pub fn with_current(mut self, predicate: Option<FilterPredicate>, column: Option<Column>) -> Self {
        self.current_filter_predicate = predicate;
        self.current_filter_column = column;
        self
    }
}

/// Host callbacks around filter actions
pub trait ActionEventHandler: Send + Sync {
    /// Called before a mutation; set `event.cancel` to stop it
    fn action_begin(&self, _event: &mut ActionEvent) {}

    /// Called after a mutation was committed
    fn action_complete(&self, _event: &ActionEvent) {}
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopActionHandler;

impl ActionEventHandler for NoopActionHandler {}
