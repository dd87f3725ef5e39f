//! Per-instance state of an editable data table.
//!
//! A table starts [`DataTableState::Empty`] and becomes
//! [`DataTableState::Loaded`] once a snapshot arrives. A loaded table owns
//! the snapshot, the rows selected for deletion, the new-row draft, and the
//! submit currently in flight. Nothing here touches the network: submits
//! produce a [`SubmitPlan`] for the caller to send, and the caller reports
//! the result back through [`DataTableState::finish`].

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{parse_input, FieldError};
use crate::model::{CellValue, RowId, TableSnapshot};
use crate::requests::{expand_route, Method, Payload, RequestError};

use super::TableConfig;

/// Row ids marked for deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet(BTreeSet<RowId>);

impl SelectionSet {
    /// Marks `id`; returns `false` when it was already marked.
    pub fn insert(&mut self, id: RowId) -> bool {
        self.0.insert(id)
    }

    /// Unmarks `id`; returns `false` when it was not marked.
    pub fn remove(&mut self, id: RowId) -> bool {
        self.0.remove(&id)
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id)
        }
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Marked ids in ascending order, which is also the order they are sent
    /// in a delete payload.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<RowId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = RowId>>(iter: T) -> Self {
        SelectionSet(iter.into_iter().collect())
    }
}

/// Pending values of a row that has not been submitted yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRow(BTreeMap<String, CellValue>);

impl DraftRow {
    /// Stores `value` for `column`, replacing any earlier value.
    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.0.insert(column.into(), value);
    }

    /// Drops `column` from the draft and hands back its value.
    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.0.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column/value pairs ordered by column name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// The submit a table is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Add,
    Delete,
}

/// A request the table wants sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPlan {
    pub action: PendingAction,
    pub route: String,
    pub method: Method,
    pub payload: Payload,
}

/// A table with a snapshot, plus everything the user has done to it since
/// it was loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    snapshot: TableSnapshot,
    selection: SelectionSet,
    draft: DraftRow,
    raw_inputs: BTreeMap<String, String>,
    field_errors: BTreeMap<String, FieldError>,
    pending: Option<PendingAction>,
}

impl LoadedTable {
    /// Wraps `snapshot` with nothing selected, an empty draft and no submit
    /// in flight.
    pub fn new(snapshot: TableSnapshot) -> Self {
        LoadedTable {
            snapshot,
            selection: SelectionSet::default(),
            draft: DraftRow::default(),
            raw_inputs: BTreeMap::new(),
            field_errors: BTreeMap::new(),
            pending: None,
        }
    }

    pub fn snapshot(&self) -> &TableSnapshot {
        &self.snapshot
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn draft(&self) -> &DraftRow {
        &self.draft
    }

    /// What the user last typed into `column`'s input, valid or not.
    pub fn raw_input(&self, column: &str) -> Option<&str> {
        self.raw_inputs.get(column).map(String::as_str)
    }

    /// Why the last input for `column` was rejected, if it was.
    pub fn field_error(&self, column: &str) -> Option<&FieldError> {
        self.field_errors.get(column)
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    /// Flips selection of row `id`. Ids with no row in the snapshot are
    /// ignored; returns whether anything changed.
    pub fn toggle_select(&mut self, id: RowId) -> bool {
        if !self.snapshot.contains_row(id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Records user input for `column` in the draft.
    ///
    /// Blank input removes the column from the draft. Input that does not
    /// parse for the column's declared type also removes it and leaves a
    /// field error behind until the column is edited again.
    pub fn edit_draft(
        &mut self,
        config: &TableConfig,
        column: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        let dtype = self
            .snapshot
            .dtype(column)
            .ok_or_else(|| FieldError::UnknownColumn(column.to_string()))?;
        if !config.is_editable(column) {
            return Err(FieldError::NotEditable(column.to_string()));
        }

        if raw.is_empty() {
            self.raw_inputs.remove(column);
        } else {
            self.raw_inputs.insert(column.to_string(), raw.to_string());
        }

        match parse_input(dtype, raw) {
            Ok(Some(value)) => {
                self.draft.set(column, value);
                self.field_errors.remove(column);
                Ok(())
            }
            Ok(None) => {
                self.draft.remove(column);
                self.field_errors.remove(column);
                Ok(())
            }
            Err(err) => {
                self.draft.remove(column);
                self.field_errors.insert(column.to_string(), err.clone());
                Err(err)
            }
        }
    }

    /// Marks `column` as holding input its control could not read.
    ///
    /// Browsers report an empty value for unparseable text in a number input;
    /// this keeps that from reading as a blank field. The column leaves the
    /// draft, its last raw input is kept, and an [`FieldError::Unreadable`]
    /// blocks add until the column is edited again.
    pub fn reject_input(&mut self, config: &TableConfig, column: &str) -> Result<(), FieldError> {
        if self.snapshot.dtype(column).is_none() {
            return Err(FieldError::UnknownColumn(column.to_string()));
        }
        if !config.is_editable(column) {
            return Err(FieldError::NotEditable(column.to_string()));
        }
        self.draft.remove(column);
        self.field_errors
            .insert(column.to_string(), FieldError::Unreadable);
        Ok(())
    }

    /// Delete is enabled while rows are selected and nothing is in flight.
    pub fn can_delete(&self) -> bool {
        self.pending.is_none() && !self.selection.is_empty()
    }

    /// Add is enabled while the draft has values, none of its inputs were
    /// rejected, and nothing is in flight.
    pub fn can_add(&self) -> bool {
        self.pending.is_none() && !self.draft.is_empty() && self.field_errors.is_empty()
    }

    /// Plans a `DELETE` of the selected ids, or `None` when disabled.
    pub fn submit_delete(&mut self, config: &TableConfig) -> Option<SubmitPlan> {
        if !config.selectable || !self.can_delete() {
            return None;
        }
        self.pending = Some(PendingAction::Delete);
        Some(SubmitPlan {
            action: PendingAction::Delete,
            route: config.route.clone(),
            method: Method::Delete,
            payload: Payload::from_ids(&self.selection),
        })
    }

    /// Plans a `POST` of the draft, or `None` when disabled.
    pub fn submit_add(&mut self, config: &TableConfig) -> Result<Option<SubmitPlan>, RequestError> {
        if !config.editable || !self.can_add() {
            return Ok(None);
        }
        let mut payload = Payload::from_draft(&self.draft);
        let route = expand_route(&config.route, &mut payload, &config.url_segment_fields)?;
        self.pending = Some(PendingAction::Add);
        Ok(Some(SubmitPlan {
            action: PendingAction::Add,
            route,
            method: Method::Post,
            payload,
        }))
    }

    /// Applies the result of a submit.
    ///
    /// # Arguments
    ///
    /// * `action` - The action the reply answers.
    /// * `succeeded` - Whether the backend accepted it.
    ///
    /// # Returns
    ///
    /// `true` when the table must be reloaded. A reply for an action that is
    /// not the one in flight changes nothing and returns `false`, so a late
    /// answer cannot clear a newer selection or draft. A failed submit keeps
    /// the selection and the draft.
    pub fn finish(&mut self, action: PendingAction, succeeded: bool) -> bool {
        if self.pending != Some(action) {
            return false;
        }
        self.pending = None;
        if !succeeded {
            return false;
        }
        match action {
            PendingAction::Delete => self.selection.clear(),
            PendingAction::Add => {
                self.draft.clear();
                self.raw_inputs.clear();
                self.field_errors.clear();
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DataTableState {
    #[default]
    Empty,
    Loaded(LoadedTable),
}

impl DataTableState {
    pub fn new() -> Self {
        DataTableState::Empty
    }

    /// Replaces whatever was shown with `snapshot`; selection and draft
    /// start out empty.
    pub fn load(&mut self, snapshot: TableSnapshot) {
        *self = DataTableState::Loaded(LoadedTable::new(snapshot));
    }

    pub fn loaded(&self) -> Option<&LoadedTable> {
        match self {
            DataTableState::Loaded(table) => Some(table),
            DataTableState::Empty => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    pub fn toggle_select(&mut self, id: RowId) -> bool {
        match self {
            DataTableState::Loaded(table) => table.toggle_select(id),
            DataTableState::Empty => false,
        }
    }

    pub fn edit_draft(
        &mut self,
        config: &TableConfig,
        column: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        match self {
            DataTableState::Loaded(table) => table.edit_draft(config, column, raw),
            DataTableState::Empty => Err(FieldError::UnknownColumn(column.to_string())),
        }
    }

    pub fn reject_input(&mut self, config: &TableConfig, column: &str) -> Result<(), FieldError> {
        match self {
            DataTableState::Loaded(table) => table.reject_input(config, column),
            DataTableState::Empty => Err(FieldError::UnknownColumn(column.to_string())),
        }
    }

    pub fn submit_delete(&mut self, config: &TableConfig) -> Option<SubmitPlan> {
        match self {
            DataTableState::Loaded(table) => table.submit_delete(config),
            DataTableState::Empty => None,
        }
    }

    pub fn submit_add(&mut self, config: &TableConfig) -> Result<Option<SubmitPlan>, RequestError> {
        match self {
            DataTableState::Loaded(table) => table.submit_add(config),
            DataTableState::Empty => Ok(None),
        }
    }

    pub fn finish(&mut self, action: PendingAction, succeeded: bool) -> bool {
        match self {
            DataTableState::Loaded(table) => table.finish(action, succeeded),
            DataTableState::Empty => false,
        }
    }
}
