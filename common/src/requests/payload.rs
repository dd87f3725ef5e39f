//! Request payloads: a JSON object plus the shapes the pages build it from.
//!
//! Three sources feed a payload:
//!
//! - **Forms**: login and signup copy every named field verbatim, so the
//!   backend receives exactly what was typed, empty fields included.
//! - **Selections**: a delete sends the selected row ids as `{"id": [...]}`.
//! - **Drafts**: an add sends the draft row with values already typed by the
//!   column's declared type (numbers as JSON numbers, mapping labels as
//!   their codes).
//!
//! The [`RequestBuilder`](super::RequestBuilder) then decides whether the
//! payload travels as a query string or as a JSON body.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::ID_FIELD;
use crate::table::{DraftRow, SelectionSet};

/// The JSON object sent with a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// An empty payload. Sent as `{}` in a body and as no query at all on `GET`.
    pub fn new() -> Self {
        Payload(Map::new())
    }

    /// Wraps a JSON object. `None` for any other JSON value.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Payload(map)),
            _ => None,
        }
    }

    /// Copies every named form field verbatim.
    ///
    /// Values stay strings and empty fields are kept. A repeated name keeps
    /// the last value.
    pub fn from_form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = fields
            .into_iter()
            .map(|(key, value)| (key.into(), Value::String(value.into())))
            .collect();
        Payload(map)
    }

    /// Builds the delete payload for a selection.
    ///
    /// # Arguments
    /// * `ids` - The rows marked for deletion.
    ///
    /// # Returns
    /// `{"id": [...]}` in the selection's iteration order, which is ascending.
    /// An empty selection still yields `{"id": []}`.
    pub fn from_ids(ids: &SelectionSet) -> Self {
        let list = ids.iter().map(|id| Value::from(*id)).collect();
        let mut map = Map::new();
        map.insert(ID_FIELD.to_string(), Value::Array(list));
        Payload(map)
    }

    /// Builds the add payload for a draft row.
    ///
    /// Whole numbers come out as JSON integers so that ids and codes reach
    /// the backend as `7`, not `7.0`.
    ///
    /// # Arguments
    /// * `draft` - The values entered in the new-row line.
    ///
    /// # Returns
    /// One entry per draft column, ordered by column name.
    pub fn from_draft(draft: &DraftRow) -> Self {
        let map = draft
            .iter()
            .map(|(column, value)| (column.clone(), value.to_json()))
            .collect();
        Payload(map)
    }

    /// Sets `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Takes `key` out of the payload. Route expansion uses this to move
    /// url-segment fields from the body into the path.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Compact JSON text of the payload, as sent in a request body.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use serde_json::json;

    #[test]
    fn form_fields_are_copied_verbatim() {
        let payload = Payload::from_form([
            ("username", "kim"),
            ("password", " secret "),
            ("nickname", ""),
        ]);
        assert_eq!(payload.len(), 3);
        assert_eq!(payload.get("password"), Some(&json!(" secret ")));
        assert_eq!(payload.get("nickname"), Some(&json!("")));
    }

    #[test]
    fn ids_payload_lists_every_selected_id() {
        let mut ids = SelectionSet::default();
        for id in [5, 2, 9] {
            ids.insert(id);
        }
        let payload = Payload::from_ids(&ids);
        let listed = payload.get("id").and_then(Value::as_array).unwrap();
        assert_eq!(listed.len(), ids.len());
        let expected: Vec<Value> = ids.iter().map(|id| json!(id)).collect();
        assert_eq!(listed, &expected);
    }

    #[test]
    fn empty_selection_gives_empty_list() {
        let payload = Payload::from_ids(&SelectionSet::default());
        assert_eq!(payload.to_json_string().unwrap(), r#"{"id":[]}"#);
    }

    #[test]
    fn draft_keeps_numbers_as_numbers() {
        let mut draft = DraftRow::default();
        draft.set("amount", CellValue::Number(3.5));
        draft.set("name", CellValue::Text("B".to_string()));
        let payload = Payload::from_draft(&draft);
        assert_eq!(payload.get("amount"), Some(&json!(3.5)));
        assert_eq!(payload.get("name"), Some(&json!("B")));
    }

    #[test]
    fn empty_payload_serializes_to_empty_object() {
        assert_eq!(Payload::new().to_json_string().unwrap(), "{}");
        assert!(Payload::from_json(json!([1])).is_none());
    }
}
