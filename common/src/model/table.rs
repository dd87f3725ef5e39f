//! Table snapshots: the validated form of a `{columns, data, dtypes}` payload.
//!
//! A [`TableSnapshot`] is only ever built by [`TableSnapshot::from_json`],
//! which checks the whole payload before anything is kept. A snapshot is
//! immutable; a reload replaces it wholesale.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use super::dtype::DeclaredType;

/// Identity of a row, taken from its numeric `id` field.
pub type RowId = i64;

/// Name of the field every row must carry.
pub const ID_FIELD: &str = "id";

/// A single cell: the backend only sends strings and numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    /// Reads a JSON scalar. `None` for anything but a string or a finite number.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(CellValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(CellValue::Number),
            _ => None,
        }
    }

    /// Whole numbers serialize as JSON integers so that codes and ids stay `7`,
    /// not `7.0`.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                Value::from(*n as i64)
            }
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => n.fmt(f),
            CellValue::Text(s) => s.fmt(f),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One column: its name and declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub dtype: DeclaredType,
}

/// One data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    values: BTreeMap<String, CellValue>,
}

impl Row {
    /// The row's `id`, unique within its snapshot.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// The cell stored for `column`. Every declared column has one.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }
}

/// Why a payload was not accepted as a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("table payload is not a JSON object")]
    NotAnObject,
    #[error("`columns` must be a list of strings")]
    Columns,
    #[error("column `{0}` is listed more than once")]
    DuplicateColumn(String),
    #[error("`dtypes` must be an object")]
    Dtypes,
    #[error("declared type of column `{0}` is not recognized")]
    UnrecognizedDtype(String),
    #[error("column `{0}` has no declared type")]
    MissingDtype(String),
    #[error("declared type given for unknown column `{0}`")]
    UnknownDtype(String),
    #[error("`data` must be a list of objects")]
    Data,
    #[error("row {row} has no integral `id` a float can represent exactly")]
    MissingId { row: usize },
    #[error("row {row} repeats `id` {id}")]
    DuplicateId { row: usize, id: RowId },
    #[error("row {row} has no value for column `{column}`")]
    MissingCell { row: usize, column: String },
    #[error("row {row}, column `{column}`: value must be a string or a number")]
    InvalidCell { row: usize, column: String },
    #[error("row {row}, column `{column}`: value does not match the declared type")]
    KindMismatch { row: usize, column: String },
}

/// An immutable, validated table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Row>,
}

impl TableSnapshot {
    /// Validates a response body and builds a snapshot from it.
    ///
    /// The body must be an object with
    /// - `columns`: a list of unique strings,
    /// - `dtypes`: exactly one recognized declared type per column,
    /// - `data`: a list of objects whose values are strings or numbers, each
    ///   carrying a numeric `id` and a value for every column. Columns whose
    ///   declared type stores numbers must hold numbers, not numeric strings.
    ///   Ids are unique and no larger in magnitude than 2^53.
    pub fn from_json(body: &Value) -> Result<Self, ShapeError> {
        let object = body.as_object().ok_or(ShapeError::NotAnObject)?;

        let names = parse_columns(object.get("columns"))?;
        let dtypes = parse_dtypes(object.get("dtypes"))?;

        for name in dtypes.keys() {
            if !names.contains(name) {
                return Err(ShapeError::UnknownDtype(name.clone()));
            }
        }
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let dtype = dtypes
                .get(&name)
                .cloned()
                .ok_or_else(|| ShapeError::MissingDtype(name.clone()))?;
            columns.push(ColumnDescriptor { name, dtype });
        }

        let data = object
            .get("data")
            .and_then(Value::as_array)
            .ok_or(ShapeError::Data)?;
        let mut rows = Vec::with_capacity(data.len());
        let mut seen = BTreeSet::new();
        for (index, raw) in data.iter().enumerate() {
            let row = parse_row(index, raw, &columns)?;
            if !seen.insert(row.id) {
                return Err(ShapeError::DuplicateId {
                    row: index,
                    id: row.id,
                });
            }
            rows.push(row);
        }

        Ok(TableSnapshot { columns, rows })
    }

    /// Columns in the order the backend listed them.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn dtype(&self, name: &str) -> Option<&DeclaredType> {
        self.column(name).map(|c| &c.dtype)
    }

    /// Whether a row with this `id` exists. Selection toggles check this.
    pub fn contains_row(&self, id: RowId) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Largest integer every `f64` below it represents exactly.
const MAX_EXACT_ID: f64 = 9_007_199_254_740_992.0;

fn parse_columns(raw: Option<&Value>) -> Result<Vec<String>, ShapeError> {
    let list = raw.and_then(Value::as_array).ok_or(ShapeError::Columns)?;
    let mut names: Vec<String> = Vec::with_capacity(list.len());
    for item in list {
        let name = item.as_str().ok_or(ShapeError::Columns)?;
        if names.iter().any(|n| n == name) {
            return Err(ShapeError::DuplicateColumn(name.to_string()));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

fn parse_dtypes(raw: Option<&Value>) -> Result<BTreeMap<String, DeclaredType>, ShapeError> {
    let object = raw.and_then(Value::as_object).ok_or(ShapeError::Dtypes)?;
    object
        .iter()
        .map(|(name, value)| {
            serde_json::from_value::<DeclaredType>(value.clone())
                .map(|dtype| (name.clone(), dtype))
                .map_err(|_| ShapeError::UnrecognizedDtype(name.clone()))
        })
        .collect()
}

fn parse_row(index: usize, raw: &Value, columns: &[ColumnDescriptor]) -> Result<Row, ShapeError> {
    let object: &Map<String, Value> = raw.as_object().ok_or(ShapeError::Data)?;

    let mut values = BTreeMap::new();
    for (key, value) in object {
        let cell = CellValue::from_json(value).ok_or_else(|| ShapeError::InvalidCell {
            row: index,
            column: key.clone(),
        })?;
        values.insert(key.clone(), cell);
    }

    let id = values
        .get(ID_FIELD)
        .and_then(CellValue::as_f64)
        .filter(|n| n.fract() == 0.0 && n.abs() <= MAX_EXACT_ID)
        .map(|n| n as RowId)
        .ok_or(ShapeError::MissingId { row: index })?;

    for column in columns {
        let cell = values.get(&column.name).ok_or_else(|| ShapeError::MissingCell {
            row: index,
            column: column.name.clone(),
        })?;
        let matches = match (&column.dtype, cell) {
            (DeclaredType::Choices(_), CellValue::Number(_)) => false,
            (dtype, CellValue::Text(_)) if dtype.stores_numbers() => false,
            _ => true,
        };
        if !matches {
            return Err(ShapeError::KindMismatch {
                row: index,
                column: column.name.clone(),
            });
        }
    }

    Ok(Row { id, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn groups() -> Value {
        json!({
            "columns": ["id", "name"],
            "data": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
            "dtypes": {"id": "INTEGER", "name": "VARCHAR"}
        })
    }

    #[test]
    fn accepts_well_formed_table() {
        let snapshot = TableSnapshot::from_json(&groups()).unwrap();
        assert_eq!(snapshot.columns().len(), 2);
        assert_eq!(snapshot.rows().len(), 2);
        assert_eq!(snapshot.rows()[1].id(), 2);
        assert_eq!(
            snapshot.rows()[0].get("name"),
            Some(&CellValue::Text("A".to_string()))
        );
        assert!(snapshot.contains_row(1));
        assert!(!snapshot.contains_row(3));
    }

    #[test]
    fn accepts_empty_table() {
        let body = json!({"columns": ["name"], "data": [], "dtypes": {"name": "VARCHAR"}});
        let snapshot = TableSnapshot::from_json(&body).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn rejects_error_detail() {
        let body = json!({"detail": "Not authenticated"});
        assert_eq!(TableSnapshot::from_json(&body), Err(ShapeError::Columns));
        assert_eq!(
            TableSnapshot::from_json(&json!([1, 2])),
            Err(ShapeError::NotAnObject)
        );
    }

    #[test]
    fn rejects_null_and_boolean_cells() {
        let mut body = groups();
        body["data"][0]["name"] = Value::Null;
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::InvalidCell {
                row: 0,
                column: "name".to_string()
            })
        );

        let mut body = groups();
        body["data"][1]["name"] = json!(true);
        assert!(matches!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::InvalidCell { row: 1, .. })
        ));
    }

    #[test]
    fn requires_numeric_id() {
        let body = json!({
            "columns": ["name"],
            "data": [{"id": "1", "name": "A"}],
            "dtypes": {"name": "VARCHAR"}
        });
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::MissingId { row: 0 })
        );
    }

    #[test]
    fn requires_one_dtype_per_column() {
        let mut body = groups();
        body["dtypes"].as_object_mut().unwrap().remove("name");
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::MissingDtype("name".to_string()))
        );

        let mut body = groups();
        body["dtypes"]["extra"] = json!("VARCHAR");
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::UnknownDtype("extra".to_string()))
        );
    }

    #[test]
    fn numeric_columns_reject_numeric_strings() {
        let body = json!({
            "columns": ["id", "amount"],
            "data": [{"id": 1, "amount": "3.5"}],
            "dtypes": {"id": "INTEGER", "amount": "FLOAT"}
        });
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::KindMismatch {
                row: 0,
                column: "amount".to_string()
            })
        );
    }

    #[test]
    fn mapping_columns_hold_codes() {
        let body = json!({
            "columns": ["id", "asset_id"],
            "data": [{"id": 1, "asset_id": 7}],
            "dtypes": {"id": "INTEGER", "asset_id": {"Wallet": 7}}
        });
        let snapshot = TableSnapshot::from_json(&body).unwrap();
        assert_eq!(
            snapshot.dtype("asset_id").and_then(|d| d.label_for_code(7)),
            Some("Wallet")
        );
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        assert_eq!(CellValue::Number(7.0).to_json(), json!(7));
        assert_eq!(CellValue::Number(-2.0).to_json(), json!(-2));
        assert_eq!(CellValue::Number(3.5).to_json(), json!(3.5));
        assert_eq!(CellValue::from("7").to_json(), json!("7"));
    }

    #[test]
    fn rejects_unrecognized_dtype() {
        let mut body = groups();
        body["dtypes"]["name"] = json!(42);
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::UnrecognizedDtype("name".to_string()))
        );
    }

    #[test]
    fn rejects_repeated_row_ids() {
        let mut body = groups();
        body["data"][1]["id"] = json!(1);
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::DuplicateId { row: 1, id: 1 })
        );
    }

    #[test]
    fn rejects_ids_beyond_exact_range() {
        let mut body = groups();
        body["data"][0]["id"] = json!(9e18);
        body["data"][1]["id"] = json!(9.1e18);
        assert_eq!(
            TableSnapshot::from_json(&body),
            Err(ShapeError::MissingId { row: 0 })
        );
    }
}
