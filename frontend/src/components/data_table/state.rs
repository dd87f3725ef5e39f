//! Component state of the data table.
//!
//! The table data itself lives in `common::table::DataTableState`; this
//! struct adds what only the browser side needs to know: whether the last
//! load worked, and a DOM id prefix for labelling the inputs.

use common::table::DataTableState;
use uuid::Uuid;

/// Outcome of the most recent load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// The backend answered 2xx with something that is not a table.
    Invalid(String),
    /// The backend answered with an error status.
    Failed { status: u16, message: String },
    /// The request never got an answer, or the answer was not JSON.
    Unreachable(String),
}

pub struct DataTable {
    pub table: DataTableState,
    pub status: LoadStatus,
    pub dom_id: String,
    /// Guard so the first-render load only runs once.
    pub started: bool,
}

impl DataTable {
    pub fn new() -> Self {
        Self {
            table: DataTableState::new(),
            status: LoadStatus::Loading,
            dom_id: format!("table-{}", Uuid::new_v4().simple()),
            started: false,
        }
    }

    pub fn input_id(&self, column: &str) -> String {
        format!("{}-new-{}", self.dom_id, column)
    }
}
