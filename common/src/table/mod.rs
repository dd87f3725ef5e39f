//! Editable data tables: configuration, per-instance state and the render
//! projection.

pub mod render;
pub mod state;

pub use render::{project, DraftCell, GridRow, GridView, InputCell};
pub use state::{DataTableState, DraftRow, LoadedTable, PendingAction, SelectionSet, SubmitPlan};

/// How one table instance behaves.
///
/// `route` is the collection route used to load, add and delete rows.
/// Only columns named in `editable_columns` get an input in the new-row
/// line; the others render blank there. `url_segment_fields` names draft
/// columns that fill `{field}` placeholders in the route of an add request
/// instead of travelling in its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub route: String,
    pub editable: bool,
    pub selectable: bool,
    pub editable_columns: Vec<String>,
    pub url_segment_fields: Vec<String>,
}

impl TableConfig {
    /// A selectable, editable table with no editable columns yet.
    pub fn new(route: impl Into<String>) -> Self {
        TableConfig {
            route: route.into(),
            editable: true,
            selectable: true,
            editable_columns: Vec::new(),
            url_segment_fields: Vec::new(),
        }
    }

    pub fn with_editable_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editable_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_url_segment_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_segment_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Neither selectable nor editable.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self.selectable = false;
        self
    }

    pub fn is_editable(&self, column: &str) -> bool {
        self.editable && self.editable_columns.iter().any(|c| c == column)
    }
}
