use common::model::RowId;
use common::responses::{Envelope, TableEnvelope};
use common::table::PendingAction;

pub enum Msg {
    Reload,
    Loaded {
        route: String,
        result: Result<TableEnvelope, String>,
    },
    ToggleSelect(RowId),
    EditDraft { column: String, value: String },
    /// The input's control could not read what was typed.
    RejectDraft { column: String },
    SubmitDelete,
    SubmitAdd,
    Submitted {
        /// Table route the submit was made from.
        table: String,
        action: PendingAction,
        outcome: Result<Envelope, String>,
    },
}
