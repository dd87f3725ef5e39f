//! Properties of the `DataTable` component.

use common::table::TableConfig;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct DataTableProps {
    /// Route, selectability and editable-schema subset of the table.
    ///
    /// The table is loaded on first render from `config.route`, and loaded
    /// afresh whenever the configuration changes.
    pub config: TableConfig,
}
