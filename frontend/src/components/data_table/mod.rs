//! Data table: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic and view rendering.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `DataTableProps`, `DataTable`).
//! - Provide the `Component` implementation that delegates to `update::update` and `view::view`.
//! - Load the table on first render, and again whenever the route or
//!   schema configuration changes.

use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::DataTableProps;
pub use state::{DataTable, LoadStatus};

impl Component for DataTable {
    type Message = Msg;
    type Properties = DataTableProps;

    fn create(_ctx: &Context<Self>) -> Self {
        DataTable::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().config != old_props.config {
            *self = DataTable::new();
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if !self.started {
            self.started = true;
            ctx.link().send_message(Msg::Reload);
        }
    }
}
