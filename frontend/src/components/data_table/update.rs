//! Update function for the data table component.
//!
//! Elm-style: each `Msg` mutates the component and returns whether to
//! re-render. Network calls run in `spawn_local` and report back with a
//! follow-up message; a successful add or delete always ends in `Msg::Reload`
//! so the grid shows the server's view rather than a local splice.

use common::responses::{ErrorDetail, TableBody};
use common::table::SubmitPlan;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::show_toast;

use super::messages::Msg;
use super::state::{DataTable, LoadStatus};

pub fn update(component: &mut DataTable, ctx: &Context<DataTable>, msg: Msg) -> bool {
    let config = &ctx.props().config;
    match msg {
        Msg::Reload => {
            component.status = LoadStatus::Loading;
            let link = ctx.link().clone();
            let route = config.route.clone();
            spawn_local(async move {
                let result = api::fetch_table(&route).await.map_err(|e| e.to_string());
                link.send_message(Msg::Loaded { route, result });
            });
            true
        }
        // A load started before the configuration changed.
        Msg::Loaded { route, .. } if route != config.route => false,
        Msg::Loaded {
            result: Ok(envelope),
            ..
        } => {
            component.status = match envelope.body {
                TableBody::Table(snapshot) => {
                    component.table.load(snapshot);
                    LoadStatus::Ready
                }
                TableBody::Invalid(err) => LoadStatus::Invalid(err.to_string()),
                TableBody::Failed(detail) => LoadStatus::Failed {
                    status: detail.status,
                    message: detail.message,
                },
            };
            true
        }
        Msg::Loaded {
            result: Err(err), ..
        } => {
            gloo_console::error!(format!("{}: {}", config.route, err));
            component.status = LoadStatus::Unreachable(err);
            true
        }
        Msg::ToggleSelect(id) => component.table.toggle_select(id),
        Msg::EditDraft { column, value } => {
            // Parse failures are kept on the table and shown beside the input.
            let _ = component.table.edit_draft(config, &column, &value);
            true
        }
        Msg::RejectDraft { column } => {
            let _ = component.table.reject_input(config, &column);
            true
        }
        Msg::SubmitDelete => match component.table.submit_delete(config) {
            Some(plan) => {
                dispatch(ctx, config.route.clone(), plan);
                true
            }
            None => false,
        },
        Msg::SubmitAdd => match component.table.submit_add(config) {
            Ok(Some(plan)) => {
                dispatch(ctx, config.route.clone(), plan);
                true
            }
            Ok(None) => false,
            Err(err) => {
                show_toast(&err.to_string());
                false
            }
        },
        // The component was switched to another table meanwhile.
        Msg::Submitted { table, .. } if table != config.route => false,
        Msg::Submitted {
            action, outcome, ..
        } => {
            let succeeded = match &outcome {
                Ok(envelope) if envelope.ok => true,
                Ok(envelope) => {
                    let detail = ErrorDetail::from_body(envelope.status, &envelope.body);
                    show_toast(&format!("{} ({})", detail.message, detail.status));
                    false
                }
                Err(err) => {
                    show_toast(err);
                    false
                }
            };
            if component.table.finish(action, succeeded) {
                ctx.link().send_message(Msg::Reload);
            }
            true
        }
    }
}

fn dispatch(ctx: &Context<DataTable>, table: String, plan: SubmitPlan) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let SubmitPlan {
            action,
            route,
            method,
            payload,
        } = plan;
        let outcome = api::request(&route, method, payload)
            .await
            .map_err(|e| e.to_string());
        if let Err(err) = &outcome {
            gloo_console::error!(format!("{} {}: {}", method, route, err));
        }
        link.send_message(Msg::Submitted {
            table,
            action,
            outcome,
        });
    });
}
