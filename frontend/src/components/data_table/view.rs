//! View rendering for the data table component.
//!
//! All layout decisions are made by `common::table::project`; this module
//! only maps the resulting `GridView` onto markup and wires the controls to
//! messages.

use common::classify::InputKind;
use common::table::{project, DraftCell, GridRow, GridView, InputCell, TableConfig};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::{DataTable, LoadStatus};

pub fn view(component: &DataTable, ctx: &Context<DataTable>) -> Html {
    let props = ctx.props();
    let link = ctx.link();

    let grid = component
        .table
        .loaded()
        .map(|table| build_grid(component, &project(table, &props.config), &props.config, link))
        .unwrap_or_default();

    html! {
        <div class="data-table" id={component.dom_id.clone()}>
            { status_banner(component) }
            { grid }
        </div>
    }
}

fn status_banner(component: &DataTable) -> Html {
    match &component.status {
        LoadStatus::Ready => html! {},
        LoadStatus::Loading if component.table.is_loaded() => {
            html! { <div class="data-table-status">{ "Refreshing..." }</div> }
        }
        LoadStatus::Loading => html! { <div class="data-table-status">{ "Loading..." }</div> },
        LoadStatus::Invalid(reason) => html! {
            <div class="data-table-status error">
                { format!("The server sent data this page cannot display: {reason}") }
            </div>
        },
        LoadStatus::Failed { status, message } => html! {
            <div class="data-table-status error">{ format!("{status} Error: {message}") }</div>
        },
        LoadStatus::Unreachable(reason) => html! {
            <div class="data-table-status error">
                { format!("Could not reach the server: {reason}") }
            </div>
        },
    }
}

fn build_grid(
    component: &DataTable,
    view: &GridView,
    config: &TableConfig,
    link: &Scope<DataTable>,
) -> Html {
    let empty_row = if view.rows.is_empty() {
        html! {
            <tr class="empty">
                <td colspan={view.header.len().to_string()}>{ "No rows" }</td>
            </tr>
        }
    } else {
        html! {}
    };
    let draft_row = view
        .draft
        .as_ref()
        .map(|cells| build_draft_row(component, cells, link))
        .unwrap_or_default();

    html! {
        <>
            <table class="grid">
                <thead>
                    <tr>{ for view.header.iter().map(|label| html! { <th>{ label.clone() }</th> }) }</tr>
                </thead>
                <tbody>
                    { for view.rows.iter().map(|row| build_row(row, link)) }
                    { empty_row }
                    { draft_row }
                </tbody>
            </table>
            { build_actions(view, config, link) }
        </>
    }
}

fn build_row(row: &GridRow, link: &Scope<DataTable>) -> Html {
    let id = row.id;
    let checkbox = match row.selected {
        Some(selected) => html! {
            <td class="select">
                <input
                    type="checkbox"
                    checked={selected}
                    onchange={link.callback(move |_: Event| Msg::ToggleSelect(id))}
                />
            </td>
        },
        None => html! {},
    };

    html! {
        <tr key={id.to_string()} class={classes!(row.selected.unwrap_or(false).then_some("selected"))}>
            { checkbox }
            { for row.cells.iter().map(|cell| html! { <td>{ cell.clone() }</td> }) }
        </tr>
    }
}

fn build_draft_row(component: &DataTable, cells: &[DraftCell], link: &Scope<DataTable>) -> Html {
    html! {
        <tr class="draft-row">
            {
                for cells.iter().map(|cell| match cell {
                    DraftCell::Blank => html! { <td /> },
                    DraftCell::Input(input) => html! {
                        <td>
                            { build_input(component, input, link) }
                            {
                                input.error.as_ref().map(|err| html! {
                                    <span class="field-error">{ err.clone() }</span>
                                }).unwrap_or_default()
                            }
                        </td>
                    },
                })
            }
        </tr>
    }
}

fn build_input(component: &DataTable, input: &InputCell, link: &Scope<DataTable>) -> Html {
    let id = component.input_id(&input.column);
    let column = input.column.clone();

    match input.kind {
        InputKind::ChoiceList | InputKind::ChoiceMapping => {
            let onchange = link.callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                Msg::EditDraft {
                    column: column.clone(),
                    value: select.value(),
                }
            });
            html! {
                <select {id} name={input.column.clone()} {onchange}>
                    <option value="" selected={input.value.is_empty()}>{ "-" }</option>
                    {
                        for input.options.iter().map(|option| html! {
                            <option value={option.clone()} selected={*option == input.value}>
                                { option.clone() }
                            </option>
                        })
                    }
                </select>
            }
        }
        InputKind::Checkbox => {
            let onchange = link.callback(move |e: Event| {
                let checkbox: HtmlInputElement = e.target_unchecked_into();
                let value = if checkbox.checked() { "true" } else { "" };
                Msg::EditDraft {
                    column: column.clone(),
                    value: value.to_string(),
                }
            });
            html! {
                <input
                    type="checkbox"
                    {id}
                    name={input.column.clone()}
                    checked={input.value == "true"}
                    {onchange}
                />
            }
        }
        kind => {
            let oninput = link.callback(move |e: InputEvent| {
                let field: HtmlInputElement = e.target_unchecked_into();
                // Number inputs report "" for text they cannot parse.
                if field.validity().bad_input() {
                    return Msg::RejectDraft {
                        column: column.clone(),
                    };
                }
                Msg::EditDraft {
                    column: column.clone(),
                    value: field.value(),
                }
            });
            let step = (kind == InputKind::Number).then_some("any");
            html! {
                <input
                    type={kind.html_type()}
                    {id}
                    name={input.column.clone()}
                    value={input.value.clone()}
                    placeholder={input.column.clone()}
                    {step}
                    {oninput}
                />
            }
        }
    }
}

fn build_actions(view: &GridView, config: &TableConfig, link: &Scope<DataTable>) -> Html {
    let delete = if config.selectable {
        html! {
            <button
                class="delete-btn"
                disabled={!view.can_delete}
                onclick={link.callback(|_| Msg::SubmitDelete)}
            >
                { "Delete" }
            </button>
        }
    } else {
        html! {}
    };
    let add = if config.editable {
        html! {
            <button
                class="add-btn"
                disabled={!view.can_add}
                onclick={link.callback(|_| Msg::SubmitAdd)}
            >
                { "Add" }
            </button>
        }
    } else {
        html! {}
    };

    html! {
        <div class="data-table-actions">
            { delete }
            { add }
            { if view.busy { html! { <span class="busy">{ "Saving..." }</span> } } else { html! {} } }
        </div>
    }
}
