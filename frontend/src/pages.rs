//! The application's pages and the table configuration each one shows.

use common::table::TableConfig;
use yew::prelude::*;

use crate::components::account::{AccountForm, SessionStatus, LOGIN_FIELDS, SIGNUP_FIELDS};
use crate::components::data_table::DataTable;
use crate::components::page_frame::PageFrame;
use crate::config::client_config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Signup,
    Groups,
    Assets,
    Records,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Login,
        Page::Signup,
        Page::Groups,
        Page::Assets,
        Page::Records,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Log in",
            Page::Signup => "Sign up",
            Page::Groups => "Groups",
            Page::Assets => "Assets",
            Page::Records => "Records",
        }
    }

    /// Renders the page. `navigate` moves the app to another page.
    pub fn render(self, navigate: &Callback<Page>) -> Html {
        let body = match self {
            Page::Home => home(navigate),
            Page::Login => html! {
                <AccountForm
                    route="token/"
                    fields={LOGIN_FIELDS}
                    submit_label="Log in"
                    on_success={navigate.reform(|()| Page::Home)}
                />
            },
            Page::Signup => html! {
                <AccountForm
                    route="users/"
                    fields={SIGNUP_FIELDS}
                    submit_label="Sign up"
                    on_success={navigate.reform(|()| Page::Login)}
                />
            },
            Page::Groups => html! { <DataTable config={groups_table()} /> },
            Page::Assets => html! { <DataTable config={assets_table()} /> },
            Page::Records => records(),
        };

        html! {
            <PageFrame title={self.title()}>
                { body }
            </PageFrame>
        }
    }
}

pub fn groups_table() -> TableConfig {
    TableConfig::new("groups/").with_editable_columns(["name"])
}

pub fn assets_table() -> TableConfig {
    TableConfig::new("assets/").with_editable_columns([
        "owner_group_id",
        "name",
        "asset_type",
        "currency",
    ])
}

pub fn records_table() -> TableConfig {
    TableConfig::new("records/").with_editable_columns([
        "asset_id",
        "date",
        "category",
        "payment_amount",
        "currency",
        "approved_amount",
    ])
}

fn home(navigate: &Callback<Page>) -> Html {
    html! {
        <>
            <SessionStatus on_login={navigate.reform(|()| Page::Login)} />
            <ul class="home-links">
                {
                    for [Page::Groups, Page::Assets, Page::Records, Page::Signup].into_iter().map(|page| {
                        let onclick = navigate.reform(move |_: MouseEvent| page);
                        html! { <li><button class="link-btn" {onclick}>{ page.title() }</button></li> }
                    })
                }
            </ul>
        </>
    }
}

fn records() -> Html {
    let export = match client_config().resolve("records/export") {
        Ok(url) => html! { <a class="export-link" href={url.to_string()}>{ "Export" }</a> },
        Err(err) => {
            gloo_console::error!(format!("records/export: {err}"));
            html! {}
        }
    };

    html! {
        <>
            { export }
            <DataTable config={records_table()} />
        </>
    }
}
