//! Login and signup forms plus the session indicator.
//!
//! Both forms post their fields verbatim (every value a string) and leave
//! navigation to the caller through `on_success`.

use common::requests::Method;
use common::responses::ResponseBody;
use web_sys::HtmlFormElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{form_fields, show_toast};

mod status;

pub use status::SessionStatus;

/// One labelled input of an account form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
}

const fn field(name: &'static str, label: &'static str, input_type: &'static str) -> FormField {
    FormField {
        name,
        label,
        input_type,
    }
}

pub const LOGIN_FIELDS: &[FormField] = &[
    field("username", "Username", "text"),
    field("password", "Password", "password"),
];

pub const SIGNUP_FIELDS: &[FormField] = &[
    field("username", "Username", "text"),
    field("password", "Password", "password"),
    field("email", "Email", "email"),
    field("name", "Name", "text"),
    field("nickname", "Nickname", "text"),
];

#[derive(Properties, PartialEq, Clone)]
pub struct AccountFormProps {
    /// Route the form posts to, relative to the server address.
    pub route: AttrValue,
    pub fields: &'static [FormField],
    pub submit_label: AttrValue,
    /// Fired once the backend accepts the submission.
    pub on_success: Callback<()>,
}

pub enum Msg {
    Submit(Vec<(String, String)>),
    Finished(Result<ResponseBody, String>),
}

#[derive(Default)]
pub struct AccountForm {
    pending: bool,
    error: Option<String>,
}

impl Component for AccountForm {
    type Message = Msg;
    type Properties = AccountFormProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self::default()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Submit(_) if self.pending => false,
            Msg::Submit(fields) => {
                self.pending = true;
                self.error = None;
                let link = ctx.link().clone();
                let route = ctx.props().route.to_string();
                spawn_local(async move {
                    let outcome = api::send_form(&route, Method::Post, fields)
                        .await
                        .map(|envelope| envelope.into_response().body)
                        .map_err(|e| e.to_string());
                    link.send_message(Msg::Finished(outcome));
                });
                true
            }
            Msg::Finished(outcome) => {
                self.pending = false;
                match outcome {
                    Ok(ResponseBody::ErrorDetail(detail)) => {
                        self.error = Some(format!("{} ({})", detail.message, detail.status));
                    }
                    Ok(_) => ctx.props().on_success.emit(()),
                    Err(err) => {
                        show_toast(&err);
                        self.error = Some(err);
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            let form: HtmlFormElement = e.target_unchecked_into();
            Msg::Submit(form_fields(&form))
        });

        html! {
            <form class="account-form" {onsubmit}>
                { for props.fields.iter().map(labelled_input) }
                {
                    self.error.as_ref().map(|err| html! {
                        <p class="form-error">{ err.clone() }</p>
                    }).unwrap_or_default()
                }
                <button type="submit" disabled={self.pending}>{ props.submit_label.clone() }</button>
            </form>
        }
    }
}

fn labelled_input(field: &FormField) -> Html {
    let id = format!("account-{}", field.name);
    html! {
        <div class="form-field">
            <label for={id.clone()}>{ field.label }</label>
            <input {id} name={field.name} type={field.input_type} required={true} />
        </div>
    }
}
