use common::requests::{Method, Payload};
use common::responses::ResponseBody;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Checking,
    LoggedIn,
    LoggedOut,
}

#[derive(Properties, PartialEq, Clone)]
pub struct SessionStatusProps {
    /// Asked for when the user wants to log in.
    pub on_login: Callback<()>,
}

/// "Logged in" / "Not logged in" indicator, decided by `GET token/`.
pub struct SessionStatus {
    state: SessionState,
}

impl Component for SessionStatus {
    type Message = SessionState;
    type Properties = SessionStatusProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            let state = match api::request("token/", Method::Get, Payload::new()).await {
                Ok(envelope) => match envelope.into_response().body {
                    ResponseBody::ErrorDetail(_) => SessionState::LoggedOut,
                    _ => SessionState::LoggedIn,
                },
                Err(err) => {
                    gloo_console::warn!(format!("session check failed: {err}"));
                    SessionState::LoggedOut
                }
            };
            link.send_message(state);
        });
        SessionStatus {
            state: SessionState::Checking,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, state: Self::Message) -> bool {
        let changed = self.state != state;
        self.state = state;
        changed
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match self.state {
            SessionState::Checking => html! { <span class="session checking">{ "..." }</span> },
            SessionState::LoggedIn => html! { <span class="session">{ "Logged in" }</span> },
            SessionState::LoggedOut => {
                let onclick = ctx.props().on_login.reform(|_: MouseEvent| ());
                html! {
                    <span class="session">
                        { "Not logged in " }
                        <button class="link-btn" {onclick}>{ "Log in" }</button>
                    </span>
                }
            }
        }
    }
}
