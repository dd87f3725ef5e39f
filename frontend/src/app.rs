use yew::{html, Component, Context, Html, MouseEvent};

use crate::pages::Page;

pub enum Msg {
    Navigate(Page),
}

pub struct App {
    page: Page,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        App { page: Page::Home }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(page) if page == self.page => false,
            Msg::Navigate(page) => {
                self.page = page;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let navigate = ctx.link().callback(Msg::Navigate);
        let nav = Page::ALL.into_iter().map(|page| {
            let class = if page == self.page { "nav-btn active" } else { "nav-btn" };
            let onclick = navigate.reform(move |_: MouseEvent| page);
            html! { <button {class} {onclick}>{ page.title() }</button> }
        });

        html! {
            <div>
                <nav class="top-bar">{ for nav }</nav>
                <main>{ self.page.render(&navigate) }</main>
            </div>
        }
    }
}
