use yew::{html, AttrValue, Children, Component, Context, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct PageFrameProps {
    pub title: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

/// Centered white sheet holding one page's content under a heading.
pub struct PageFrame;

impl Component for PageFrame {
    type Message = ();
    type Properties = PageFrameProps;

    fn create(_ctx: &Context<Self>) -> Self {
        PageFrame
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let style = "display: flex;
             flex-direction: column;
             gap: 12px;
             max-width: 960px;
             margin: 24px auto;
             padding: 16px 24px;
             background: white;
             box-shadow: 0 0 8px #ccc;";

        html! {
            <section class="page" {style}>
                <h1>{ props.title.clone() }</h1>
                { for props.children.iter() }
            </section>
        }
    }
}
