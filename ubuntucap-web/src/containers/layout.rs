use crate::components::toast::ToastStack;
use crate::containers::{footer::Footer, header::Header};
use crate::routes::Route;
use i18nrs::yew::use_translation;
use web_sys::window;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    #[prop_or_default]
    pub current_route: Option<Route>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let (i18n, ..) = use_translation();

    // Keeps the document title in step with the route.
    let title = props.current_route.as_ref().map_or_else(
        || i18n.t("app.title"),
        |route| format!("{} · {}", i18n.t(route.title_key()), i18n.t("app.title")),
    );
    use_effect_with(title, |title| {
        if let Some(document) = window().and_then(|window| window.document()) {
            document.set_title(title);
        }
        || {}
    });

    html! {
    <>
        <Header current_route={props.current_route.clone()} />
        <ToastStack />
        <div class="min-h-screen bg-base-100 flex flex-col">
            <main class={classes!(
                "flex-grow",
                "p-4",
                "container",
                "mx-auto",
                "transition-all",
                "duration-300"
            )}>
                {props.children.clone()}
            </main>
            <Footer />
        </div>
    </>
    }
}
