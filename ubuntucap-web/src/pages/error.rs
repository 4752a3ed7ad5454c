use crate::routes::Route;
use i18nrs::yew::use_translation;
use yew::{Html, function_component, html};
use yew_router::prelude::Link;

/// Shown for unknown paths.
#[function_component(ErrorPage)]
pub fn error_page() -> Html {
    let (i18n, ..) = use_translation();

    html! {
        <div class="hero py-20">
            <div class="hero-content text-center">
                <div class="max-w-md space-y-4">
                    <h1 class="text-5xl font-bold">{"404"}</h1>
                    <p>{i18n.t("error.not_found")}</p>
                    <Link<Route> to={Route::Home} classes="btn btn-primary">
                        {i18n.t("error.back_home")}
                    </Link<Route>>
                </div>
            </div>
        </div>
    }
}
