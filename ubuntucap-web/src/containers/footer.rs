use crate::context::use_app_context;
use crate::routes::Route;
use i18nrs::yew::use_translation;
use yew::prelude::*;
use yew_router::prelude::Link;

#[function_component(Footer)]
pub fn footer() -> Html {
    let (i18n, ..) = use_translation();
    let context = use_app_context();
    let year = js_sys::Date::new_0().get_full_year();

    html! {
        <footer class="footer footer-center p-4 border-t border-base-300 text-base-content">
            <nav class="grid grid-flow-col gap-4">
                <Link<Route> to={Route::About} classes="link link-hover">{i18n.t("nav.about")}</Link<Route>>
                <Link<Route> to={Route::Contact} classes="link link-hover">{i18n.t("nav.contact")}</Link<Route>>
                <a class="link link-hover" href={format!("mailto:{}", context.config.support_email)}>
                    {&context.config.support_email}
                </a>
            </nav>
            <p>{format!("© {year} {} · {}", i18n.t("app.title"), i18n.t("footer.rights"))}</p>
        </footer>
    }
}
