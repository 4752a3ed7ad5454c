use crate::{
    components::{
        header_nav_item::HeaderNavItem, language_selector::LanguageSelector,
        theme_switcher::ThemeSwitcher, user_dropdown::UserDropdown,
    },
    models::app_state::AppState,
    routes::Route,
};
use i18nrs::yew::use_translation;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    #[prop_or_default]
    pub current_route: Option<Route>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let (i18n, ..) = use_translation();
    let is_authenticated = *use_selector(|state: &AppState| state.is_authenticated);
    let routes = Route::navigation(is_authenticated);

    let render_routes = |routes: &[Route]| -> Html {
        html! {
            { for routes.iter().map(|route| html! {
                <HeaderNavItem
                    current_route={props.current_route.clone()}
                    route={route.clone()}
                />
            }) }
        }
    };
    let home = if is_authenticated { Route::Dashboard } else { Route::Home };

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<Route> to={home} classes="btn btn-ghost text-lg">
                {i18n.t("app.title")}
            </Link<Route>>
            <div class="dropdown dropdown-end sm:hidden">
                <button class="btn btn-soft" aria-label={i18n.t("header.menu")}>
                    <Icon icon_id={IconId::HeroiconsOutlineBars3} class="h-5 w-5" />
                </button>
                <ul
                tabindex="0"
                class="dropdown-content menu z-[1] bg-base-200 p-6 rounded-box shadow w-56 gap-2"
                >
                    {render_routes(&routes)}
                </ul>
            </div>
            <ul class="hidden menu sm:menu-horizontal">
                {render_routes(&routes)}
            </ul>
            <div class="flex items-center gap-1">
                <LanguageSelector />
                <ThemeSwitcher class="hidden sm:block" />
                if is_authenticated {
                    <UserDropdown />
                } else {
                    <>
                    <Link<Route> to={Route::Login} classes="btn btn-ghost btn-sm">
                        {i18n.t("header.login")}
                    </Link<Route>>
                    <Link<Route> to={Route::Register} classes="btn btn-primary btn-sm hidden sm:inline-flex">
                        {i18n.t("header.register")}
                    </Link<Route>>
                    </>
                }
            </div>
        </nav>
    }
}
