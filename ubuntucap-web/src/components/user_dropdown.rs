use crate::{context::use_app_context, models::app_state::AppState, routes::Route};
use i18nrs::yew::use_translation;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[function_component(UserDropdown)]
pub fn user_dropdown() -> Html {
    let context = use_app_context();
    let (i18n, ..) = use_translation();
    let user_state = use_selector(|state: &AppState| state.user.clone());
    let Some(user) = (*user_state).clone() else {
        return html! {};
    };

    let logout_button = {
        let onclick = Callback::from(move |event: yew::MouseEvent| {
            event.prevent_default();
            let auth = context.auth.clone();
            spawn_local(async move { auth.logout().await });
        });
        html! {
            <li><a {onclick}>{i18n.t("header.logout")}</a></li>
        }
    };

    html! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-circle avatar placeholder mb-1">
                <div class="bg-primary text-primary-content w-9 rounded-full">
                    <span class="text-sm">{user.initials()}</span>
                </div>
            </div>
            <ul tabIndex={0} class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-56">
                <li class="px-2 py-1 text-left">
                    <div class="text-sm font-semibold text-base-content">{user.display_name()}</div>
                    <div class="text-xs text-base-content/70">{&user.phone_number}</div>
                </li>
                <div class="divider my-0"></div>
                <li>
                    <Link<Route> to={Route::Profile}>
                        <Icon icon_id={IconId::HeroiconsOutlineUserCircle} class="h-4 w-4" />
                        {i18n.t("nav.profile")}
                    </Link<Route>>
                </li>
                <li>
                    <Link<Route> to={Route::ProfileEdit}>
                        <Icon icon_id={IconId::HeroiconsOutlinePencilSquare} class="h-4 w-4" />
                        {i18n.t("profile.edit")}
                    </Link<Route>>
                </li>
                <div class="divider my-0"></div>
                {logout_button}
            </ul>
        </div>
    }
}
