use gloo_storage::{LocalStorage, Storage};
use i18nrs::yew::use_translation;
use tracing::warn;
use web_sys::window;
use yew::prelude::*;
use yew_icons::{Icon, IconId};

/// Local storage key remembering the chosen daisyUI theme.
const THEME_KEY: &str = "ubuntucap_theme";

fn apply_theme(theme: &str) {
    if let Some(html_element) = window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
    {
        if let Err(err) = html_element.set_attribute("data-theme", theme) {
            warn!("could not apply theme {theme}: {err:?}");
        }
    }
}

/// The theme a toggle switches to.
fn next_theme(current: &str) -> &'static str {
    if current == "dark" { "light" } else { "dark" }
}

fn remember_theme(theme: &str) {
    if let Err(err) = LocalStorage::set(THEME_KEY, theme) {
        warn!("could not remember theme: {err}");
    }
}

fn preferred_theme() -> String {
    if let Ok(saved) = LocalStorage::get::<String>(THEME_KEY) {
        return saved;
    }
    let prefers_dark = window()
        .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|query| query.matches());
    if prefers_dark { "dark" } else { "light" }.to_string()
}

#[derive(Properties, PartialEq, Eq)]
pub struct ThemeSwitcherProps {
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(ThemeSwitcher)]
pub fn theme_switcher(props: &ThemeSwitcherProps) -> Html {
    let (i18n, ..) = use_translation();
    let current_theme = use_state(|| "light".to_string());

    {
        let current_theme = current_theme.clone();
        use_effect_with((), move |()| {
            let theme = preferred_theme();
            apply_theme(&theme);
            current_theme.set(theme);
            || {}
        });
    }

    let toggle_theme = {
        let current_theme = current_theme.clone();
        Callback::from(move |_: yew::MouseEvent| {
            let next = next_theme(&current_theme);
            apply_theme(next);
            remember_theme(next);
            current_theme.set(next.to_string());
        })
    };

    // The icon shows the theme a click switches to.
    let theme_icon = match current_theme.as_str() {
        "light" => IconId::HeroiconsSolidMoon,
        _ => IconId::HeroiconsSolidSun,
    };

    html! {
        <div class={props.class.clone()}>
            <button
                class="btn btn-ghost btn-circle"
                onclick={toggle_theme}
                aria-label={i18n.t("header.theme")}
            >
                <Icon icon_id={theme_icon} class="h-5 w-5" />
            </button>
        </div>
    }
}
