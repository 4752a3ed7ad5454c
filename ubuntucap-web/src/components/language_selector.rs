//! Header language menu. The choice is remembered in local storage.

use crate::language::{self, DEFAULT_LANGUAGE, LanguageInfo};
use gloo_storage::{LocalStorage, Storage};
use i18nrs::yew::use_translation;
use tracing::{debug, warn};
use yew::prelude::*;
use yew_icons::{Icon, IconId};

const LANGUAGE_KEY: &str = "ubuntucap_language";

fn menu_languages() -> Vec<LanguageInfo> {
    let mut languages: Vec<_> = language::supported_languages().into_values().collect();
    languages.sort_by_key(|info| info.native_name);
    languages
}

#[function_component(LanguageSelector)]
pub fn language_selector() -> Html {
    let (i18n, set_language) = use_translation();
    let current = i18n.get_current_language().to_string();

    {
        let set_language = set_language.clone();
        use_effect_with((), move |()| {
            let saved = LocalStorage::get::<String>(LANGUAGE_KEY).ok();
            if let Some(code) = saved.filter(|code| language::get_language_info(code).is_some()) {
                set_language.emit(code);
            }
            || ()
        });
    }

    let choose = |code: &'static str| {
        let set_language = set_language.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            debug!(language = code, "switching language");
            if let Err(err) = LocalStorage::set(LANGUAGE_KEY, code) {
                warn!("could not remember language: {err}");
            }
            set_language.emit(code.to_string());
        })
    };

    let trigger = language::get_language_info(&current)
        .or_else(|| language::get_language_info(DEFAULT_LANGUAGE))
        .map_or_else(
            || "🌐".to_string(),
            |info| format!("{} {}", info.flag, info.code.to_uppercase()),
        );

    html! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-sm">{trigger}</div>
            <ul tabindex="0" class="dropdown-content z-[1] menu menu-sm p-2 shadow bg-base-100 rounded-box w-44">
                { for menu_languages().into_iter().map(|info| html! {
                    <li>
                        <a lang={info.code} onclick={choose(info.code)}>
                            <span>{info.flag}</span>
                            <span class="flex-1">{info.native_name}</span>
                            if info.code == current {
                                <Icon icon_id={IconId::HeroiconsOutlineCheck} width="16" height="16" />
                            }
                        </a>
                    </li>
                }) }
            </ul>
        </div>
    }
}
