mod api;
mod app;
mod components;
mod config;
mod containers;
mod context;
mod features;
mod hooks;
mod http;
mod language;
mod models;
mod notify;
mod pages;
mod routes;
mod session;

#[cfg(test)]
mod routes_test;

use app::App;
use i18nrs::yew::I18nProvider;
use i18nrs::yew::I18nProviderConfig;
use language::{DEFAULT_LANGUAGE, supported_languages};
use std::collections::HashMap;
use tracing::{error, info};
use yew::Renderer;
use yew::prelude::*;
use yewdux::YewduxRoot;

#[function_component(InternationalApp)]
fn international_app() -> Html {
    let translations: HashMap<&str, &str> = supported_languages()
        .iter()
        .map(|(&key, value)| (key, value.translation))
        .collect();

    let config = I18nProviderConfig {
        translations,
        default_language: DEFAULT_LANGUAGE.to_string(),
        ..Default::default()
    };

    html! {
        <YewduxRoot>
            <I18nProvider ..config>
                <App />
            </I18nProvider>
        </YewduxRoot>
    }
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    info!("starting UbuntuCap web client");

    let body = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector("body").ok().flatten());
    match body {
        Some(root) => {
            Renderer::<InternationalApp>::with_root(root).render();
        }
        None => error!("no document body to mount the app on"),
    }
}
