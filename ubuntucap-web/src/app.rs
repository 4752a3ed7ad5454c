use crate::config::FrontendConfig;
use crate::context::AppContext;
use crate::models::app_state::AppState;
use crate::routes::{Route, RouterBridge, switch};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_dispatch;

#[function_component(App)]
pub fn app() -> Html {
    let store = use_dispatch::<AppState>().context().clone();

    // Built once, in the `YewduxRoot` context, so the header and route guards
    // select the same session the services write. The snapshot is restored
    // before any route renders, so a reload is not bounced to the login page.
    let context = use_memo((), move |()| {
        AppContext::browser(&store, FrontendConfig::resolve().client_config())
    });
    let context = (*context).clone();

    {
        let auth = context.auth.clone();
        use_effect_with((), move |()| {
            spawn_local(async move { auth.bootstrap().await });
            || ()
        });
    }

    html! {
        <ContextProvider<AppContext> {context}>
            <BrowserRouter>
                <RouterBridge />
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<AppContext>>
    }
}
