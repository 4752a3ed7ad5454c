//! The application context: every service built once and handed to the
//! component tree through a `ContextProvider`.

use crate::api::UbuntuCapApi;
use crate::features::{
    AuthManager, CreditManager, DashboardManager, LoansManager, MpesaManager, ProfileManager,
};
use crate::http::{CookieSource, HttpClient, Transport};
use crate::models::app_state::AppState;
use crate::notify::NoticeBoard;
use crate::routes::{Route, ViewRouter};
use crate::session::{BrowserStorage, DurableStorage, SessionEvent, SessionStore};
use shared::ClientConfig;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};
use tracing::{debug, info};
use yew::prelude::*;
use yewdux::{Context, Dispatch};

/// Sends the user to the login page, with a notice, when the server ends
/// the session.
pub fn redirect_on_expiry(
    session: &SessionStore,
    router: Weak<ViewRouter>,
    notices: NoticeBoard,
) -> Dispatch<AppState> {
    session.subscribe(move |event| {
        if event != SessionEvent::Expired {
            return;
        }
        notices.warning("Your session has expired. Please log in again.");
        if let Some(router) = router.upgrade() {
            router.navigate(Route::Login);
        }
    })
}

/// Everything the UI talks to. State lives in the yewdux stores of `store`.
pub struct Services {
    pub store: Context,
    pub config: Rc<ClientConfig>,
    pub session: SessionStore,
    pub api: UbuntuCapApi,
    pub router: Rc<ViewRouter>,
    pub notices: NoticeBoard,
    pub auth: AuthManager,
    pub dashboard: DashboardManager,
    pub loans: LoansManager,
    pub credit: CreditManager,
    pub mpesa: MpesaManager,
    pub profile: ProfileManager,
    _listeners: Vec<Dispatch<AppState>>,
}

impl Services {
    /// Clears every feature's data, e.g. after sign-out.
    pub fn reset_features(&self) {
        self.auth.reset();
        self.dashboard.reset();
        self.loans.reset();
        self.credit.reset();
        self.mpesa.reset();
        self.profile.reset();
    }
}

/// Shared handle on [`Services`]. Equality is identity, so providing it
/// never re-renders consumers.
#[derive(Clone)]
pub struct AppContext(Rc<Services>);

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for AppContext {
    type Target = Services;

    fn deref(&self) -> &Services {
        &self.0
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("api_base_url", &self.config.api_base_url)
            .field("session", &self.session)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wires the services over the given platform pieces, keeping their state
    /// in `store`. The session is restored from `storage`.
    pub fn new(
        store: &Context,
        config: ClientConfig,
        transport: Rc<dyn Transport>,
        cookies: Rc<dyn CookieSource>,
        storage: Rc<dyn DurableStorage>,
    ) -> Self {
        let config = Rc::new(config);
        let session = SessionStore::restore(store, storage, &config);
        let http = HttpClient::new(Rc::clone(&config), transport, cookies, session.clone());
        let api = UbuntuCapApi::new(http);
        let router = Rc::new(ViewRouter::new(session.clone()));
        let notices = NoticeBoard::new(store);

        let services = Rc::new_cyclic(|weak: &Weak<Services>| {
            let expiry = redirect_on_expiry(&session, Rc::downgrade(&router), notices.clone());
            let weak = weak.clone();
            let cleanup = session.subscribe(move |event| {
                if matches!(event, SessionEvent::SignedOut | SessionEvent::Expired) {
                    if let Some(services) = weak.upgrade() {
                        debug!(?event, "clearing feature state");
                        services.reset_features();
                    }
                }
            });

            Services {
                auth: AuthManager::new(
                    store,
                    api.clone(),
                    session.clone(),
                    notices.clone(),
                    Rc::clone(&router),
                ),
                dashboard: DashboardManager::new(store, api.clone(), session.clone()),
                loans: LoansManager::new(store, api.clone(), notices.clone(), Rc::clone(&router)),
                credit: CreditManager::new(store, api.clone(), notices.clone()),
                mpesa: MpesaManager::new(store, api.clone(), session.clone(), notices.clone()),
                profile: ProfileManager::new(
                    store,
                    api.clone(),
                    session.clone(),
                    notices.clone(),
                    Rc::clone(&router),
                ),
                store: store.clone(),
                config,
                session,
                api,
                router,
                notices,
                _listeners: vec![expiry, cleanup],
            }
        });
        info!(api_base_url = %services.config.api_base_url, "application context ready");
        Self(services)
    }

    /// The context for the running browser: fetch transport, document
    /// cookies and `localStorage`.
    pub fn browser(store: &Context, config: ClientConfig) -> Self {
        let (transport, cookies) = platform_http(&config);
        Self::new(store, config, transport, cookies, Rc::new(BrowserStorage))
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_http(_config: &ClientConfig) -> (Rc<dyn Transport>, Rc<dyn CookieSource>) {
    use crate::http::{DocumentCookies, ReqwestTransport};
    (Rc::new(ReqwestTransport::new()), Rc::new(DocumentCookies))
}

/// Natively the reqwest cookie jar plays the browser's part.
#[cfg(not(target_arch = "wasm32"))]
fn platform_http(config: &ClientConfig) -> (Rc<dyn Transport>, Rc<dyn CookieSource>) {
    use crate::http::cookies::JarCookies;
    use crate::http::{ReqwestTransport, StaticCookies};
    use std::sync::Arc;

    let jar = Arc::new(reqwest::cookie::Jar::default());
    let transport = Rc::new(ReqwestTransport::with_jar(Arc::clone(&jar)));
    let cookies: Rc<dyn CookieSource> = match JarCookies::new(jar, &config.origin()) {
        Some(cookies) => Rc::new(cookies),
        None => Rc::new(StaticCookies::new()),
    };
    (transport, cookies)
}

/// The [`AppContext`] provided at the root of the tree.
///
/// # Panics
/// Outside the `ContextProvider`, which is a wiring bug.
#[hook]
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext is provided at the root")
}
