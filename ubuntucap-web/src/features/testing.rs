//! Collaborators for driving managers natively against a scripted backend.

use crate::api::UbuntuCapApi;
use crate::context::redirect_on_expiry;
use crate::http::testing::StubTransport;
use crate::http::{HttpClient, StaticCookies};
use crate::models::app_state::AppState;
use crate::notify::NoticeBoard;
use crate::routes::{MockNavigate, Navigate, Route, ViewRouter};
use crate::session::{MemoryStorage, SessionStore};
use serde_json::json;
use shared::config::ClientConfig;
use shared::models::User;
use std::cell::RefCell;
use std::rc::Rc;
use yewdux::{Context, Dispatch};

pub struct Harness {
    /// Store context every collaborator shares.
    pub cx: Context,
    pub transport: Rc<StubTransport>,
    pub cookies: Rc<StaticCookies>,
    pub storage: Rc<MemoryStorage>,
    pub session: SessionStore,
    pub notices: NoticeBoard,
    pub router: Rc<ViewRouter>,
    pub api: UbuntuCapApi,
    navigations: Rc<RefCell<Vec<Route>>>,
    _expiry: Dispatch<AppState>,
}

impl Harness {
    /// A guest session with a CSRF cookie already set.
    pub fn new() -> Self {
        let cx = Context::new();
        let config = Rc::new(ClientConfig::with_defaults());
        let transport = Rc::new(StubTransport::new());
        let cookies = Rc::new(StaticCookies::new());
        cookies.set(&config.csrf_cookie_name, "test-csrf");
        let storage = Rc::new(MemoryStorage::new());
        let session = SessionStore::new(&cx, storage.clone(), &config);
        let http = HttpClient::new(
            Rc::clone(&config),
            transport.clone(),
            cookies.clone(),
            session.clone(),
        );
        let router = Rc::new(ViewRouter::new(session.clone()));

        let navigations = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&navigations);
        let mut navigator = MockNavigate::new();
        navigator
            .expect_navigate()
            .returning_st(move |route| recorded.borrow_mut().push(route.clone()));
        router.attach(Rc::new(navigator) as Rc<dyn Navigate>);
        let notices = NoticeBoard::new(&cx);
        let expiry = redirect_on_expiry(&session, Rc::downgrade(&router), notices.clone());

        Self {
            cx,
            transport,
            cookies,
            storage,
            session,
            notices,
            router,
            api: UbuntuCapApi::new(http),
            navigations,
            _expiry: expiry,
        }
    }

    /// Same as [`new`](Self::new) with a signed-in user.
    pub fn signed_in() -> Self {
        let harness = Self::new();
        harness.session.set_user(sample_user());
        harness
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.navigations.borrow().clone()
    }

    pub fn last_navigation(&self) -> Option<Route> {
        self.navigations.borrow().last().cloned()
    }

    /// Messages of the notices currently shown.
    pub fn notice_messages(&self) -> Vec<String> {
        self.notices
            .notices()
            .into_iter()
            .map(|notice| notice.message)
            .collect()
    }
}

pub fn sample_user() -> User {
    serde_json::from_value(json!({
        "id": 7,
        "first_name": "Amina",
        "last_name": "Otieno",
        "email": "amina@example.com",
        "phone_number": "+254712345678",
        "id_number": "12345678",
        "is_verified": true
    }))
    .expect("sample user")
}
