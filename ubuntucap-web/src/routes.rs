use crate::containers::layout::Layout;
use crate::context::use_app_context;
use crate::features::{AuthView, CreditView, LoansView, MpesaView, ProfileView};
use crate::models::app_state::AppState;
use crate::pages::{
    AboutPage, AuthPage, ContactPage, CreditPage, DashboardPage, ErrorPage, LandingPage,
    LoansPage, MpesaPage, ProfilePage,
};
use crate::session::SessionStore;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use strum::EnumIter;
use tracing::{debug, warn};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

/// The application routes.
#[derive(Debug, Clone, PartialEq, Eq, Routable, EnumIter)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/about")]
    About,
    #[at("/contact")]
    Contact,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/verify")]
    Verify,
    #[at("/reset-password")]
    ResetPassword,
    #[at("/dashboard")]
    Dashboard,
    #[at("/loans")]
    Loans,
    #[at("/loans/apply")]
    LoanApply,
    #[at("/loans/:id")]
    LoanDetails { id: String },
    #[at("/credit")]
    Credit,
    #[at("/credit/history")]
    CreditHistory,
    #[at("/credit/offers")]
    CreditOffers,
    #[at("/mpesa")]
    Mpesa,
    #[at("/mpesa/transactions")]
    MpesaTransactions,
    #[at("/mpesa/repay")]
    MpesaRepayment,
    #[at("/profile")]
    Profile,
    #[at("/profile/edit")]
    ProfileEdit,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Resolves a navigation token such as `"dashboard"` or `"loan:42"`.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().trim_start_matches('#').trim_start_matches('/');
        if let Some((kind, id)) = token.split_once(':') {
            return match kind {
                "loan" | "loans" if !id.trim().is_empty() => Some(Self::LoanDetails {
                    id: id.trim().to_string(),
                }),
                _ => None,
            };
        }
        let route = match token {
            "" | "home" | "landing" => Self::Home,
            "about" => Self::About,
            "contact" => Self::Contact,
            "login" => Self::Login,
            "register" | "signup" => Self::Register,
            "verify" => Self::Verify,
            "reset-password" | "forgot-password" => Self::ResetPassword,
            "dashboard" => Self::Dashboard,
            "loans" => Self::Loans,
            "apply" | "loan-apply" => Self::LoanApply,
            "credit" => Self::Credit,
            "credit-history" => Self::CreditHistory,
            "credit-offers" | "offers" => Self::CreditOffers,
            "mpesa" => Self::Mpesa,
            "mpesa-transactions" | "transactions" => Self::MpesaTransactions,
            "mpesa-repayment" | "repay" => Self::MpesaRepayment,
            "profile" => Self::Profile,
            "profile-edit" => Self::ProfileEdit,
            _ => return None,
        };
        Some(route)
    }

    /// The canonical token for this route.
    pub fn token(&self) -> String {
        match self {
            Self::Home => "home".into(),
            Self::About => "about".into(),
            Self::Contact => "contact".into(),
            Self::Login => "login".into(),
            Self::Register => "register".into(),
            Self::Verify => "verify".into(),
            Self::ResetPassword => "reset-password".into(),
            Self::Dashboard => "dashboard".into(),
            Self::Loans => "loans".into(),
            Self::LoanApply => "loan-apply".into(),
            Self::LoanDetails { id } => format!("loan:{id}"),
            Self::Credit => "credit".into(),
            Self::CreditHistory => "credit-history".into(),
            Self::CreditOffers => "credit-offers".into(),
            Self::Mpesa => "mpesa".into(),
            Self::MpesaTransactions => "mpesa-transactions".into(),
            Self::MpesaRepayment => "mpesa-repayment".into(),
            Self::Profile => "profile".into(),
            Self::ProfileEdit => "profile-edit".into(),
            Self::NotFound => "not-found".into(),
        }
    }

    /// Routes that need a signed-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Loans
                | Self::LoanApply
                | Self::LoanDetails { .. }
                | Self::Credit
                | Self::CreditHistory
                | Self::CreditOffers
                | Self::Mpesa
                | Self::MpesaTransactions
                | Self::MpesaRepayment
                | Self::Profile
                | Self::ProfileEdit
        )
    }

    /// Routes a signed-in user is sent away from.
    pub fn guest_only(&self) -> bool {
        matches!(
            self,
            Self::Home | Self::Login | Self::Register | Self::Verify | Self::ResetPassword
        )
    }

    /// Translation key of the route's navigation label.
    pub fn title_key(&self) -> &'static str {
        match self {
            Self::Home => "nav.home",
            Self::About => "nav.about",
            Self::Contact => "nav.contact",
            Self::Login => "nav.login",
            Self::Register => "nav.register",
            Self::Verify => "nav.verify",
            Self::ResetPassword => "nav.reset_password",
            Self::Dashboard => "nav.dashboard",
            Self::Loans | Self::LoanApply | Self::LoanDetails { .. } => "nav.loans",
            Self::Credit | Self::CreditHistory | Self::CreditOffers => "nav.credit",
            Self::Mpesa | Self::MpesaTransactions | Self::MpesaRepayment => "nav.mpesa",
            Self::Profile | Self::ProfileEdit => "nav.profile",
            Self::NotFound => "nav.not_found",
        }
    }

    /// Top-level section the route belongs to, for highlighting navigation.
    pub fn section(&self) -> Self {
        match self {
            Self::LoanApply | Self::LoanDetails { .. } => Self::Loans,
            Self::CreditHistory | Self::CreditOffers => Self::Credit,
            Self::MpesaTransactions | Self::MpesaRepayment => Self::Mpesa,
            Self::ProfileEdit => Self::Profile,
            other => other.clone(),
        }
    }

    /// Header navigation for a signed-in user or a guest.
    pub fn navigation(authenticated: bool) -> Vec<Self> {
        if authenticated {
            vec![
                Self::Dashboard,
                Self::Loans,
                Self::Credit,
                Self::Mpesa,
                Self::Profile,
            ]
        } else {
            vec![Self::Home, Self::About, Self::Contact]
        }
    }
}

/// Where a navigation request actually lands, given the session.
pub fn guard(route: Route, authenticated: bool) -> Route {
    if route.requires_auth() && !authenticated {
        Route::Login
    } else if route.guest_only() && authenticated {
        Route::Dashboard
    } else {
        route
    }
}

/// Performs a navigation. Implemented over the yew-router navigator in the
/// browser.
#[cfg_attr(test, mockall::automock)]
pub trait Navigate {
    fn navigate(&self, route: &Route);
}

/// [`Navigate`] over yew-router's history.
pub struct YewNavigator(Navigator);

impl YewNavigator {
    pub fn new(navigator: Navigator) -> Self {
        Self(navigator)
    }
}

impl fmt::Debug for YewNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("YewNavigator")
    }
}

impl Navigate for YewNavigator {
    fn navigate(&self, route: &Route) {
        self.0.push(route);
    }
}

/// Token dispatch and guarded navigation for code outside the component
/// tree: feature managers and the session expiry handler.
///
/// Requests made before the router is mounted are held and replayed when a
/// navigator attaches.
pub struct ViewRouter {
    session: SessionStore,
    navigator: RefCell<Option<Rc<dyn Navigate>>>,
    pending: RefCell<Option<Route>>,
}

impl fmt::Debug for ViewRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRouter")
            .field("attached", &self.navigator.borrow().is_some())
            .field("pending", &self.pending.borrow())
            .finish_non_exhaustive()
    }
}

impl ViewRouter {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            navigator: RefCell::new(None),
            pending: RefCell::new(None),
        }
    }

    pub fn attach(&self, navigator: Rc<dyn Navigate>) {
        *self.navigator.borrow_mut() = Some(Rc::clone(&navigator));
        let pending = self.pending.borrow_mut().take();
        if let Some(route) = pending {
            let route = guard(route, self.session.is_authenticated());
            debug!(?route, "replaying navigation");
            navigator.navigate(&route);
        }
    }

    pub fn detach(&self) {
        self.navigator.borrow_mut().take();
    }

    /// Navigates to `route` after the authentication guard; returns where
    /// the request was sent.
    pub fn navigate(&self, route: Route) -> Route {
        let target = guard(route, self.session.is_authenticated());
        let navigator = self.navigator.borrow().clone();
        match navigator {
            Some(navigator) => navigator.navigate(&target),
            None => *self.pending.borrow_mut() = Some(target.clone()),
        }
        target
    }

    /// Navigates by token. Unknown tokens are logged and ignored.
    pub fn dispatch(&self, token: &str) -> Option<Route> {
        match Route::from_token(token) {
            Some(route) => Some(self.navigate(route)),
            None => {
                warn!(token, "ignoring unknown navigation token");
                None
            }
        }
    }
}

/// Hands the yew-router navigator to the [`ViewRouter`] once the router is
/// mounted.
#[function_component(RouterBridge)]
pub fn router_bridge() -> Html {
    let context = use_app_context();
    let navigator = use_navigator();

    use_effect_with(navigator, move |navigator| {
        if let Some(navigator) = navigator.clone() {
            context
                .router
                .attach(Rc::new(YewNavigator::new(navigator)));
        }
        move || context.router.detach()
    });

    html! {}
}

#[derive(Properties, PartialEq)]
pub struct RouteViewProps {
    pub route: Route,
}

#[function_component(RouteView)]
fn route_view(props: &RouteViewProps) -> Html {
    let is_authenticated = use_selector(|state: &AppState| state.is_authenticated);
    let requested = props.route.clone();
    let target = guard(requested.clone(), *is_authenticated);
    if target != requested {
        return html! { <Redirect<Route> to={target} /> };
    }

    let page = match requested.clone() {
        Route::Home => html! { <LandingPage /> },
        Route::About => html! { <AboutPage /> },
        Route::Contact => html! { <ContactPage /> },
        Route::Login => html! { <AuthPage view={AuthView::Login} /> },
        Route::Register => html! { <AuthPage view={AuthView::Register} /> },
        Route::Verify => html! { <AuthPage view={AuthView::Verify} /> },
        Route::ResetPassword => html! { <AuthPage view={AuthView::ResetRequest} /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Loans => html! { <LoansPage view={LoansView::List} /> },
        Route::LoanApply => html! { <LoansPage view={LoansView::Application} /> },
        Route::LoanDetails { id } => {
            html! { <LoansPage view={LoansView::Details} loan_id={Some(id)} /> }
        }
        Route::Credit => html! { <CreditPage view={CreditView::Overview} /> },
        Route::CreditHistory => html! { <CreditPage view={CreditView::History} /> },
        Route::CreditOffers => html! { <CreditPage view={CreditView::Offers} /> },
        Route::Mpesa => html! { <MpesaPage view={MpesaView::Profile} /> },
        Route::MpesaTransactions => html! { <MpesaPage view={MpesaView::Transactions} /> },
        Route::MpesaRepayment => html! { <MpesaPage view={MpesaView::Repayment} /> },
        Route::Profile => html! { <ProfilePage view={ProfileView::Overview} /> },
        Route::ProfileEdit => html! { <ProfilePage view={ProfileView::Edit} /> },
        Route::NotFound => html! { <ErrorPage /> },
    };

    html! {
        <Layout current_route={Some(requested)}>
            {page}
        </Layout>
    }
}

/// Switch function for the application routes.
pub fn switch(route: Route) -> Html {
    debug!(?route, "switching route");
    html! { <RouteView {route} /> }
}
