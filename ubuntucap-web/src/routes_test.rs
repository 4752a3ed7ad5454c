//! Tests for the routing system
//!
//! Covers navigation tokens, the authentication guard, and the router used
//! by code outside the component tree.

#[cfg(test)]
mod tests {
    use crate::routes::{MockNavigate, Route, ViewRouter, guard};
    use crate::session::{MemoryStorage, SessionStore};
    use mockall::predicate::eq;
    use shared::ClientConfig;
    use shared::models::User;
    use std::rc::Rc;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    fn session() -> SessionStore {
        SessionStore::new(
            &yewdux::Context::new(),
            Rc::new(MemoryStorage::new()),
            &ClientConfig::with_defaults(),
        )
    }

    /// Tests every routable page has a token that resolves back to it
    #[test]
    fn test_token_round_trip() {
        for route in Route::iter().filter(|route| *route != Route::NotFound) {
            let route = match route {
                Route::LoanDetails { .. } => Route::LoanDetails { id: "42".into() },
                other => other,
            };
            assert_eq!(Route::from_token(&route.token()), Some(route.clone()), "{route:?}");
        }
    }

    #[test_case("#/dashboard", Some(Route::Dashboard) ; "hash prefix")]
    #[test_case("", Some(Route::Home) ; "empty is home")]
    #[test_case("loan: 17 ", Some(Route::LoanDetails { id: "17".into() }) ; "loan id trimmed")]
    #[test_case("loan:", None ; "loan without id")]
    #[test_case("wallet", None ; "unknown")]
    fn test_from_token(token: &str, expected: Option<Route>) {
        assert_eq!(Route::from_token(token), expected);
    }

    #[test_case(Route::Credit, false, Route::Login ; "protected page as guest")]
    #[test_case(Route::Login, true, Route::Dashboard ; "login when signed in")]
    #[test_case(Route::About, true, Route::About ; "public page when signed in")]
    #[test_case(Route::About, false, Route::About ; "public page as guest")]
    #[test_case(Route::Profile, true, Route::Profile ; "protected page when signed in")]
    fn test_guard(route: Route, authenticated: bool, expected: Route) {
        assert_eq!(guard(route, authenticated), expected);
    }

    #[test]
    fn test_section_groups_subpages() {
        assert_eq!(Route::LoanDetails { id: "1".into() }.section(), Route::Loans);
        assert_eq!(Route::MpesaRepayment.section(), Route::Mpesa);
        assert_eq!(Route::About.section(), Route::About);
    }

    #[test]
    fn test_navigation_depends_on_session() {
        assert!(Route::navigation(true).contains(&Route::Dashboard));
        assert!(!Route::navigation(false).contains(&Route::Dashboard));
        assert!(Route::navigation(false).iter().all(|route| !route.requires_auth()));
    }

    /// Tests navigation requested before the router mounts is replayed
    #[test]
    fn test_pending_navigation_replayed_on_attach() {
        let router = ViewRouter::new(session());
        assert_eq!(router.navigate(Route::About), Route::About);

        let mut navigator = MockNavigate::new();
        navigator
            .expect_navigate()
            .with(eq(Route::About))
            .times(1)
            .return_const(());
        router.attach(Rc::new(navigator));
    }

    #[test]
    fn test_dispatch_applies_guard() {
        let session = session();
        let router = ViewRouter::new(session.clone());
        let mut navigator = MockNavigate::new();
        navigator
            .expect_navigate()
            .with(eq(Route::Login))
            .times(1)
            .return_const(());
        navigator
            .expect_navigate()
            .with(eq(Route::Dashboard))
            .times(1)
            .return_const(());
        router.attach(Rc::new(navigator));

        assert_eq!(router.dispatch("credit"), Some(Route::Login));
        session.set_user(User::default());
        assert_eq!(router.dispatch("login"), Some(Route::Dashboard));
    }

    /// Tests an unknown token navigates nowhere
    #[test]
    fn test_dispatch_ignores_unknown_token() {
        let router = ViewRouter::new(session());
        let mut navigator = MockNavigate::new();
        navigator.expect_navigate().never();
        router.attach(Rc::new(navigator));

        assert_eq!(router.dispatch("wallet"), None);
    }
}
