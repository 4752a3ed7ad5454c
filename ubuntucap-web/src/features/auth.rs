//! Sign-in, registration, phone verification and password reset.

use super::{Feature, action_failed};
use crate::api::UbuntuCapApi;
use crate::http::ApiError;
use crate::notify::NoticeBoard;
use crate::routes::{Route, ViewRouter};
use crate::session::SessionStore;
use shared::FieldErrors;
use shared::models::PasswordResetRequest;
use shared::validation::{
    LoginForm, PasswordResetForm, RegistrationForm, VERIFICATION_FIELDS, validate_phone_number,
    validate_verification,
};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};
use yewdux::{Context, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Login,
    Register,
    Verify,
    ResetRequest,
    ResetConfirm,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct AuthState {
    pub form_errors: FieldErrors,
    /// Form-level error, e.g. rejected credentials.
    pub error: Option<String>,
    pub submitting: bool,
    /// Phone number carried from registration or reset request to the code
    /// entry step.
    pub pending_phone: Option<String>,
}

/// Manages the signed-out views and the session transitions they cause.
#[derive(Clone)]
pub struct AuthManager {
    feature: Rc<Feature<AuthView, AuthState>>,
    api: UbuntuCapApi,
    session: SessionStore,
    notices: NoticeBoard,
    router: Rc<ViewRouter>,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    pub fn new(
        cx: &Context,
        api: UbuntuCapApi,
        session: SessionStore,
        notices: NoticeBoard,
        router: Rc<ViewRouter>,
    ) -> Self {
        Self {
            feature: Feature::new("auth", AuthView::Login, cx),
            api,
            session,
            notices,
            router,
        }
    }

    pub fn view(&self) -> AuthView {
        self.feature.view()
    }

    pub fn snapshot(&self) -> AuthState {
        self.feature.state()
    }

    pub fn state(&self) -> AuthState {
        self.feature.state()
    }

    fn show(&self, view: AuthView) {
        if self.feature.view() == view && self.feature.generation() > 0 {
            return;
        }
        let _ticket = self.feature.enter(view, |state| {
            state.form_errors = FieldErrors::new();
            state.error = None;
            state.submitting = false;
        });
    }

    pub fn show_login(&self) {
        self.show(AuthView::Login);
    }

    pub fn show_register(&self) {
        self.show(AuthView::Register);
    }

    pub fn show_verify(&self) {
        self.show(AuthView::Verify);
    }

    pub fn show_reset_request(&self) {
        self.show(AuthView::ResetRequest);
    }

    pub fn show_reset_confirm(&self) {
        self.show(AuthView::ResetConfirm);
    }

    /// Marks the form as submitting. Returns false while a submission is
    /// already running.
    fn begin(&self) -> bool {
        if self.feature.with_state(|state| state.submitting) {
            debug!("ignoring duplicate submission");
            return false;
        }
        self.feature.update(|state| {
            state.submitting = true;
            state.error = None;
            state.form_errors = FieldErrors::new();
        });
        true
    }

    fn invalid(&self, errors: FieldErrors) -> bool {
        self.feature.update(|state| {
            state.form_errors = errors;
            state.submitting = false;
        });
        false
    }

    fn failed(&self, operation: &str, form_fields: &[&str], err: &ApiError) -> bool {
        // A rejected sign-in is a 401 for a guest; it belongs on the form.
        let error = (err.is_unauthorized() && !self.session.is_authenticated()).then(|| match err {
            ApiError::Unauthorized { message } if !message.is_empty() => message.clone(),
            _ => "Invalid phone number or password".to_string(),
        });
        let form_errors = if error.is_some() {
            FieldErrors::new()
        } else {
            action_failed(&self.notices, operation, form_fields, err)
        };
        self.feature.update(|state| {
            state.submitting = false;
            state.error = error;
            state.form_errors = form_errors;
        });
        false
    }

    /// Signs in and goes to the dashboard. Returns whether it succeeded.
    pub async fn login(&self, form: &LoginForm) -> bool {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => return self.invalid(errors),
        };
        if !self.begin() {
            return false;
        }
        match self.api.login(&request).await {
            Ok(response) => {
                info!(user_id = %response.user.id, "signed in");
                self.session.set_user(response.user);
                self.feature.update(|state| state.submitting = false);
                self.notices
                    .success(response.message.unwrap_or_else(|| "Welcome back!".to_string()));
                self.router.navigate(Route::Dashboard);
                true
            }
            Err(err) => self.failed("Login", LoginForm::FIELDS, &err),
        }
    }

    /// Creates the account and moves on to phone verification.
    pub async fn register(&self, form: &RegistrationForm) -> bool {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => return self.invalid(errors),
        };
        if !self.begin() {
            return false;
        }
        match self.api.register(&request).await {
            Ok(response) => {
                info!(user_id = ?response.user_id, "registered");
                let phone = request.phone_number.clone();
                let _ticket = self.feature.enter(AuthView::Verify, move |state| {
                    state.submitting = false;
                    state.pending_phone = Some(phone);
                });
                self.notices.success(response.message.unwrap_or_else(|| {
                    "Registration successful. Enter the code sent to your phone.".to_string()
                }));
                self.router.navigate(Route::Verify);
                true
            }
            Err(err) => self.failed("Registration", RegistrationForm::FIELDS, &err),
        }
    }

    /// Confirms the phone number captured at registration with `code`.
    pub async fn verify(&self, phone_number: &str, code: &str) -> bool {
        let phone = if phone_number.trim().is_empty() {
            self.feature
                .with_state(|state| state.pending_phone.clone())
                .unwrap_or_default()
        } else {
            phone_number.to_string()
        };
        let request = match validate_verification(&phone, code) {
            Ok(request) => request,
            Err(errors) => return self.invalid(errors),
        };
        if !self.begin() {
            return false;
        }
        match self.api.verify_phone(&request).await {
            Ok(ack) => {
                let _ticket = self.feature.enter(AuthView::Login, |state| {
                    state.submitting = false;
                    state.pending_phone = None;
                });
                self.notices.success(
                    ack.message
                        .unwrap_or_else(|| "Phone verified. You can now log in.".to_string()),
                );
                self.router.navigate(Route::Login);
                true
            }
            Err(err) => self.failed("Verification", VERIFICATION_FIELDS, &err),
        }
    }

    /// Asks for a reset code and moves on to the confirmation step.
    pub async fn request_reset(&self, phone_number: &str) -> bool {
        let Some(phone_number) = validate_phone_number(phone_number) else {
            return self.invalid(FieldErrors::new().with(
                "phone_number",
                "Please enter a valid Kenyan phone number (e.g., 0712345678)",
            ));
        };
        if !self.begin() {
            return false;
        }
        let request = PasswordResetRequest {
            phone_number: phone_number.clone(),
        };
        match self.api.request_password_reset(&request).await {
            Ok(ack) => {
                let _ticket = self.feature.enter(AuthView::ResetConfirm, move |state| {
                    state.submitting = false;
                    state.pending_phone = Some(phone_number);
                });
                self.notices.info(
                    ack.message
                        .unwrap_or_else(|| "A reset code has been sent to your phone.".to_string()),
                );
                true
            }
            Err(err) => self.failed("Password reset", &["phone_number"], &err),
        }
    }

    pub async fn confirm_reset(&self, form: &PasswordResetForm) -> bool {
        let mut form = form.clone();
        if form.phone_number.trim().is_empty() {
            form.phone_number = self
                .feature
                .with_state(|state| state.pending_phone.clone())
                .unwrap_or_default();
        }
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => return self.invalid(errors),
        };
        if !self.begin() {
            return false;
        }
        match self.api.confirm_password_reset(&request).await {
            Ok(ack) => {
                let _ticket = self.feature.enter(AuthView::Login, |state| {
                    state.submitting = false;
                    state.pending_phone = None;
                });
                self.notices.success(ack.message.unwrap_or_else(|| {
                    "Password reset successful. Please log in.".to_string()
                }));
                self.router.navigate(Route::Login);
                true
            }
            Err(err) => self.failed("Password reset", PasswordResetForm::FIELDS, &err),
        }
    }

    /// Ends the session locally even when the server call fails.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            warn!("logout request failed: {err}");
        }
        self.session.clear_user();
        self.notices.info("You have been logged out.");
        self.router.navigate(Route::Login);
    }

    /// Primes CSRF and asks the server whether a session cookie is still
    /// valid. A guest who gets a 401 stays where they are.
    pub async fn bootstrap(&self) {
        if !self.api.prime_csrf().await {
            debug!("no CSRF token issued at bootstrap");
        }
        match self.api.profile().await {
            Ok(user) => {
                if self.session.is_authenticated() {
                    self.session.update_user(user);
                } else {
                    info!(user_id = %user.id, "restored server session");
                    self.session.set_user(user);
                }
            }
            Err(err) if err.is_unauthorized() => debug!("no server session"),
            Err(err) => warn!("session check failed: {err}"),
        }
    }

    /// Back to a blank login form.
    pub fn reset(&self) {
        self.feature.cancel();
        let _ticket = self
            .feature
            .enter(AuthView::Login, |state| *state = AuthState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::testing::{Harness, sample_user};
    use crate::http::Method;
    use serde_json::json;

    fn manager(harness: &Harness) -> AuthManager {
        AuthManager::new(
            &harness.cx,
            harness.api.clone(),
            harness.session.clone(),
            harness.notices.clone(),
            Rc::clone(&harness.router),
        )
    }

    fn login_form() -> LoginForm {
        LoginForm {
            phone_number: "0712345678".into(),
            password: "Secret123".into(),
        }
    }

    /// Tests a successful login signs in and heads for the dashboard
    #[tokio::test]
    async fn test_login_success() {
        let harness = Harness::new();
        harness.transport.respond(
            Method::Post,
            "users/login/",
            200,
            json!({"success": true, "user": {"first_name": "John"}}),
        );
        let auth = manager(&harness);

        assert!(auth.login(&login_form()).await);
        assert!(harness.session.is_authenticated());
        assert_eq!(harness.session.user_name(), "John");
        assert_eq!(harness.last_navigation(), Some(Route::Dashboard));

        let request = &harness.transport.requests()[0];
        assert_eq!(
            request.body,
            Some(json!({"phone_number": "+254712345678", "password": "Secret123"}))
        );
    }

    /// Tests invalid input never reaches the server
    #[tokio::test]
    async fn test_login_validation_blocks_request() {
        let harness = Harness::new();
        let auth = manager(&harness);
        let form = LoginForm {
            phone_number: "12345".into(),
            password: String::new(),
        };

        assert!(!auth.login(&form).await);
        assert!(harness.transport.requests().is_empty());
        let state = auth.snapshot();
        assert!(state.form_errors.contains("phone_number"));
        assert!(state.form_errors.contains("password"));
    }

    /// Tests rejected credentials stay on the form
    #[tokio::test]
    async fn test_login_rejected() {
        let harness = Harness::new();
        harness.transport.respond(
            Method::Post,
            "users/login/",
            400,
            json!({"success": false, "message": "Invalid credentials"}),
        );
        let auth = manager(&harness);

        assert!(!auth.login(&login_form()).await);
        assert!(!harness.session.is_authenticated());
        assert!(harness.navigations().is_empty());
        assert_eq!(harness.notice_messages(), vec!["Invalid credentials"]);
        assert!(!auth.snapshot().submitting);
    }

    #[tokio::test]
    async fn test_login_unauthorized_shown_on_form() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Post, "users/login/", 401, json!({"detail": "Wrong password"}));
        let auth = manager(&harness);

        assert!(!auth.login(&login_form()).await);
        assert_eq!(auth.snapshot().error.as_deref(), Some("Wrong password"));
        assert!(harness.navigations().is_empty());
    }

    /// Tests registration hands the phone number to the verify step
    #[tokio::test]
    async fn test_register_moves_to_verify() {
        let harness = Harness::new();
        harness.transport.respond(
            Method::Post,
            "users/register/",
            201,
            json!({"success": true, "message": "Check your phone", "user_id": "u-1"}),
        );
        let auth = manager(&harness);
        let form = RegistrationForm {
            first_name: "Amina".into(),
            last_name: "Otieno".into(),
            email: "amina@example.com".into(),
            phone_number: "0712345678".into(),
            id_number: "12345678".into(),
            password: "Secret123".into(),
            password_confirm: "Secret123".into(),
        };

        assert!(auth.register(&form).await);
        assert_eq!(auth.view(), AuthView::Verify);
        assert_eq!(auth.snapshot().pending_phone.as_deref(), Some("+254712345678"));
        assert_eq!(harness.last_navigation(), Some(Route::Verify));

        harness
            .transport
            .respond(Method::Post, "users/verify-phone/", 200, json!({"success": true}));
        assert!(auth.verify("", "123456").await);
        assert_eq!(auth.view(), AuthView::Login);
        assert_eq!(
            harness.transport.requests()[1].body,
            Some(json!({"phone_number": "+254712345678", "code": "123456"}))
        );
    }

    #[tokio::test]
    async fn test_register_field_errors_inline() {
        let harness = Harness::new();
        harness.transport.respond(
            Method::Post,
            "users/register/",
            400,
            json!({"phone_number": ["A user with this phone number already exists."]}),
        );
        let auth = manager(&harness);
        let form = RegistrationForm {
            first_name: "Amina".into(),
            last_name: "Otieno".into(),
            email: "amina@example.com".into(),
            phone_number: "0712345678".into(),
            id_number: "12345678".into(),
            password: "Secret123".into(),
            password_confirm: "Secret123".into(),
        };

        assert!(!auth.register(&form).await);
        assert_eq!(
            auth.snapshot().form_errors.first("phone_number"),
            Some("A user with this phone number already exists.")
        );
        assert!(harness.notices.notices().is_empty());
        assert_eq!(auth.view(), AuthView::Login);
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Post, "users/password-reset/", 200, json!({"success": true}));
        harness.transport.respond(
            Method::Post,
            "users/password-reset-confirm/",
            200,
            json!({"success": true}),
        );
        let auth = manager(&harness);

        assert!(auth.request_reset("0712 345 678").await);
        assert_eq!(auth.view(), AuthView::ResetConfirm);
        let form = PasswordResetForm {
            phone_number: String::new(),
            code: "654321".into(),
            new_password: "Newpass123".into(),
            new_password_confirm: "Newpass123".into(),
        };
        assert!(auth.confirm_reset(&form).await);
        assert_eq!(auth.view(), AuthView::Login);
        assert_eq!(harness.last_navigation(), Some(Route::Login));
    }

    /// Tests logout clears the session even if the server is down
    #[tokio::test]
    async fn test_logout_always_clears() {
        let harness = Harness::signed_in();
        let auth = manager(&harness);

        auth.logout().await;
        assert!(!harness.session.is_authenticated());
        assert_eq!(harness.last_navigation(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_bootstrap_restores_server_session() {
        let harness = Harness::new();
        harness
            .transport
            .respond(Method::Get, "users/profile/", 200, json!({"user": sample_user()}));
        let auth = manager(&harness);

        auth.bootstrap().await;
        assert!(harness.session.is_authenticated());
        assert_eq!(harness.session.user_id().as_deref(), Some("7"));
    }

    /// Tests a guest session check rejected with 401 does not redirect
    #[tokio::test]
    async fn test_bootstrap_guest_stays_put() {
        let harness = Harness::new();
        harness.transport.respond(
            Method::Get,
            "users/profile/",
            401,
            json!({"detail": "Authentication credentials were not provided."}),
        );
        let auth = manager(&harness);

        auth.bootstrap().await;
        assert!(!harness.session.is_authenticated());
        assert!(harness.navigations().is_empty());
    }

    #[test]
    fn test_show_twice_enters_once() {
        let harness = Harness::new();
        let auth = manager(&harness);
        auth.show_register();
        let generation = auth.feature.generation();
        auth.show_register();
        assert_eq!(auth.feature.generation(), generation);
    }
}
