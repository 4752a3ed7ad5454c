//! The user's profile and data-use consents.

use super::{Feature, Loadable, action_failed};
use crate::api::UbuntuCapApi;
use crate::notify::NoticeBoard;
use crate::routes::{Route, ViewRouter};
use crate::session::SessionStore;
use rust_decimal::Decimal;
use shared::FieldErrors;
use shared::models::{ConsentRequest, ConsentType, ProfileUpdate, User};
use shared::validation::validate_email;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, info};
use yewdux::{Context, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileView {
    Overview,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct ProfileState {
    pub profile: Loadable<User>,
    pub form_errors: FieldErrors,
    pub saving: bool,
    /// Consent with a request in flight.
    pub pending_consent: Option<ConsentType>,
}

/// Checks an edit before it is sent. Blank fields are dropped so the
/// backend keeps their stored values.
///
/// # Errors
/// Field errors keyed like the update payload.
pub fn validate_update(update: ProfileUpdate) -> Result<ProfileUpdate, FieldErrors> {
    let mut update = update.without_blanks();
    let mut errors = FieldErrors::new();
    if update.first_name.is_none() {
        errors.insert("first_name", "First name is required");
    }
    if update.last_name.is_none() {
        errors.insert("last_name", "Last name is required");
    }
    if update.email.as_deref().is_some_and(|email| !validate_email(email)) {
        errors.insert("email", "Please enter a valid email address");
    }
    if let Some(income) = update.monthly_income.take() {
        let cleaned = income.replace(',', "");
        match Decimal::from_str(&cleaned) {
            Ok(value) if value >= Decimal::ZERO => update.monthly_income = Some(cleaned),
            _ => errors.insert("monthly_income", "Monthly income must be a positive number"),
        }
    }
    if errors.is_empty() {
        Ok(update)
    } else {
        Err(errors)
    }
}

#[derive(Clone)]
pub struct ProfileManager {
    feature: Rc<Feature<ProfileView, ProfileState>>,
    api: UbuntuCapApi,
    session: SessionStore,
    notices: NoticeBoard,
    router: Rc<ViewRouter>,
}

impl fmt::Debug for ProfileManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileManager")
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl ProfileManager {
    pub fn new(
        cx: &Context,
        api: UbuntuCapApi,
        session: SessionStore,
        notices: NoticeBoard,
        router: Rc<ViewRouter>,
    ) -> Self {
        Self {
            feature: Feature::new("profile", ProfileView::Overview, cx),
            api,
            session,
            notices,
            router,
        }
    }

    pub fn view(&self) -> ProfileView {
        self.feature.view()
    }

    pub fn snapshot(&self) -> ProfileState {
        self.feature.state()
    }

    pub async fn show_overview(&self) {
        self.show(ProfileView::Overview).await;
    }

    /// The edit form, seeded from the freshest copy of the profile.
    pub async fn show_edit(&self) {
        self.show(ProfileView::Edit).await;
    }

    async fn show(&self, view: ProfileView) {
        let cached = self.session.get_user();
        let ticket = self.feature.enter(view, |state| {
            state.form_errors = FieldErrors::new();
            state.profile = cached.map_or(Loadable::Loading, Loadable::Ready);
        });
        let api = self.api.clone();
        let session = self.session.clone();
        self.feature
            .load(
                ticket,
                "Loading profile",
                async move {
                    let user = api.profile().await?;
                    if session.is_authenticated() {
                        session.update_user(user.clone());
                    }
                    Ok(user)
                },
                |state, profile| state.profile = profile,
            )
            .await;
    }

    /// Saves the edit form and returns to the overview.
    pub async fn save(&self, update: ProfileUpdate) -> bool {
        let update = match validate_update(update) {
            Ok(update) => update,
            Err(errors) => {
                self.feature.update(|state| state.form_errors = errors);
                return false;
            }
        };
        if self.feature.with_state(|state| state.saving) {
            debug!("profile save already running");
            return false;
        }
        self.feature.update(|state| {
            state.saving = true;
            state.form_errors = FieldErrors::new();
        });

        match self.api.update_profile(&update).await {
            Ok(user) => {
                info!(user_id = %user.id, "profile updated");
                self.session.update_user(user.clone());
                let _ticket = self.feature.enter(ProfileView::Overview, move |state| {
                    state.saving = false;
                    state.profile = Loadable::Ready(user);
                });
                self.notices.success("Profile updated successfully.");
                self.router.navigate(Route::Profile);
                true
            }
            Err(err) => {
                let errors =
                    action_failed(&self.notices, "Profile update", ProfileUpdate::FIELDS, &err);
                self.feature.update(|state| {
                    state.saving = false;
                    state.form_errors = errors;
                });
                false
            }
        }
    }

    pub async fn record_consent(&self, consent_type: ConsentType, consented: bool) -> bool {
        if self.feature.with_state(|state| state.pending_consent.is_some()) {
            return false;
        }
        self.feature
            .update(|state| state.pending_consent = Some(consent_type));
        let request = ConsentRequest {
            consent_type,
            consented,
        };
        let outcome = self.api.record_consent(&request).await;
        self.feature.update(|state| state.pending_consent = None);
        match outcome {
            Ok(ack) => {
                info!(%consent_type, consented, "consent recorded");
                self.notices.success(
                    ack.message
                        .unwrap_or_else(|| "Your preference has been saved.".to_string()),
                );
                true
            }
            Err(err) => {
                action_failed(&self.notices, "Saving consent", &[], &err);
                false
            }
        }
    }

    pub fn reset(&self) {
        self.feature.cancel();
        self.feature.update(|state| *state = ProfileState::default());
    }
}
