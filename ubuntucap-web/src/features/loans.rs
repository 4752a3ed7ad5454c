//! Loan applications, the borrower's loans, and one loan's repayments.

use super::{Feature, Loadable, action_failed};
use crate::api::UbuntuCapApi;
use crate::notify::NoticeBoard;
use crate::routes::{Route, ViewRouter};
use shared::FieldErrors;
use shared::models::{LoanApplicationReceipt, LoanDetails, LoanPortfolio};
use shared::validation::LoanApplicationForm;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};
use yewdux::{Context, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoansView {
    Application,
    List,
    Details,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct LoansState {
    pub portfolio: Loadable<LoanPortfolio>,
    pub details: Loadable<LoanDetails>,
    pub selected_loan_id: Option<String>,
    pub form_errors: FieldErrors,
    pub submitting: bool,
    /// The last successful submission.
    pub receipt: Option<LoanApplicationReceipt>,
}

#[derive(Clone)]
pub struct LoansManager {
    feature: Rc<Feature<LoansView, LoansState>>,
    api: UbuntuCapApi,
    notices: NoticeBoard,
    router: Rc<ViewRouter>,
}

impl fmt::Debug for LoansManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoansManager")
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl LoansManager {
    pub fn new(
        cx: &Context,
        api: UbuntuCapApi,
        notices: NoticeBoard,
        router: Rc<ViewRouter>,
    ) -> Self {
        Self {
            feature: Feature::new("loans", LoansView::List, cx),
            api,
            notices,
            router,
        }
    }

    pub fn view(&self) -> LoansView {
        self.feature.view()
    }

    pub fn snapshot(&self) -> LoansState {
        self.feature.state()
    }

    /// A blank application form.
    pub fn show_application(&self) {
        let _ticket = self.feature.enter(LoansView::Application, |state| {
            state.form_errors = FieldErrors::new();
            state.submitting = false;
        });
    }

    pub async fn show_list(&self) {
        let ticket = self.feature.enter(LoansView::List, |state| {
            state.portfolio = Loadable::Loading;
            state.selected_loan_id = None;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading loans",
                async move { api.my_loans().await },
                |state, portfolio| state.portfolio = portfolio,
            )
            .await;
    }

    pub async fn show_details(&self, loan_id: &str) {
        let id = loan_id.to_string();
        let ticket = self.feature.enter(LoansView::Details, |state| {
            state.details = Loadable::Loading;
            state.selected_loan_id = Some(id.clone());
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading loan details",
                async move { api.loan_details(&id).await },
                |state, details| state.details = details,
            )
            .await;
    }

    /// Validates and submits the form. Nothing is sent when validation
    /// fails or a submission is already running.
    pub async fn submit_application(&self, form: &LoanApplicationForm) -> bool {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.feature.update(|state| state.form_errors = errors);
                return false;
            }
        };
        if self.feature.with_state(|state| state.submitting) {
            debug!("ignoring duplicate loan submission");
            return false;
        }
        self.feature.update(|state| {
            state.submitting = true;
            state.form_errors = FieldErrors::new();
        });

        match self.api.submit_loan_application(&request).await {
            Ok(receipt) => {
                info!(application_id = ?receipt.application_id, "loan application submitted");
                self.notices.success(
                    receipt
                        .message
                        .clone()
                        .unwrap_or_else(|| "Loan application submitted successfully!".to_string()),
                );
                self.feature.update(|state| {
                    state.submitting = false;
                    state.receipt = Some(receipt);
                });
                self.router.navigate(Route::Loans);
                true
            }
            Err(err) => {
                let errors =
                    action_failed(&self.notices, "Loan application", LoanApplicationForm::FIELDS, &err);
                self.feature.update(|state| {
                    state.submitting = false;
                    state.form_errors = errors;
                });
                false
            }
        }
    }

    pub fn reset(&self) {
        self.feature.cancel();
        self.feature.update(|state| *state = LoansState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::testing::Harness;
    use crate::http::Method;
    use serde_json::json;

    const SUBMIT: &str = "loans/applications/submit/";

    fn manager(harness: &Harness) -> LoansManager {
        LoansManager::new(
            &harness.cx,
            harness.api.clone(),
            harness.notices.clone(),
            Rc::clone(&harness.router),
        )
    }

    fn form(amount: &str) -> LoanApplicationForm {
        LoanApplicationForm {
            amount: amount.into(),
            term_days: "90".into(),
            purpose: "BUSINESS".into(),
            notes: String::new(),
        }
    }

    /// Tests an out-of-range amount is rejected without a request
    #[tokio::test]
    async fn test_amount_below_minimum_sends_nothing() {
        let harness = Harness::signed_in();
        let loans = manager(&harness);
        loans.show_application();

        assert!(!loans.submit_application(&form("400")).await);
        assert!(harness.transport.requests().is_empty());
        assert!(loans.snapshot().form_errors.contains("amount"));
    }

    /// Tests a valid application is posted exactly once
    #[tokio::test]
    async fn test_valid_application_posts_once() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Post,
            SUBMIT,
            201,
            json!({"success": true, "message": "Submitted", "application": {"id": 31}}),
        );
        let loans = manager(&harness);
        loans.show_application();
        loans.show_application();

        assert!(loans.submit_application(&form("5000")).await);
        assert_eq!(harness.transport.count(Method::Post, SUBMIT), 1);
        assert_eq!(harness.transport.requests().len(), 1);
        let body = harness.transport.requests()[0].body.clone();
        assert_eq!(
            body,
            Some(json!({"amount": 5000, "term_days": 90, "purpose": "BUSINESS"}))
        );
        let receipt = loans.snapshot().receipt.expect("receipt stored");
        assert_eq!(receipt.application_id.as_deref(), Some("31"));
        assert_eq!(harness.last_navigation(), Some(Route::Loans));
    }

    #[tokio::test]
    async fn test_server_field_errors_inline() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Post,
            SUBMIT,
            400,
            json!({"success": false, "errors": {"amount": ["Exceeds your limit"]}}),
        );
        let loans = manager(&harness);

        assert!(!loans.submit_application(&form("50000")).await);
        let state = loans.snapshot();
        assert_eq!(state.form_errors.first("amount"), Some("Exceeds your limit"));
        assert!(!state.submitting);
        assert!(harness.navigations().is_empty());
    }

    /// Tests a rejection the form cannot show inline still reaches the user
    #[tokio::test]
    async fn test_pending_application_rejection_is_shown() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Post,
            SUBMIT,
            400,
            json!({
                "success": false,
                "message": "You already have a pending application",
                "errors": ["pending"]
            }),
        );
        let loans = manager(&harness);
        loans.show_application();

        assert!(!loans.submit_application(&form("5000")).await);
        assert_eq!(
            harness.notice_messages(),
            vec!["You already have a pending application"]
        );
        assert!(!loans.snapshot().submitting);
        assert!(harness.navigations().is_empty());
    }

    /// Tests inline field errors do not also raise a toast
    #[tokio::test]
    async fn test_inline_errors_not_duplicated_as_toast() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Post,
            SUBMIT,
            400,
            json!({"success": false, "errors": {"amount": ["Exceeds your limit"]}}),
        );
        let loans = manager(&harness);

        assert!(!loans.submit_application(&form("50000")).await);
        assert!(harness.notice_messages().is_empty());
    }

    #[tokio::test]
    async fn test_list_loaded() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Get,
            "loans/my-loans/",
            200,
            json!({
                "success": true,
                "loans": [{"id": 1, "status": "ACTIVE", "principal_amount": "5000.00"}],
                "applications": [{"id": 2, "status": "PENDING"}]
            }),
        );
        let loans = manager(&harness);

        loans.show_list().await;
        let state = loans.snapshot();
        let portfolio = state.portfolio.ready().expect("portfolio loaded");
        assert_eq!(portfolio.loans.len(), 1);
        assert_eq!(portfolio.applications.len(), 1);
        assert_eq!(portfolio.outstanding().count(), 1);
    }

    /// Tests switching loans mid-fetch keeps only the latest loan
    #[tokio::test]
    async fn test_stale_details_discarded() {
        let harness = Harness::signed_in();
        let gate = harness.transport.defer(
            Method::Get,
            "loans/my-loans/1/",
            200,
            json!({"loan": {"id": 1, "status": "ACTIVE"}}),
        );
        harness.transport.respond(
            Method::Get,
            "loans/my-loans/2/",
            200,
            json!({"loan": {"id": 2, "status": "PAID"}}),
        );
        let loans = manager(&harness);

        futures::join!(loans.show_details("1"), async {
            loans.show_details("2").await;
            drop(gate);
        });

        let state = loans.snapshot();
        assert_eq!(state.selected_loan_id.as_deref(), Some("2"));
        let details = state.details.ready().expect("details loaded");
        assert_eq!(details.loan.id, "2");
    }

    /// Tests a 401 from a loan call ends the session
    #[tokio::test]
    async fn test_unauthorized_redirects_to_login() {
        let harness = Harness::signed_in();
        harness
            .transport
            .respond(Method::Get, "loans/my-loans/", 401, json!({"detail": "expired"}));
        let loans = manager(&harness);

        loans.show_list().await;
        assert!(!harness.session.is_authenticated());
        assert_eq!(harness.last_navigation(), Some(Route::Login));
    }
}
