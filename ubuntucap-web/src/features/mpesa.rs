//! M-Pesa financial profile, statement, and STK push repayments.

use super::{Feature, Loadable, action_failed};
use crate::api::UbuntuCapApi;
use crate::notify::NoticeBoard;
use crate::session::SessionStore;
use shared::FieldErrors;
use shared::models::{
    Loan, MpesaProfile, RepaymentInitiation, SimulationRequest, TransactionHistory,
};
use shared::validation::RepaymentForm;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};
use yewdux::{Context, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpesaView {
    Profile,
    Transactions,
    Repayment,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct MpesaState {
    /// `Ready(None)` until the first analysis has run.
    pub profile: Loadable<Option<MpesaProfile>>,
    pub transactions: Loadable<TransactionHistory>,
    /// Loans with a balance left, offered on the repayment form.
    pub repayable: Loadable<Vec<Loan>>,
    /// An analysis or simulation is running.
    pub working: bool,
    pub form_errors: FieldErrors,
    pub submitting: bool,
    pub last_initiation: Option<RepaymentInitiation>,
}

#[derive(Clone)]
pub struct MpesaManager {
    feature: Rc<Feature<MpesaView, MpesaState>>,
    api: UbuntuCapApi,
    session: SessionStore,
    notices: NoticeBoard,
}

impl fmt::Debug for MpesaManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MpesaManager")
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl MpesaManager {
    pub fn new(
        cx: &Context,
        api: UbuntuCapApi,
        session: SessionStore,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            feature: Feature::new("mpesa", MpesaView::Profile, cx),
            api,
            session,
            notices,
        }
    }

    pub fn view(&self) -> MpesaView {
        self.feature.view()
    }

    pub fn snapshot(&self) -> MpesaState {
        self.feature.state()
    }

    /// Phone number to prefill the repayment form with.
    pub fn default_phone(&self) -> String {
        self.session.user_phone().unwrap_or_default()
    }

    pub async fn show_profile(&self) {
        let ticket = self.feature.enter(MpesaView::Profile, |state| {
            state.profile = Loadable::Loading;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading M-Pesa profile",
                async move { api.mpesa_profile().await },
                |state, profile| state.profile = profile,
            )
            .await;
    }

    pub async fn show_transactions(&self) {
        let ticket = self.feature.enter(MpesaView::Transactions, |state| {
            state.transactions = Loadable::Loading;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading transactions",
                async move { api.transaction_history().await },
                |state, transactions| state.transactions = transactions,
            )
            .await;
    }

    /// The repayment form, with the loans that can still be repaid.
    pub async fn show_repayment(&self) {
        let ticket = self.feature.enter(MpesaView::Repayment, |state| {
            state.repayable = Loadable::Loading;
            state.form_errors = FieldErrors::new();
            state.submitting = false;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading loans",
                async move {
                    let portfolio = api.my_loans().await?;
                    Ok(portfolio.outstanding().cloned().collect::<Vec<_>>())
                },
                |state, loans| state.repayable = loans,
            )
            .await;
    }

    /// Asks the backend to re-analyze the statement, then reloads the profile.
    pub async fn refresh_analysis(&self) -> bool {
        if !self.begin_work() {
            return false;
        }
        let outcome = self.api.analyze_transactions().await;
        self.feature.update(|state| state.working = false);
        match outcome {
            Ok(ack) => {
                self.notices.success(
                    ack.message
                        .unwrap_or_else(|| "M-Pesa analysis refreshed.".to_string()),
                );
                self.show_profile().await;
                true
            }
            Err(err) => {
                action_failed(&self.notices, "M-Pesa analysis", &[], &err);
                false
            }
        }
    }

    /// Generates sample statement data for accounts without a real one.
    pub async fn simulate(&self) -> bool {
        if !self.begin_work() {
            return false;
        }
        let outcome = self
            .api
            .simulate_transactions(&SimulationRequest::default())
            .await;
        self.feature.update(|state| state.working = false);
        match outcome {
            Ok(result) => {
                info!(created = result.transactions_created, "simulated transactions");
                self.notices.success(result.message.unwrap_or_else(|| {
                    format!(
                        "Generated {} sample transactions.",
                        result.transactions_created
                    )
                }));
                self.show_profile().await;
                true
            }
            Err(err) => {
                action_failed(&self.notices, "Generating sample data", &[], &err);
                false
            }
        }
    }

    fn begin_work(&self) -> bool {
        if self.feature.with_state(|state| state.working) {
            debug!("M-Pesa operation already running");
            return false;
        }
        self.feature.update(|state| state.working = true);
        true
    }

    /// Starts an STK push for the form's amount.
    pub async fn initiate_repayment(&self, form: &RepaymentForm) -> bool {
        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.feature.update(|state| state.form_errors = errors);
                return false;
            }
        };
        if self.feature.with_state(|state| state.submitting) {
            debug!("ignoring duplicate repayment");
            return false;
        }
        self.feature.update(|state| {
            state.submitting = true;
            state.form_errors = FieldErrors::new();
        });

        match self.api.initiate_repayment(&request).await {
            Ok(initiation) => {
                info!(checkout = ?initiation.checkout_request_id, "repayment initiated");
                self.notices.success(
                    initiation
                        .customer_message
                        .clone()
                        .or_else(|| initiation.message.clone())
                        .unwrap_or_else(|| {
                            "Check your phone and enter your M-Pesa PIN to complete the payment."
                                .to_string()
                        }),
                );
                self.feature.update(|state| {
                    state.submitting = false;
                    state.last_initiation = Some(initiation);
                });
                true
            }
            Err(err) => {
                let errors =
                    action_failed(&self.notices, "Repayment", RepaymentForm::FIELDS, &err);
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
        self.feature.update(|state| *state = MpesaState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::testing::Harness;
    use crate::http::Method;
    use crate::routes::Route;
    use serde_json::json;

    fn manager(harness: &Harness) -> MpesaManager {
        MpesaManager::new(
            &harness.cx,
            harness.api.clone(),
            harness.session.clone(),
            harness.notices.clone(),
        )
    }

    #[tokio::test]
    async fn test_missing_profile_is_ready_none() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Get,
            "mpesa/profile/",
            404,
            json!({"detail": "No M-Pesa profile found"}),
        );
        let mpesa = manager(&harness);

        mpesa.show_profile().await;
        assert_eq!(mpesa.snapshot().profile, Loadable::Ready(None));
        assert!(harness.notices.notices().is_empty());
    }

    #[tokio::test]
    async fn test_transactions_from_bare_list() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Get,
            "mpesa/transaction-history/",
            200,
            json!([{"id": 1, "amount": "250.00", "type": "RECEIVED"}, {"id": 2, "amount": 90}]),
        );
        let mpesa = manager(&harness);

        mpesa.show_transactions().await;
        let state = mpesa.snapshot();
        let history = state.transactions.ready().expect("transactions loaded");
        assert_eq!(history.total_count, 2);
        assert!(history.transactions[0].is_credit());
    }

    #[tokio::test]
    async fn test_repayment_lists_outstanding_loans() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Get,
            "loans/my-loans/",
            200,
            json!({"loans": [{"id": 1, "status": "ACTIVE"}, {"id": 2, "status": "PAID"}]}),
        );
        let mpesa = manager(&harness);

        mpesa.show_repayment().await;
        let state = mpesa.snapshot();
        let loans = state.repayable.ready().expect("loans loaded");
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].id, "1");
        assert_eq!(mpesa.default_phone(), "+254712345678");
    }

    #[tokio::test]
    async fn test_repayment_validation_blocks_request() {
        let harness = Harness::signed_in();
        let mpesa = manager(&harness);
        let form = RepaymentForm {
            phone_number: "0712345678".into(),
            amount: "50".into(),
            loan_id: "1".into(),
        };

        assert!(!mpesa.initiate_repayment(&form).await);
        assert!(harness.transport.requests().is_empty());
        assert!(mpesa.snapshot().form_errors.contains("amount"));
    }

    #[tokio::test]
    async fn test_repayment_initiated() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Post,
            "mpesa/initiate-repayment/",
            200,
            json!({"success": true, "CheckoutRequestID": "ws_CO_1", "customer_message": "Enter your PIN"}),
        );
        let mpesa = manager(&harness);
        let form = RepaymentForm {
            phone_number: "0712345678".into(),
            amount: "1500".into(),
            loan_id: "1".into(),
        };

        assert!(mpesa.initiate_repayment(&form).await);
        assert_eq!(
            harness.transport.requests()[0].body,
            Some(json!({"phone_number": "+254712345678", "amount": 1500, "loan_id": "1"}))
        );
        let state = mpesa.snapshot();
        assert_eq!(
            state.last_initiation.and_then(|i| i.checkout_request_id).as_deref(),
            Some("ws_CO_1")
        );
        assert_eq!(harness.notice_messages(), vec!["Enter your PIN"]);
    }

    #[tokio::test]
    async fn test_simulate_reloads_profile() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Post,
            "mpesa/simulate-transactions/",
            200,
            json!({"success": true, "transactions_created": 120}),
        );
        harness.transport.respond(
            Method::Get,
            "mpesa/profile/",
            200,
            json!({"profile": {"total_transactions": 120, "average_weekly_income": "4200.00"}}),
        );
        let mpesa = manager(&harness);

        assert!(mpesa.simulate().await);
        assert_eq!(harness.notice_messages(), vec!["Generated 120 sample transactions."]);
        let state = mpesa.snapshot();
        let profile = state.profile.ready().cloned().flatten().expect("profile");
        assert_eq!(profile.total_transactions, 120);
        assert!(!state.working);
    }

    /// Tests a 401 from the M-Pesa service ends the session
    #[tokio::test]
    async fn test_unauthorized_redirects_to_login() {
        let harness = Harness::signed_in();
        harness.transport.respond(
            Method::Get,
            "mpesa/transaction-history/",
            401,
            json!({"detail": "expired"}),
        );
        let mpesa = manager(&harness);

        mpesa.show_transactions().await;
        assert!(!harness.session.is_authenticated());
        assert_eq!(harness.last_navigation(), Some(Route::Login));
    }
}
