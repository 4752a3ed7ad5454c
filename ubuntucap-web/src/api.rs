use crate::http::{ApiError, HttpClient};
use serde_json::Value;
use shared::models::envelope::{decode, decode_list};
use shared::models::{
    AcceptOfferRequest, Acknowledgement, CalculateScoreRequest, ConsentRequest,
    CreditScoreResult, DashboardData, LoanApplicationReceipt, LoanApplicationRequest, LoanDetails,
    LoanOffer, LoanPortfolio, LoginRequest, LoginResponse, MpesaProfile, PasswordResetConfirm,
    PasswordResetRequest, ProfileUpdate, RegistrationRequest, RegistrationResponse,
    RepaymentInitiation, RepaymentRequest, ScoreAnalytics, ScoreHistoryEntry, SimulationRequest,
    SimulationResult, TransactionHistory, User, VerifyPhoneRequest,
};

/// Endpoint paths, relative to the configured API base URL.
pub mod paths {
    pub const REGISTER: &str = "users/register/";
    pub const VERIFY_PHONE: &str = "users/verify-phone/";
    pub const LOGIN: &str = "users/login/";
    pub const LOGOUT: &str = "users/logout/";
    pub const PASSWORD_RESET: &str = "users/password-reset/";
    pub const PASSWORD_RESET_CONFIRM: &str = "users/password-reset-confirm/";
    pub const PROFILE: &str = "users/profile/";
    pub const PROFILE_UPDATE: &str = "users/profile/update/";
    pub const CONSENT: &str = "users/consent/";
    pub const DASHBOARD: &str = "users/dashboard/";

    pub const LOAN_SUBMIT: &str = "loans/applications/submit/";
    pub const MY_LOANS: &str = "loans/my-loans/";

    pub const CALCULATE_SCORE: &str = "credit/calculate-score/";
    pub const SCORE_HISTORY: &str = "credit/scores/history/";
    pub const SCORE_ANALYTICS: &str = "credit/scores/analytics/";
    pub const CURRENT_OFFERS: &str = "credit/offers/current/";
    pub const OFFER_HISTORY: &str = "credit/offers/history/";
    pub const ACCEPT_OFFER: &str = "credit/offers/accept/";

    pub const MPESA_PROFILE: &str = "mpesa/profile/";
    pub const MPESA_TRANSACTIONS: &str = "mpesa/transaction-history/";
    pub const MPESA_ANALYZE: &str = "mpesa/analyze-transactions/";
    pub const MPESA_SIMULATE: &str = "mpesa/simulate-transactions/";
    pub const MPESA_REPAYMENT: &str = "mpesa/initiate-repayment/";

    /// `loans/my-loans/{id}/`
    pub fn loan_details(id: &str) -> String {
        format!("{MY_LOANS}{}/", urlencoding::encode(id))
    }

    /// `credit/offers/{id}/decline/`
    pub fn decline_offer(id: &str) -> String {
        format!("credit/offers/{}/decline/", urlencoding::encode(id))
    }
}

/// Typed UbuntuCap endpoints. Envelope differences between endpoints and
/// backend versions are resolved here, so callers only see typed payloads.
#[derive(Clone, Debug)]
pub struct UbuntuCapApi {
    http: HttpClient,
}

impl UbuntuCapApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Primes the CSRF cookie so the first form submission does not pay for
    /// the round trip.
    pub async fn prime_csrf(&self) -> bool {
        self.http.ensure_csrf_token().await.is_some()
    }

    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationResponse, ApiError> {
        self.http.post(paths::REGISTER, request).await
    }

    pub async fn verify_phone(&self, request: &VerifyPhoneRequest) -> Result<Acknowledgement, ApiError> {
        self.http.post(paths::VERIFY_PHONE, request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = self.http.post_value(paths::LOGIN, request).await?;
        Ok(LoginResponse {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            user: decode(&body, &["user"])?,
        })
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.http.post_value(paths::LOGOUT, &serde_json::json!({})).await;
        self.http.forget_csrf_token();
        result.map(|_| ())
    }

    pub async fn request_password_reset(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<Acknowledgement, ApiError> {
        self.http.post(paths::PASSWORD_RESET, request).await
    }

    pub async fn confirm_password_reset(
        &self,
        request: &PasswordResetConfirm,
    ) -> Result<Acknowledgement, ApiError> {
        self.http.post(paths::PASSWORD_RESET_CONFIRM, request).await
    }

    /// The signed-in user. Also the check for an existing server session.
    pub async fn profile(&self) -> Result<User, ApiError> {
        let body = self.http.get_value(paths::PROFILE).await?;
        Ok(decode(&body, &["user"])?)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let body = self.http.put_value(paths::PROFILE_UPDATE, update).await?;
        Ok(decode(&body, &["user"])?)
    }

    pub async fn record_consent(&self, request: &ConsentRequest) -> Result<Acknowledgement, ApiError> {
        self.http.post(paths::CONSENT, request).await
    }

    pub async fn dashboard(&self) -> Result<DashboardData, ApiError> {
        let body = self.http.get_value(paths::DASHBOARD).await?;
        Ok(DashboardData::from_payload(&body)?)
    }

    pub async fn submit_loan_application(
        &self,
        request: &LoanApplicationRequest,
    ) -> Result<LoanApplicationReceipt, ApiError> {
        let body = self.http.post_value(paths::LOAN_SUBMIT, request).await?;
        let mut receipt: LoanApplicationReceipt = serde_json::from_value(body.clone())?;
        if receipt.application_id.is_none() {
            receipt.application_id = body.pointer("/application/id").map(|id| match id {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            });
        }
        Ok(receipt)
    }

    pub async fn my_loans(&self) -> Result<LoanPortfolio, ApiError> {
        let body = self.http.get_value(paths::MY_LOANS).await?;
        if body.is_array() {
            return Ok(LoanPortfolio {
                loans: decode_list(&body, &[])?,
                applications: Vec::new(),
            });
        }
        Ok(serde_json::from_value(body)?)
    }

    pub async fn loan_details(&self, id: &str) -> Result<LoanDetails, ApiError> {
        let body = self.http.get_value(&paths::loan_details(id)).await?;
        if body.get("loan").is_some() {
            return Ok(serde_json::from_value(body)?);
        }
        Ok(LoanDetails {
            loan: serde_json::from_value(body)?,
            ..LoanDetails::default()
        })
    }

    pub async fn calculate_score(
        &self,
        request: &CalculateScoreRequest,
    ) -> Result<CreditScoreResult, ApiError> {
        let body = self.http.post_value(paths::CALCULATE_SCORE, request).await?;
        Ok(decode(&body, &["result"])?)
    }

    pub async fn score_history(&self) -> Result<Vec<ScoreHistoryEntry>, ApiError> {
        let body = self.http.get_value(paths::SCORE_HISTORY).await?;
        Ok(decode_list(&body, &["history", "scores"])?)
    }

    pub async fn score_analytics(&self) -> Result<ScoreAnalytics, ApiError> {
        let body = self.http.get_value(paths::SCORE_ANALYTICS).await?;
        Ok(decode(&body, &["analytics"])?)
    }

    pub async fn current_offers(&self) -> Result<Vec<LoanOffer>, ApiError> {
        let body = self.http.get_value(paths::CURRENT_OFFERS).await?;
        Ok(decode_list(&body, &["offers"])?)
    }

    pub async fn offer_history(&self) -> Result<Vec<LoanOffer>, ApiError> {
        let body = self.http.get_value(paths::OFFER_HISTORY).await?;
        Ok(decode_list(&body, &["offers", "history"])?)
    }

    pub async fn accept_offer(&self, offer_id: &str) -> Result<Acknowledgement, ApiError> {
        let request = AcceptOfferRequest {
            offer_id: offer_id.to_string(),
        };
        Self::acknowledged(self.http.post_value(paths::ACCEPT_OFFER, &request).await?)
    }

    pub async fn decline_offer(&self, offer_id: &str) -> Result<Acknowledgement, ApiError> {
        let body = self
            .http
            .post_value(&paths::decline_offer(offer_id), &serde_json::json!({}))
            .await?;
        Self::acknowledged(body)
    }

    /// `None` when the user has no M-Pesa data yet.
    pub async fn mpesa_profile(&self) -> Result<Option<MpesaProfile>, ApiError> {
        let body = match self.http.get_value(paths::MPESA_PROFILE).await {
            Ok(body) => body,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };
        let profile: MpesaProfile = decode(&body, &["profile"])?;
        Ok((!profile.is_empty()).then_some(profile))
    }

    pub async fn transaction_history(&self) -> Result<TransactionHistory, ApiError> {
        let body = self.http.get_value(paths::MPESA_TRANSACTIONS).await?;
        if body.is_array() {
            let transactions = decode_list(&body, &[])?;
            return Ok(TransactionHistory {
                total_count: transactions.len() as u64,
                transactions,
            });
        }
        let mut history: TransactionHistory = serde_json::from_value(body)?;
        if history.total_count == 0 {
            history.total_count = history.transactions.len() as u64;
        }
        Ok(history)
    }

    pub async fn analyze_transactions(&self) -> Result<Acknowledgement, ApiError> {
        let body = self
            .http
            .post_value(paths::MPESA_ANALYZE, &serde_json::json!({}))
            .await?;
        Self::acknowledged(body)
    }

    pub async fn simulate_transactions(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, ApiError> {
        self.http.post(paths::MPESA_SIMULATE, request).await
    }

    pub async fn initiate_repayment(
        &self,
        request: &RepaymentRequest,
    ) -> Result<RepaymentInitiation, ApiError> {
        self.http.post(paths::MPESA_REPAYMENT, request).await
    }

    /// An empty 2xx body counts as success.
    fn acknowledged(body: Value) -> Result<Acknowledgement, ApiError> {
        if body.is_null() {
            return Ok(Acknowledgement {
                success: true,
                message: None,
            });
        }
        let mut ack: Acknowledgement = serde_json::from_value(body)?;
        ack.success = true;
        Ok(ack)
    }
}
