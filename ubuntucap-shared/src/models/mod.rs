//! Typed request and response payloads for the UbuntuCap REST API.

pub mod auth;
pub mod credit;
pub mod dashboard;
pub mod envelope;
pub mod errors;
pub mod lenient;
pub mod loans;
pub mod mpesa;
pub mod user;

pub use auth::{
    Acknowledgement, CsrfTokenResponse, LoginRequest, LoginResponse, PasswordResetConfirm,
    PasswordResetRequest, REGISTRATION_CHANNEL_APP, RegistrationRequest, RegistrationResponse,
    VerifyPhoneRequest,
};
pub use credit::{
    AcceptOfferRequest, CalculateScoreRequest, CreditScoreResult, FactorImpact, FactorRating,
    FactorStatus, ImprovementTip, LoanOffer, OfferStatus, ScoreAnalytics, ScoreBand, ScoreFactor,
    ScoreHistoryEntry, ScoreTrend, improvement_tips, score_factors,
};
pub use dashboard::{Activity, DashboardData, LoanStats};
pub use errors::{ErrorBody, FieldErrors, NON_FIELD_ERRORS, reports_failure};
pub use loans::{
    DEFAULT_LOAN_TERM, LOAN_TERMS, Loan, LoanApplication, LoanApplicationReceipt,
    LoanApplicationRequest, LoanDetails, LoanPortfolio, LoanPurpose, LoanStatus, MAX_LOAN_AMOUNT,
    MIN_LOAN_AMOUNT, Repayment, RepaymentSummary,
};
pub use mpesa::{
    MAX_REPAYMENT_AMOUNT, MIN_REPAYMENT_AMOUNT, MpesaProfile, MpesaTransaction,
    RepaymentInitiation, RepaymentRequest, SimulationRequest, SimulationResult, TransactionHistory,
};
pub use user::{
    ConsentRequest, ConsentType, EmploymentStatus, ProfileUpdate, User, UserProfile,
};
