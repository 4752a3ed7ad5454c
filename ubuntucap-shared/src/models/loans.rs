use super::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Smallest principal the product lends, in KES.
pub const MIN_LOAN_AMOUNT: u32 = 500;
/// Largest principal the product lends, in KES.
pub const MAX_LOAN_AMOUNT: u32 = 50_000;
/// Repayment periods on offer, in days.
pub const LOAN_TERMS: [u16; 4] = [30, 60, 90, 180];
/// Term preselected on the application form.
pub const DEFAULT_LOAN_TERM: u16 = 90;

/// What the borrower intends to use the money for.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanPurpose {
    Business,
    Education,
    Emergency,
    Health,
    Home,
    Agriculture,
    Other,
}

impl LoanPurpose {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Education => "Education",
            Self::Emergency => "Emergency",
            Self::Health => "Health / Medical",
            Self::Home => "Home Improvement",
            Self::Agriculture => "Agriculture",
            Self::Other => "Other",
        }
    }

    /// All purposes in form order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Lifecycle of a disbursed loan or a pending application.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    PendingDisbursement,
    Disbursed,
    Active,
    Paid,
    Defaulted,
    #[serde(other)]
    Unknown,
}

impl LoanStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::PendingDisbursement => "Pending Disbursement",
            Self::Disbursed => "Disbursed",
            Self::Active => "Active",
            Self::Paid => "Paid",
            Self::Defaulted => "Defaulted",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether money is still owed on the loan.
    #[must_use]
    pub fn is_outstanding(self) -> bool {
        matches!(self, Self::Disbursed | Self::Active | Self::Defaulted)
    }
}

/// Payload for `loans/applications/submit/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanApplicationRequest {
    pub amount: u32,
    pub term_days: u16,
    pub purpose: LoanPurpose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response of a successful submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanApplicationReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub application_id: Option<String>,
}

/// A loan as listed under `loans/my-loans/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Loan {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "amount", deserialize_with = "lenient::decimal")]
    pub principal_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, alias = "amount_due", deserialize_with = "lenient::decimal")]
    pub total_amount_due: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount_disbursed: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: LoanStatus,
    #[serde(default)]
    pub disbursed_at: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub days_remaining: Option<i64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_overdue: bool,
}

/// A submitted application that has not necessarily become a loan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanApplication {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "amount", deserialize_with = "lenient::decimal")]
    pub requested_amount: Option<Decimal>,
    #[serde(default, alias = "term", alias = "term_days")]
    pub requested_term: Option<u16>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: LoanStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Everything `loans/my-loans/` returns: active loans and past applications.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanPortfolio {
    #[serde(default, deserialize_with = "lenient::list")]
    pub loans: Vec<Loan>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub applications: Vec<LoanApplication>,
}

impl LoanPortfolio {
    /// Loans with an unpaid balance, the candidates for an M-Pesa repayment.
    pub fn outstanding(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|loan| loan.status.is_outstanding())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loans.is_empty() && self.applications.is_empty()
    }
}

/// Totals computed by the backend for one loan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepaymentSummary {
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub total_repaid: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub remaining_balance: Decimal,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_fully_repaid: bool,
}

/// A completed repayment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repayment {
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub amount: Decimal,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub payment_method: String,
}

/// Response of `loans/my-loans/{id}/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanDetails {
    pub loan: Loan,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub repayment_summary: RepaymentSummary,
    #[serde(default, deserialize_with = "lenient::list")]
    pub repayment_history: Vec<Repayment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Tests the list payload including null dates and string decimals
    #[test]
    fn test_portfolio_decode() {
        let portfolio: LoanPortfolio = serde_json::from_value(json!({
            "success": true,
            "loans": [{
                "id": "12",
                "principal_amount": "5000.00",
                "interest_rate": "12.50",
                "total_amount_due": "5625.00",
                "status": "ACTIVE",
                "disbursed_at": null,
                "due_date": "2025-04-05T00:00:00Z",
                "days_remaining": 30,
                "is_overdue": false
            }, {
                "id": 13,
                "principal_amount": "1000.00",
                "status": "PAID"
            }]
        }))
        .unwrap();
        assert_eq!(portfolio.loans.len(), 2);
        assert!(portfolio.applications.is_empty());
        assert_eq!(portfolio.loans[0].status, LoanStatus::Active);
        assert_eq!(portfolio.loans[1].id, "13");
        assert_eq!(portfolio.outstanding().count(), 1);
    }

    /// Tests unknown or missing statuses do not break decoding
    #[test]
    fn test_unknown_status() {
        let loan: Loan = serde_json::from_value(json!({"id": 1, "status": "WRITTEN_OFF"})).unwrap();
        assert_eq!(loan.status, LoanStatus::Unknown);
        let loan: Loan = serde_json::from_value(json!({"id": 1, "status": null})).unwrap();
        assert_eq!(loan.status, LoanStatus::Pending);
    }

    /// Tests application aliases
    #[test]
    fn test_application_aliases() {
        let application: LoanApplication =
            serde_json::from_value(json!({"id": 4, "amount": 2500, "term": 60, "purpose": "HEALTH"}))
                .unwrap();
        assert_eq!(application.requested_amount, Some(Decimal::from(2500)));
        assert_eq!(application.requested_term, Some(60));
    }

    /// Tests the details payload
    #[test]
    fn test_details_decode() {
        let details: LoanDetails = serde_json::from_value(json!({
            "success": true,
            "loan": {"id": "12", "principal_amount": "5000.00", "amount_disbursed": "5000.00", "status": "DISBURSED"},
            "repayment_summary": {"total_repaid": "1000.00", "remaining_balance": "4625.00", "is_fully_repaid": false},
            "repayment_history": [{"amount": "1000.00", "paid_at": "2025-02-01T09:00:00Z", "payment_method": "MPESA"}]
        }))
        .unwrap();
        assert_eq!(details.repayment_summary.remaining_balance, Decimal::new(462_500, 2));
        assert_eq!(details.repayment_history[0].payment_method, "MPESA");
    }

    /// Tests the submission wire format
    #[test]
    fn test_application_request_wire_format() {
        let value = serde_json::to_value(LoanApplicationRequest {
            amount: 5000,
            term_days: 90,
            purpose: LoanPurpose::Business,
            notes: None,
        })
        .unwrap();
        assert_eq!(value, json!({"amount": 5000, "term_days": 90, "purpose": "BUSINESS"}));
    }

    #[test]
    fn test_purpose_order() {
        let purposes = LoanPurpose::all().collect::<Vec<_>>();
        assert_eq!(purposes.len(), 7);
        assert_eq!(purposes[0], LoanPurpose::Business);
        assert_eq!("AGRICULTURE".parse::<LoanPurpose>().unwrap(), LoanPurpose::Agriculture);
    }
}
