use super::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Smallest repayment accepted over STK push, in KES.
pub const MIN_REPAYMENT_AMOUNT: u32 = 100;
/// Largest repayment accepted over STK push, in KES.
pub const MAX_REPAYMENT_AMOUNT: u32 = 50_000;
/// Months of sample data requested from the simulator.
pub const SIMULATION_MONTHS: u8 = 6;

/// Financial profile derived from the user's M-Pesa statement.
///
/// Amounts arrive as strings or `null` until the first analysis has run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MpesaProfile {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub average_weekly_income: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub average_weekly_expenses: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub transaction_consistency: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub has_savings_habit: bool,
    #[serde(default, deserialize_with = "lenient::count")]
    pub network_diversity: u64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub fuliza_repayment_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_transactions: u64,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_volume: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub active_days: u64,
    #[serde(default)]
    pub last_analysis: Option<String>,
}

impl MpesaProfile {
    /// `true` until an analysis has produced figures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_transactions == 0 && self.last_analysis.is_none()
    }

    /// Weekly income minus weekly expenses, when both are known.
    #[must_use]
    pub fn weekly_surplus(&self) -> Option<Decimal> {
        Some(self.average_weekly_income? - self.average_weekly_expenses?)
    }
}

/// One entry of the statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MpesaTransaction {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub amount: Decimal,
    #[serde(default, rename = "type", alias = "transaction_type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub counterparty: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
}

impl MpesaTransaction {
    /// Money coming in to the wallet.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        let kind = self.kind.to_ascii_uppercase();
        kind.contains("RECEIVE") || kind.contains("DEPOSIT") || kind.contains("CREDIT")
    }
}

/// Response of `mpesa/transaction-history/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionHistory {
    #[serde(default, deserialize_with = "lenient::list")]
    pub transactions: Vec<MpesaTransaction>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_count: u64,
}

/// Response of `mpesa/simulate-transactions/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub transactions_created: u64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub profile_analyzed: bool,
}

/// Payload for `mpesa/simulate-transactions/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationRequest {
    pub months: u8,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            months: SIMULATION_MONTHS,
        }
    }
}

/// Payload for `mpesa/initiate-repayment/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepaymentRequest {
    pub phone_number: String,
    pub amount: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
}

/// Response of a successful STK push initiation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepaymentInitiation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "CheckoutRequestID")]
    pub checkout_request_id: Option<String>,
    #[serde(default)]
    pub customer_message: Option<String>,
}
