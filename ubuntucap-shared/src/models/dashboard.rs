use super::{User, lenient};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregated borrowing figures.
///
/// Older backends flatten these onto the dashboard object with `_amount`
/// suffixes; both spellings decode here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanStats {
    #[serde(default, alias = "active_loan_count", deserialize_with = "lenient::count")]
    pub active_loans: u64,
    #[serde(
        default,
        alias = "total_borrowed_amount",
        deserialize_with = "lenient::decimal_or_zero"
    )]
    pub total_borrowed: Decimal,
    #[serde(
        default,
        alias = "total_repaid_amount",
        deserialize_with = "lenient::decimal_or_zero"
    )]
    pub total_repaid: Decimal,
    #[serde(
        default,
        alias = "current_balance",
        deserialize_with = "lenient::decimal_or_zero"
    )]
    pub outstanding_balance: Decimal,
}

/// An entry of the recent activity feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    #[serde(default, alias = "message", deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, alias = "type", deserialize_with = "lenient::string")]
    pub activity_type: String,
    #[serde(default, alias = "timestamp")]
    pub created_at: Option<String>,
}

/// The dashboard overview, already normalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardData {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(
        default,
        alias = "profile_completion_percentage",
        deserialize_with = "lenient::percent"
    )]
    pub profile_completion: Option<u8>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub loan_stats: LoanStats,
    #[serde(default, deserialize_with = "lenient::float")]
    pub credit_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    pub recent_activity: Vec<Activity>,
}

impl DashboardData {
    /// Decodes `users/dashboard/`, accepting the `{dashboard: {...}}` envelope
    /// or a bare object, and stats nested under `loan_stats` or flattened.
    ///
    /// # Errors
    /// Fails when the payload is not an object or a field has an unusable type.
    pub fn from_payload(payload: &Value) -> Result<Self, serde_json::Error> {
        let body = payload.get("dashboard").unwrap_or(payload);
        let mut data: Self = serde_json::from_value(body.clone())?;
        if body.get("loan_stats").is_none_or(Value::is_null) {
            data.loan_stats = serde_json::from_value(body.clone())?;
        }
        if data.profile_completion.is_none() {
            data.profile_completion = data.user.as_ref().map(User::completion_percentage);
        }
        if !data.is_verified {
            data.is_verified = data.user.as_ref().is_some_and(|user| user.is_verified);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Tests the enveloped shape
    #[test]
    fn test_enveloped_dashboard() {
        let data = DashboardData::from_payload(&json!({
            "success": true,
            "dashboard": {
                "user": {"id": "u1", "first_name": "Amina", "is_verified": true},
                "profile_completion": 75,
                "loan_stats": {
                    "active_loans": 1,
                    "total_borrowed": 5000,
                    "total_repaid": "1000.00",
                    "outstanding_balance": "4625.00"
                },
                "credit_score": 72,
                "is_verified": true
            }
        }))
        .unwrap();
        assert_eq!(data.profile_completion, Some(75));
        assert_eq!(data.loan_stats.active_loans, 1);
        assert_eq!(data.loan_stats.outstanding_balance, Decimal::new(462_500, 2));
        assert_eq!(data.credit_score, Some(72.0));
    }

    /// Tests the flattened legacy shape
    #[test]
    fn test_flattened_dashboard() {
        let data = DashboardData::from_payload(&json!({
            "active_loan_count": 2,
            "total_borrowed_amount": "8000.00",
            "total_repaid_amount": "3000.00",
            "current_balance": "5400.00",
            "profile_completion_percentage": 50,
            "recent_activity": [
                {"message": "Logged in", "type": "LOGIN", "timestamp": "2025-03-01T08:00:00Z"}
            ]
        }))
        .unwrap();
        assert_eq!(data.loan_stats.active_loans, 2);
        assert_eq!(data.loan_stats.total_borrowed, Decimal::new(800_000, 2));
        assert_eq!(data.profile_completion, Some(50));
        assert_eq!(data.recent_activity[0].description, "Logged in");
        assert_eq!(data.recent_activity[0].activity_type, "LOGIN");
        assert_eq!(data.credit_score, None);
    }

    /// Tests completion and verification fall back to the embedded user
    #[test]
    fn test_fallbacks_from_user() {
        let data = DashboardData::from_payload(&json!({
            "dashboard": {
                "user": {"id": "u1", "first_name": "A", "last_name": "B", "is_verified": true},
                "loan_stats": {}
            }
        }))
        .unwrap();
        assert_eq!(data.profile_completion, Some(25));
        assert!(data.is_verified);
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(DashboardData::from_payload(&json!("nope")).is_err());
    }
}
