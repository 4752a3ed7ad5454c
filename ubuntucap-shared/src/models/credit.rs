use super::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Presentation band for a 0–100 credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Basic,
    Limited,
    Poor,
}

impl ScoreBand {
    /// Classifies a score. Scores are bucketed by their lower bound, so 79.9 is
    /// still `Good`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => Self::Excellent,
            s if s >= 70.0 => Self::Good,
            s if s >= 60.0 => Self::Fair,
            s if s >= 50.0 => Self::Basic,
            s if s >= 40.0 => Self::Limited,
            _ => Self::Poor,
        }
    }

    /// Accent colour used for gauges and badges.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#27ae60",
            Self::Good => "#2ecc71",
            Self::Fair => "#f39c12",
            Self::Basic => "#e67e22",
            Self::Limited => "#e74c3c",
            Self::Poor => "#c0392b",
        }
    }

    /// DaisyUI badge modifier.
    #[must_use]
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Excellent | Self::Good => "badge-success",
            Self::Fair | Self::Basic => "badge-warning",
            Self::Limited | Self::Poor => "badge-error",
        }
    }
}

/// A behaviour the score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ScoreFactor {
    TransactionFrequency,
    IncomeConsistency,
    SavingsRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FactorImpact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FactorStatus {
    Excellent,
    Good,
    NeedsImprovement,
    NeedsWork,
    CouldImprove,
}

/// How a score rates on one [`ScoreFactor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorRating {
    pub factor: ScoreFactor,
    pub impact: FactorImpact,
    pub status: FactorStatus,
    pub favourable: bool,
}

impl FactorRating {
    #[must_use]
    pub fn color(self) -> &'static str {
        match (self.favourable, self.factor) {
            (true, _) => "#27ae60",
            (false, ScoreFactor::SavingsRatio) => "#e74c3c",
            (false, _) => "#f39c12",
        }
    }
}

impl ScoreFactor {
    /// Lowest score at which the factor counts in the borrower's favour.
    #[must_use]
    pub fn threshold(self) -> f64 {
        match self {
            Self::TransactionFrequency => 70.0,
            Self::IncomeConsistency => 65.0,
            Self::SavingsRatio => 75.0,
        }
    }

    #[must_use]
    pub fn rate(self, score: f64) -> FactorRating {
        let favourable = score >= self.threshold();
        let (impact, status) = match (self, favourable) {
            (Self::TransactionFrequency, true) => (FactorImpact::High, FactorStatus::Good),
            (Self::TransactionFrequency, false) => {
                (FactorImpact::Medium, FactorStatus::NeedsImprovement)
            }
            (Self::IncomeConsistency, true) => (FactorImpact::High, FactorStatus::Good),
            (Self::IncomeConsistency, false) => (FactorImpact::Medium, FactorStatus::NeedsWork),
            (Self::SavingsRatio, true) => (FactorImpact::High, FactorStatus::Excellent),
            (Self::SavingsRatio, false) => (FactorImpact::Low, FactorStatus::CouldImprove),
        };
        FactorRating {
            factor: self,
            impact,
            status,
            favourable,
        }
    }
}

/// Rates `score` on every factor, in display order.
#[must_use]
pub fn score_factors(score: f64) -> Vec<FactorRating> {
    ScoreFactor::iter().map(|factor| factor.rate(score)).collect()
}

/// Advice shown under the score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ImprovementTip {
    TransactionFrequency,
    IncomeConsistency,
    DiversifyNetwork,
    OffPeakTransactions,
    SavingsRatio,
    ExpenseRatio,
    KeepItUp,
}

/// Tips for `score`, most basic first. A score of 80 or more gets only
/// [`ImprovementTip::KeepItUp`].
#[must_use]
pub fn improvement_tips(score: f64) -> Vec<ImprovementTip> {
    let tiers = [
        (60.0, [ImprovementTip::TransactionFrequency, ImprovementTip::IncomeConsistency]),
        (70.0, [ImprovementTip::DiversifyNetwork, ImprovementTip::OffPeakTransactions]),
        (80.0, [ImprovementTip::SavingsRatio, ImprovementTip::ExpenseRatio]),
    ];
    let tips: Vec<_> = tiers
        .into_iter()
        .filter(|(below, _)| score < *below)
        .flat_map(|(_, tips)| tips)
        .collect();
    if tips.is_empty() {
        vec![ImprovementTip::KeepItUp]
    } else {
        tips
    }
}

/// Direction of the score across recent calculations.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScoreTrend {
    Improving,
    Declining,
    #[default]
    #[serde(other)]
    Stable,
}

/// Lifecycle of a loan offer.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Expired,
    #[serde(other)]
    Unknown,
}

impl OfferStatus {
    /// Only pending offers can be accepted or declined.
    #[must_use]
    pub fn is_actionable(self) -> bool {
        self == Self::Pending
    }
}

/// A loan offer derived from a score calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanOffer {
    #[serde(default, alias = "offer_id", deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount_offered: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub monthly_payment: Option<Decimal>,
    #[serde(default)]
    pub term_months: Option<u16>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: OfferStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Summary statistics over the user's score history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreAnalytics {
    #[serde(default, deserialize_with = "lenient::float")]
    pub current_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub best_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub average_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub score_trend: ScoreTrend,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_calculations: u64,
    #[serde(default)]
    pub first_calculation: Option<String>,
    #[serde(default)]
    pub latest_calculation: Option<String>,
}

impl ScoreAnalytics {
    /// Band of the current score, if one has been calculated.
    #[must_use]
    pub fn current_band(&self) -> Option<ScoreBand> {
        self.current_score.map(ScoreBand::from_score)
    }
}

/// One row of `credit/scores/history/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreHistoryEntry {
    #[serde(default, alias = "calculated_at")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub model_version: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub loan_offers_count: u64,
}

/// Response of `credit/calculate-score/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreditScoreResult {
    #[serde(default, alias = "score", deserialize_with = "lenient::float")]
    pub credit_score: Option<f64>,
    #[serde(default)]
    pub score_category: Option<String>,
    #[serde(default)]
    pub reasoning: Option<serde_json::Value>,
    #[serde(default)]
    pub loan_offer: Option<LoanOffer>,
}

impl CreditScoreResult {
    /// Category reported by the backend, else derived from the score.
    #[must_use]
    pub fn category(&self) -> String {
        self.score_category.clone().unwrap_or_else(|| {
            self.credit_score
                .map(|score| ScoreBand::from_score(score).to_string())
                .unwrap_or_default()
        })
    }
}

/// Payload for `credit/calculate-score/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalculateScoreRequest {
    pub force_refresh: bool,
    pub model_preference: String,
}

impl Default for CalculateScoreRequest {
    fn default() -> Self {
        Self {
            force_refresh: true,
            model_preference: "ml".to_string(),
        }
    }
}

/// Payload for `credit/offers/accept/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptOfferRequest {
    pub offer_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(95.0, ScoreBand::Excellent ; "excellent")]
    #[test_case(80.0, ScoreBand::Excellent ; "excellent lower bound")]
    #[test_case(79.9, ScoreBand::Good ; "good")]
    #[test_case(60.0, ScoreBand::Fair ; "fair")]
    #[test_case(55.0, ScoreBand::Basic ; "basic")]
    #[test_case(40.0, ScoreBand::Limited ; "limited")]
    #[test_case(12.0, ScoreBand::Poor ; "poor")]
    fn test_score_band(score: f64, expected: ScoreBand) {
        assert_eq!(ScoreBand::from_score(score), expected);
    }

    #[test_case(85.0, [FactorStatus::Good, FactorStatus::Good, FactorStatus::Excellent] ; "strong")]
    #[test_case(72.0, [FactorStatus::Good, FactorStatus::Good, FactorStatus::CouldImprove] ; "good")]
    #[test_case(65.0, [FactorStatus::NeedsImprovement, FactorStatus::Good, FactorStatus::CouldImprove] ; "income threshold")]
    #[test_case(50.0, [FactorStatus::NeedsImprovement, FactorStatus::NeedsWork, FactorStatus::CouldImprove] ; "weak")]
    fn test_score_factors(score: f64, expected: [FactorStatus; 3]) {
        let statuses: Vec<_> = score_factors(score).iter().map(|rating| rating.status).collect();
        assert_eq!(statuses, expected);
    }

    #[test]
    fn test_factor_rating_presentation() {
        let frequency = ScoreFactor::TransactionFrequency.rate(70.0);
        assert_eq!((frequency.impact, frequency.color()), (FactorImpact::High, "#27ae60"));
        let savings = ScoreFactor::SavingsRatio.rate(74.9);
        assert_eq!((savings.impact, savings.color()), (FactorImpact::Low, "#e74c3c"));
        let income = ScoreFactor::IncomeConsistency.rate(64.0);
        assert_eq!((income.impact, income.color()), (FactorImpact::Medium, "#f39c12"));
        assert_eq!(FactorStatus::NeedsImprovement.to_string(), "needs_improvement");
    }

    #[test_case(45.0, 6 ; "below sixty gets every tier")]
    #[test_case(60.0, 4 ; "sixty skips the basics")]
    #[test_case(75.0, 2 ; "good score keeps savings tips")]
    #[test_case(80.0, 1 ; "excellent")]
    fn test_improvement_tips(score: f64, count: usize) {
        let tips = improvement_tips(score);
        assert_eq!(tips.len(), count);
        if score >= 80.0 {
            assert_eq!(tips, [ImprovementTip::KeepItUp]);
        } else {
            assert!(!tips.contains(&ImprovementTip::KeepItUp));
            assert_eq!(tips.last(), Some(&ImprovementTip::ExpenseRatio));
        }
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(ScoreBand::Excellent.color(), "#27ae60");
        assert_eq!(ScoreBand::Poor.color(), "#c0392b");
    }

    /// Tests offers decode with either id spelling
    #[test]
    fn test_offer_ids() {
        let offer: LoanOffer = serde_json::from_value(json!({
            "offer_id": "31",
            "amount_offered": "5000.00",
            "interest_rate": "7.00"
        }))
        .unwrap();
        assert_eq!(offer.id, "31");
        assert!(offer.status.is_actionable());
        let offer: LoanOffer =
            serde_json::from_value(json!({"id": 32, "status": "DECLINED"})).unwrap();
        assert_eq!(offer.id, "32");
        assert!(!offer.status.is_actionable());
    }

    /// Tests analytics with an unexpected trend value
    #[test]
    fn test_analytics_decode() {
        let analytics: ScoreAnalytics = serde_json::from_value(json!({
            "current_score": 72,
            "best_score": "81.5",
            "average_score": 69.25,
            "score_trend": "sideways",
            "total_calculations": 4
        }))
        .unwrap();
        assert_eq!(analytics.score_trend, ScoreTrend::Stable);
        assert_eq!(analytics.best_score, Some(81.5));
        assert_eq!(analytics.current_band(), Some(ScoreBand::Good));
    }

    #[test]
    fn test_score_result_category_fallback() {
        let result: CreditScoreResult =
            serde_json::from_value(json!({"credit_score": 64})).unwrap();
        assert_eq!(result.category(), "Fair");
    }

    #[test]
    fn test_calculate_request_defaults() {
        let value = serde_json::to_value(CalculateScoreRequest::default()).unwrap();
        assert_eq!(value, json!({"force_refresh": true, "model_preference": "ml"}));
    }
}
