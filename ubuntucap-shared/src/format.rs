//! Display formatting for money, dates and scores.

use crate::models::lenient::parse_decimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency prefix used across the product.
pub const CURRENCY: &str = "KES";
/// Placeholder for missing or unparseable dates.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats an amount as `KES 1,234.50`. `None` renders as `KES 0.00`.
#[must_use]
pub fn format_currency(amount: Option<Decimal>) -> String {
    let amount = amount
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", amount.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}{CURRENCY} {}.{fraction}", group_thousands(whole))
}

/// Formats a raw API amount string; non-numeric text renders as zero.
#[must_use]
pub fn format_currency_text(amount: &str) -> String {
    format_currency(parse_decimal(amount))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Formats a date as `5 January 2025`, or `N/A`.
#[must_use]
pub fn format_date(input: Option<&str>) -> String {
    input
        .and_then(parse_timestamp)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |at| at.format("%-d %B %Y").to_string())
}

/// Formats a timestamp as `5 Jan 2025, 14:30`, or `N/A`.
#[must_use]
pub fn format_date_time(input: Option<&str>) -> String {
    input.and_then(parse_timestamp).map_or_else(
        || NOT_AVAILABLE.to_string(),
        |at| at.format("%-d %b %Y, %H:%M").to_string(),
    )
}

/// Formats a credit score without a trailing `.0`.
#[must_use]
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) if value.fract().abs() < f64::EPSILON => format!("{value:.0}"),
        Some(value) => format!("{value:.1}"),
        None => "--".to_string(),
    }
}

/// Formats a ratio in `0.0..=1.0` as a whole percentage.
#[must_use]
pub fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| NOT_AVAILABLE.to_string(), |value| format!("{:.0}%", value * 100.0))
}

/// Formats an annual interest rate such as `12.50` as `12.5%`.
#[must_use]
pub fn format_rate(rate: Option<Decimal>) -> String {
    rate.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |value| format!("{}%", value.normalize()),
    )
}

/// Turns `PENDING_DISBURSEMENT` into `Pending Disbursement`.
#[must_use]
pub fn humanize(code: &str) -> String {
    code.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some(Decimal::new(123_450, 2)), "KES 1,234.50" ; "grouped")]
    #[test_case(Some(Decimal::new(5, 0)), "KES 5.00" ; "small")]
    #[test_case(Some(Decimal::new(1_000_000, 0)), "KES 1,000,000.00" ; "million")]
    #[test_case(Some(Decimal::new(12_345, 3)), "KES 12.35" ; "rounded half up")]
    #[test_case(Some(Decimal::new(-2_500, 0)), "-KES 2,500.00" ; "negative")]
    #[test_case(None, "KES 0.00" ; "missing")]
    fn test_format_currency(amount: Option<Decimal>, expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    /// Every non-negative amount renders two decimals after the KES prefix
    #[test]
    fn test_currency_shape() {
        for cents in [0_i64, 1, 99, 100, 123_456, 5_000_000, 999_999_999] {
            let rendered = format_currency(Some(Decimal::new(cents, 2)));
            assert!(rendered.starts_with("KES "));
            let (_, fraction) = rendered.rsplit_once('.').unwrap();
            assert_eq!(fraction.len(), 2);
        }
        assert_eq!(format_currency(None), format_currency(Some(Decimal::ZERO)));
    }

    #[test]
    fn test_format_currency_text() {
        assert_eq!(format_currency_text("5625.00"), "KES 5,625.00");
        assert_eq!(format_currency_text("n/a"), "KES 0.00");
    }

    #[test_case(Some("2025-01-05T10:00:00Z"), "5 January 2025" ; "rfc3339")]
    #[test_case(Some("2025-01-05T10:00:00.123456+03:00"), "5 January 2025" ; "fractional offset")]
    #[test_case(Some("2025-12-31"), "31 December 2025" ; "date only")]
    #[test_case(Some(""), "N/A" ; "empty")]
    #[test_case(Some("yesterday"), "N/A" ; "garbage")]
    #[test_case(None, "N/A" ; "missing")]
    fn test_format_date(input: Option<&str>, expected: &str) {
        assert_eq!(format_date(input), expected);
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_date_time(Some("2025-01-05T14:30:00Z")), "5 Jan 2025, 14:30");
        assert_eq!(format_date_time(Some("2025-01-05 09:05:00")), "5 Jan 2025, 09:05");
        assert_eq!(format_date_time(None), "N/A");
    }

    #[test]
    fn test_scores_and_rates() {
        assert_eq!(format_score(Some(72.0)), "72");
        assert_eq!(format_score(Some(72.46)), "72.5");
        assert_eq!(format_score(None), "--");
        assert_eq!(format_ratio(Some(0.82)), "82%");
        assert_eq!(format_rate(Some(Decimal::new(1250, 2))), "12.5%");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("PENDING_DISBURSEMENT"), "Pending Disbursement");
        assert_eq!(humanize("mpesa"), "Mpesa");
        assert_eq!(humanize(""), "");
    }
}
