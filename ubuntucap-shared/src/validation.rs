//! Client-side input validation.
//!
//! Every function here is pure and total: bad input yields `None`, `false` or
//! a [`FieldErrors`] map, never a panic. Form validators return the request
//! payload ready to send so a form cannot be submitted unvalidated.

use crate::models::{
    FieldErrors, LOAN_TERMS, LoanApplicationRequest, LoanPurpose, LoginRequest, MAX_LOAN_AMOUNT,
    MAX_REPAYMENT_AMOUNT, MIN_LOAN_AMOUNT, MIN_REPAYMENT_AMOUNT, PasswordResetConfirm,
    REGISTRATION_CHANNEL_APP, RegistrationRequest, RepaymentRequest, VerifyPhoneRequest,
    lenient::parse_decimal,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+254|0)?[17]\d{8}$").expect("phone pattern"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static ID_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,8}$").expect("id number pattern"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("code pattern"));

pub const PHONE_MESSAGE: &str = "Please enter a valid Kenyan phone number";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PASSWORD_MESSAGE: &str =
    "Password must be at least 8 characters with an uppercase letter, a lowercase letter and a number";
pub const PASSWORD_MATCH_MESSAGE: &str = "Passwords do not match";
pub const ID_NUMBER_MESSAGE: &str = "Please enter a valid ID number (up to 8 digits)";
pub const CODE_MESSAGE: &str = "Please enter the complete 6-digit code";
pub const LOAN_AMOUNT_MESSAGE: &str = "Loan amount must be between KES 500 and KES 50,000";
pub const LOAN_TERM_MESSAGE: &str = "Please select a repayment period";
pub const LOAN_PURPOSE_MESSAGE: &str = "Please select a loan purpose";
pub const REPAYMENT_AMOUNT_MESSAGE: &str = "Amount must be between KES 100 and KES 50,000";
pub const REPAYMENT_LOAN_MESSAGE: &str = "Please select a loan account";

/// Canonicalizes a Kenyan mobile number to `+2547XXXXXXXX` / `+2541XXXXXXXX`.
///
/// Accepts `0XXXXXXXXX`, `+254XXXXXXXXX` and the bare nine-digit subscriber
/// number, ignoring whitespace and punctuation. Returns `None` for anything
/// else.
#[must_use]
pub fn validate_phone_number(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect();
    if !PHONE_RE.is_match(&cleaned) {
        return None;
    }
    let subscriber = cleaned
        .strip_prefix("+254")
        .or_else(|| cleaned.strip_prefix('0'))
        .unwrap_or(&cleaned);
    Some(format!("+254{subscriber}"))
}

#[must_use]
pub fn validate_email(input: &str) -> bool {
    EMAIL_RE.is_match(input.trim())
}

/// At least eight characters including upper case, lower case and a digit.
#[must_use]
pub fn validate_password(input: &str) -> bool {
    input.chars().count() >= 8
        && input.chars().any(|ch| ch.is_ascii_lowercase())
        && input.chars().any(|ch| ch.is_ascii_uppercase())
        && input.chars().any(|ch| ch.is_ascii_digit())
}

/// Kenyan national ID: one to eight digits.
#[must_use]
pub fn validate_id_number(input: &str) -> bool {
    ID_NUMBER_RE.is_match(input.trim())
}

/// SMS verification and reset codes are exactly six digits.
#[must_use]
pub fn validate_verification_code(input: &str) -> bool {
    CODE_RE.is_match(input.trim())
}

/// Parses a whole-shilling amount within `min..=max`. Thousands separators
/// and a zero fractional part (`"5,000.00"`) are accepted.
#[must_use]
pub fn parse_amount(input: &str, min: u32, max: u32) -> Option<u32> {
    let cleaned: String = input.chars().filter(|ch| *ch != ',' && !ch.is_whitespace()).collect();
    let amount = parse_decimal(&cleaned)?;
    if !amount.fract().is_zero() {
        return None;
    }
    amount.to_u32().filter(|value| (min..=max).contains(value))
}

/// Raw values of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub phone_number: String,
    pub password: String,
}

impl LoginForm {
    /// Inputs the form renders errors beside.
    pub const FIELDS: &'static [&'static str] = &["phone_number", "password"];

    /// Returns the canonical phone number and password.
    ///
    /// # Errors
    /// Field errors keyed by `phone_number` and `password`.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let phone = validate_phone_number(&self.phone_number);
        if phone.is_none() {
            errors.insert("phone_number", PHONE_MESSAGE);
        }
        if self.password.is_empty() {
            errors.insert("password", "Please enter your password");
        }
        match phone {
            Some(phone_number) if errors.is_empty() => Ok(LoginRequest {
                phone_number,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Raw values of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub id_number: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegistrationForm {
    pub const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "phone_number",
        "id_number",
        "password",
        "password_confirm",
    ];

    /// # Errors
    /// Field errors for every invalid input at once.
    pub fn validate(&self) -> Result<RegistrationRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.first_name.trim().is_empty() {
            errors.insert("first_name", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.insert("last_name", "Last name is required");
        }
        if !validate_email(&self.email) {
            errors.insert("email", EMAIL_MESSAGE);
        }
        let phone = validate_phone_number(&self.phone_number);
        if phone.is_none() {
            errors.insert("phone_number", PHONE_MESSAGE);
        }
        if !validate_id_number(&self.id_number) {
            errors.insert("id_number", ID_NUMBER_MESSAGE);
        }
        if !validate_password(&self.password) {
            errors.insert("password", PASSWORD_MESSAGE);
        }
        if self.password != self.password_confirm {
            errors.insert("password_confirm", PASSWORD_MATCH_MESSAGE);
        }
        match phone {
            Some(phone_number) if errors.is_empty() => Ok(RegistrationRequest {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                email: self.email.trim().to_string(),
                phone_number,
                id_number: self.id_number.trim().to_string(),
                password: self.password.clone(),
                password_confirm: self.password_confirm.clone(),
                registration_channel: REGISTRATION_CHANNEL_APP.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Inputs of the verification form.
pub const VERIFICATION_FIELDS: &[&str] = &["phone_number", "code"];

/// Validates the phone verification step.
///
/// # Errors
/// Field errors keyed by `phone_number` and `code`.
#[must_use]
pub fn validate_verification(phone_number: &str, code: &str) -> Result<VerifyPhoneRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let phone = validate_phone_number(phone_number);
    if phone.is_none() {
        errors.insert("phone_number", PHONE_MESSAGE);
    }
    if !validate_verification_code(code) {
        errors.insert("code", CODE_MESSAGE);
    }
    match phone {
        Some(phone_number) if errors.is_empty() => Ok(VerifyPhoneRequest {
            phone_number,
            code: code.trim().to_string(),
        }),
        _ => Err(errors),
    }
}

/// Raw values of the password reset confirmation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordResetForm {
    pub phone_number: String,
    pub code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl PasswordResetForm {
    pub const FIELDS: &'static [&'static str] =
        &["phone_number", "code", "new_password", "new_password_confirm"];

    /// # Errors
    /// Field errors for every invalid input at once.
    pub fn validate(&self) -> Result<PasswordResetConfirm, FieldErrors> {
        let mut errors = FieldErrors::new();
        let phone = validate_phone_number(&self.phone_number);
        if phone.is_none() {
            errors.insert("phone_number", PHONE_MESSAGE);
        }
        if !validate_verification_code(&self.code) {
            errors.insert("code", CODE_MESSAGE);
        }
        if !validate_password(&self.new_password) {
            errors.insert("new_password", PASSWORD_MESSAGE);
        }
        if self.new_password != self.new_password_confirm {
            errors.insert("new_password_confirm", PASSWORD_MATCH_MESSAGE);
        }
        match phone {
            Some(phone_number) if errors.is_empty() => Ok(PasswordResetConfirm {
                phone_number,
                code: self.code.trim().to_string(),
                new_password: self.new_password.clone(),
                new_password_confirm: self.new_password_confirm.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Raw values of the loan application form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanApplicationForm {
    pub amount: String,
    pub term_days: String,
    pub purpose: String,
    pub notes: String,
}

impl LoanApplicationForm {
    pub const FIELDS: &'static [&'static str] = &["amount", "term_days", "purpose", "notes"];

    /// # Errors
    /// Field errors keyed by `amount`, `term_days` and `purpose`.
    pub fn validate(&self) -> Result<LoanApplicationRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let amount = parse_amount(&self.amount, MIN_LOAN_AMOUNT, MAX_LOAN_AMOUNT);
        if amount.is_none() {
            errors.insert("amount", LOAN_AMOUNT_MESSAGE);
        }
        let term = self
            .term_days
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|term| LOAN_TERMS.contains(term));
        if term.is_none() {
            errors.insert("term_days", LOAN_TERM_MESSAGE);
        }
        let purpose = self.purpose.trim().parse::<LoanPurpose>().ok();
        if purpose.is_none() {
            errors.insert("purpose", LOAN_PURPOSE_MESSAGE);
        }
        match (amount, term, purpose) {
            (Some(amount), Some(term_days), Some(purpose)) => Ok(LoanApplicationRequest {
                amount,
                term_days,
                purpose,
                notes: Some(self.notes.trim().to_string()).filter(|notes| !notes.is_empty()),
            }),
            _ => Err(errors),
        }
    }
}

/// Raw values of the M-Pesa repayment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepaymentForm {
    pub phone_number: String,
    pub amount: String,
    pub loan_id: String,
}

impl RepaymentForm {
    pub const FIELDS: &'static [&'static str] = &["phone_number", "amount", "loan_id"];

    /// # Errors
    /// Field errors keyed by `phone_number`, `amount` and `loan_id`.
    pub fn validate(&self) -> Result<RepaymentRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let phone = validate_phone_number(&self.phone_number);
        if phone.is_none() {
            errors.insert("phone_number", PHONE_MESSAGE);
        }
        let amount = parse_amount(&self.amount, MIN_REPAYMENT_AMOUNT, MAX_REPAYMENT_AMOUNT);
        if amount.is_none() {
            errors.insert("amount", REPAYMENT_AMOUNT_MESSAGE);
        }
        let loan_id = self.loan_id.trim();
        if loan_id.is_empty() {
            errors.insert("loan_id", REPAYMENT_LOAN_MESSAGE);
        }
        match (phone, amount) {
            (Some(phone_number), Some(amount)) if errors.is_empty() => Ok(RepaymentRequest {
                phone_number,
                amount,
                loan_id: Some(loan_id.to_string()),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_patterns_compile() {
        for pattern in [&PHONE_RE, &EMAIL_RE, &ID_NUMBER_RE, &CODE_RE] {
            assert!(!Lazy::force(pattern).as_str().is_empty());
        }
    }

    #[test_case("0712345678", Some("+254712345678") ; "leading zero")]
    #[test_case("+254712345678", Some("+254712345678") ; "international")]
    #[test_case("0112345678", Some("+254112345678") ; "one prefix")]
    #[test_case("0712 345 678", Some("+254712345678") ; "spaces")]
    #[test_case("(0712)-345-678", Some("+254712345678") ; "punctuation")]
    #[test_case("712345678", Some("+254712345678") ; "bare subscriber")]
    #[test_case("12345", None ; "too short")]
    #[test_case("+1555123", None ; "foreign")]
    #[test_case("", None ; "empty")]
    #[test_case("0812345678", None ; "wrong prefix")]
    #[test_case("254712345678", None ; "missing plus")]
    #[test_case("07123456789", None ; "too long")]
    fn test_validate_phone_number(input: &str, expected: Option<&str>) {
        assert_eq!(validate_phone_number(input).as_deref(), expected);
    }

    #[test_case("amina@example.com", true ; "plain")]
    #[test_case("  amina@example.co.ke ", true ; "padded")]
    #[test_case("amina@example", false ; "no tld")]
    #[test_case("amina example@x.com", false ; "space")]
    #[test_case("", false ; "empty")]
    fn test_validate_email(input: &str, expected: bool) {
        assert_eq!(validate_email(input), expected);
    }

    #[test_case("Secret123", true ; "valid")]
    #[test_case("secret123", false ; "no upper")]
    #[test_case("SECRET123", false ; "no lower")]
    #[test_case("SecretPwd", false ; "no digit")]
    #[test_case("Sec123", false ; "short")]
    fn test_validate_password(input: &str, expected: bool) {
        assert_eq!(validate_password(input), expected);
    }

    #[test]
    fn test_id_and_code() {
        assert!(validate_id_number("12345678"));
        assert!(!validate_id_number("123456789"));
        assert!(!validate_id_number("12A4"));
        assert!(validate_verification_code("123456"));
        assert!(!validate_verification_code("12345"));
    }

    #[test_case("5000", Some(5000) ; "plain")]
    #[test_case("5,000.00", Some(5000) ; "formatted")]
    #[test_case("499", None ; "below")]
    #[test_case("50001", None ; "above")]
    #[test_case("750.50", None ; "fractional")]
    #[test_case("abc", None ; "garbage")]
    fn test_parse_loan_amount(input: &str, expected: Option<u32>) {
        assert_eq!(parse_amount(input, MIN_LOAN_AMOUNT, MAX_LOAN_AMOUNT), expected);
    }

    /// Amount 400 is rejected with the amount message only
    #[test]
    fn test_loan_form_rejects_small_amount() {
        let form = LoanApplicationForm {
            amount: "400".to_string(),
            term_days: "90".to_string(),
            purpose: "BUSINESS".to_string(),
            notes: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first("amount"), Some(LOAN_AMOUNT_MESSAGE));
    }

    #[test]
    fn test_loan_form_accepts_valid_input() {
        let form = LoanApplicationForm {
            amount: "5000".to_string(),
            term_days: "90".to_string(),
            purpose: "BUSINESS".to_string(),
            notes: "  stock  ".to_string(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.amount, 5000);
        assert_eq!(request.term_days, 90);
        assert_eq!(request.purpose, LoanPurpose::Business);
        assert_eq!(request.notes.as_deref(), Some("stock"));
    }

    #[test]
    fn test_loan_form_reports_all_errors() {
        let form = LoanApplicationForm {
            amount: String::new(),
            term_days: "45".to_string(),
            purpose: "VACATION".to_string(),
            notes: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first("term_days"), Some(LOAN_TERM_MESSAGE));
        assert_eq!(errors.first("purpose"), Some(LOAN_PURPOSE_MESSAGE));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_repayment_form() {
        let mut form = RepaymentForm {
            phone_number: "0712345678".to_string(),
            amount: "99".to_string(),
            loan_id: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first("amount"), Some(REPAYMENT_AMOUNT_MESSAGE));
        assert_eq!(errors.first("loan_id"), Some(REPAYMENT_LOAN_MESSAGE));

        form.amount = "1500".to_string();
        form.loan_id = "12".to_string();
        let request = form.validate().unwrap();
        assert_eq!(request.phone_number, "+254712345678");
        assert_eq!(request.amount, 1500);
    }

    #[test]
    fn test_registration_form() {
        let mut form = RegistrationForm {
            first_name: "Amina".to_string(),
            last_name: "Otieno".to_string(),
            email: "amina@example.com".to_string(),
            phone_number: "0712345678".to_string(),
            id_number: "12345678".to_string(),
            password: "Secret123".to_string(),
            password_confirm: "Secret124".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.first("password_confirm"), Some(PASSWORD_MATCH_MESSAGE));

        form.password_confirm = "Secret123".to_string();
        let request = form.validate().unwrap();
        assert_eq!(request.registration_channel, "APP");
        assert_eq!(request.phone_number, "+254712345678");
    }

    #[test]
    fn test_login_and_verification() {
        let errors = LoginForm {
            phone_number: "123".to_string(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first("phone_number"), Some(PHONE_MESSAGE));
        assert!(errors.contains("password"));

        assert!(validate_verification("0712345678", "12345").is_err());
        let request = validate_verification("0712345678", "123456").unwrap();
        assert_eq!(request.code, "123456");
    }

    #[test]
    fn test_password_reset_form() {
        let form = PasswordResetForm {
            phone_number: "+254712345678".to_string(),
            code: "654321".to_string(),
            new_password: "NewPass1".to_string(),
            new_password_confirm: "NewPass1".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
