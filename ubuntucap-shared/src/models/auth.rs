use super::{User, lenient};
use serde::{Deserialize, Serialize};

/// Channel tag sent with every registration from this client.
pub const REGISTRATION_CHANNEL_APP: &str = "APP";

/// Request for `users/login/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

/// Response for a successful `users/login/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

/// Request for `users/register/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub id_number: String,
    pub password: String,
    pub password_confirm: String,
    pub registration_channel: String,
}

/// Response for a successful `users/register/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub user_id: Option<String>,
    /// Echoed by development backends so the code can be entered without SMS.
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// Request for `users/verify-phone/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyPhoneRequest {
    pub phone_number: String,
    pub code: String,
}

/// Request for `users/password-reset/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetRequest {
    pub phone_number: String,
}

/// Request for `users/password-reset-confirm/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetConfirm {
    pub phone_number: String,
    pub code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Acknowledgement {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the CSRF bootstrap endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsrfTokenResponse {
    #[serde(default, alias = "csrf_token", rename = "csrfToken")]
    pub csrf_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_decode() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": true,
            "message": "Login successful",
            "user": {"id": 7, "phone_number": "+254712345678", "first_name": "Jo"}
        }))
        .unwrap();
        assert_eq!(response.user.id, "7");
        assert_eq!(response.message.as_deref(), Some("Login successful"));
    }

    #[test]
    fn test_registration_response_decode() {
        let response: RegistrationResponse = serde_json::from_value(json!({
            "success": true,
            "user_id": "c0ffee00-0000-0000-0000-000000000000",
            "verification_code": "123456"
        }))
        .unwrap();
        assert_eq!(response.verification_code.as_deref(), Some("123456"));
        assert!(response.user_id.is_some());
    }

    #[test]
    fn test_csrf_token_aliases() {
        let camel: CsrfTokenResponse = serde_json::from_value(json!({"csrfToken": "abc"})).unwrap();
        let snake: CsrfTokenResponse = serde_json::from_value(json!({"csrf_token": "abc"})).unwrap();
        assert_eq!(camel, snake);
    }
}
