use shared::FieldErrors;

/// Hints shown with connectivity failures.
pub const CONNECTIVITY_HINT: &str = "Unable to connect to the server. Please check that the \
    server is running, that it allows requests from this origin (CORS), and the browser console \
    for details.";

/// Failures of the underlying HTTP transport, before any response exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// The one error value every API call resolves to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response reached the client.
    #[error("network error: {0}")]
    Network(String),
    #[error("no response after {after_ms} ms")]
    Timeout { after_ms: u64 },
    /// The server rejected the session cookie.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    /// The server answered with an error body, or `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Application {
        status: u16,
        message: Option<String>,
        field_errors: FieldErrors,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The owning view was left before the response arrived.
    #[error("request cancelled")]
    Cancelled,
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

impl ApiError {
    /// Text to show the user when `operation` (e.g. "Login") fails.
    #[must_use]
    pub fn user_message(&self, operation: &str) -> String {
        match self {
            Self::Network(_) => CONNECTIVITY_HINT.to_string(),
            Self::Timeout { .. } => {
                format!("{operation} timed out. Please check your connection and try again.")
            }
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".to_string(),
            Self::Application {
                message,
                field_errors,
                ..
            } => message
                .clone()
                .or_else(|| field_errors.summary())
                .unwrap_or_else(|| format!("{operation} failed")),
            Self::Decode(_) => format!("{operation} failed"),
            Self::Cancelled => format!("{operation} was cancelled"),
        }
    }

    /// The headline of an error response.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Application { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Per-field messages, when the server returned any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Application { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
