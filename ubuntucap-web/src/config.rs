//! Frontend configuration module
//!
//! Resolves the API location the browser build talks to: a compile-time
//! default, optionally replaced at runtime through local storage.

use shared::ClientConfig;
use tracing::warn;

/// Local storage key that overrides the API base URL at runtime.
pub const API_URL_OVERRIDE_KEY: &str = "ubuntucap_api_url";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Frontend configuration for the API location and request budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// API base URL compiled into the bundle
    pub api_base_url: String,
    /// Request timeout compiled into the bundle, when set
    pub request_timeout_ms: Option<u64>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("UBUNTUCAP_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            request_timeout_ms: option_env!("UBUNTUCAP_REQUEST_TIMEOUT_MS")
                .and_then(|value| value.parse().ok()),
        }
    }
}

impl FrontendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a runtime override of the API base URL. Blank values are
    /// ignored.
    #[must_use]
    pub fn with_override(mut self, api_base_url: Option<String>) -> Self {
        if let Some(url) = api_base_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    /// The compile-time configuration plus the local storage override.
    pub fn resolve() -> Self {
        use gloo_storage::{LocalStorage, Storage};
        Self::new().with_override(LocalStorage::get::<String>(API_URL_OVERRIDE_KEY).ok())
    }

    /// The client configuration. Invalid settings fall back to the
    /// defaults, with a warning per problem.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::with_defaults().with_api_base_url(self.api_base_url.clone());
        if let Some(timeout) = self.request_timeout_ms {
            config.request_timeout_ms = timeout;
        }
        match config.validate() {
            Ok(()) => config,
            Err(problems) => {
                for problem in problems {
                    warn!("ignoring frontend configuration: {problem}");
                }
                ClientConfig::with_defaults()
            }
        }
    }
}
