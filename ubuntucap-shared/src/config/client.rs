use serde::{Deserialize, Serialize};
use std::env;
#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::Path};
use tracing::{debug, info, warn};
use url::Url;

/// Errors raised while loading a client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported configuration format `{0}`; use json or toml")]
    UnsupportedFormat(String),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Runtime settings for talking to the UbuntuCap API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined to.
    pub api_base_url: String,
    /// Cookie the backend stores its CSRF token in.
    pub csrf_cookie_name: String,
    /// Header mutating requests echo the token in.
    pub csrf_header_name: String,
    /// Path on the API origin that issues a CSRF cookie.
    pub csrf_bootstrap_path: String,
    /// Upper bound for a single request, in milliseconds.
    pub request_timeout_ms: u64,
    /// Durable storage key holding the user snapshot.
    pub user_storage_key: String,
    /// Legacy durable storage key; only ever removed.
    pub token_storage_key: String,
    /// How long a toast stays on screen, in milliseconds.
    pub notice_timeout_ms: u64,
    pub support_email: String,
    pub support_phone: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration pointing at a local backend.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            csrf_bootstrap_path: "/csrf-token/".to_string(),
            request_timeout_ms: 15_000,
            user_storage_key: "userData".to_string(),
            token_storage_key: "authToken".to_string(),
            notice_timeout_ms: 5_000,
            support_email: "support@ubuntucap.com".to_string(),
            support_phone: "+254 700 000 000".to_string(),
        }
    }

    /// Parses a JSON document; absent keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] when the document is malformed.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a TOML document; absent keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] when the document is malformed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads from an optional file, then applies `UBUNTUCAP_*` environment
    /// overrides, then validates.
    ///
    /// # Errors
    /// Fails on unreadable or malformed files, unparseable overrides, or a
    /// configuration that does not validate.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "reading client configuration");
                let content = fs::read_to_string(path)?;
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("json") => Self::from_json(&content)?,
                    Some("toml") => Self::from_toml(&content)?,
                    other => {
                        return Err(ConfigError::UnsupportedFormat(
                            other.unwrap_or_default().to_string(),
                        ));
                    }
                }
            }
            None => Self::with_defaults(),
        };
        config.apply_env_overrides()?;
        if let Err(problems) = config.validate() {
            warn!(?problems, "client configuration rejected");
            return Err(ConfigError::Invalid(problems));
        }
        info!(api_base_url = %config.api_base_url, "client configuration loaded");
        Ok(config)
    }

    /// Applies `UBUNTUCAP_API_BASE_URL` and `UBUNTUCAP_REQUEST_TIMEOUT_MS`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a non-numeric timeout.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("UBUNTUCAP_API_BASE_URL") {
            if !url.trim().is_empty() {
                debug!(url = url.trim(), "API base URL overridden from environment");
                self.api_base_url = url.trim().to_string();
            }
        }
        if let Ok(timeout) = env::var("UBUNTUCAP_REQUEST_TIMEOUT_MS") {
            debug!(timeout = timeout.trim(), "request timeout overridden from environment");
            self.request_timeout_ms =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: "UBUNTUCAP_REQUEST_TIMEOUT_MS",
                        value: timeout.clone(),
                    })?;
        }
        Ok(())
    }

    /// Replaces the API base URL, returning the updated configuration.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Validates the configuration, collecting every problem.
    ///
    /// # Errors
    /// The list of human readable problems.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        match Url::parse(self.api_base_url.trim()) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => errors.push(format!(
                "API base URL must use http or https: {}",
                self.api_base_url
            )),
            Ok(url) if url.host_str().is_none_or(str::is_empty) => errors.push(format!(
                "API base URL has no host: {}",
                self.api_base_url
            )),
            Ok(_) => {}
            Err(err) => errors.push(format!(
                "API base URL is not a valid URL ({err}): {}",
                self.api_base_url
            )),
        }
        if self.request_timeout_ms == 0 {
            errors.push("Request timeout must be greater than 0.".to_string());
        }
        if self.csrf_cookie_name.trim().is_empty() || self.csrf_header_name.trim().is_empty() {
            errors.push("CSRF cookie and header names must not be empty.".to_string());
        }
        if self.user_storage_key.trim().is_empty() {
            errors.push("User storage key must not be empty.".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The base URL as a directory, so relative endpoints extend its path.
    fn base_url(&self) -> Result<Url, url::ParseError> {
        let mut base = Url::parse(self.api_base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }

    /// Scheme and authority of the API, e.g. `http://127.0.0.1:8000`.
    #[must_use]
    pub fn origin(&self) -> String {
        match Url::parse(self.api_base_url.trim()) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(err) => {
                warn!(url = %self.api_base_url, "unparseable API base URL: {err}");
                self.api_base_url.trim_end_matches('/').to_string()
            }
        }
    }

    /// Joins an endpoint path onto the API base URL. Absolute URLs are
    /// returned unchanged.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        match self
            .base_url()
            .and_then(|base| base.join(path.trim_start_matches('/')))
        {
            Ok(url) => url.into(),
            Err(err) => {
                warn!(url = %self.api_base_url, path, "cannot join endpoint: {err}");
                format!(
                    "{}/{}",
                    self.api_base_url.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
        }
    }

    /// Absolute URL of the CSRF bootstrap endpoint.
    #[must_use]
    pub fn csrf_bootstrap_url(&self) -> String {
        format!(
            "{}/{}",
            self.origin(),
            self.csrf_bootstrap_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use test_case::test_case;

    fn cleanup_env_vars() {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            env::remove_var("UBUNTUCAP_API_BASE_URL");
            env::remove_var("UBUNTUCAP_REQUEST_TIMEOUT_MS");
        }
    }

    #[test]
    fn test_config_with_defaults() {
        let config = ClientConfig::with_defaults();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.csrf_cookie_name, "csrftoken");
        assert_eq!(config.csrf_header_name, "X-CSRFToken");
        assert_eq!(config.request_timeout_ms, 15_000);
        assert_eq!(config.user_storage_key, "userData");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_origin_and_endpoint() {
        let config = ClientConfig::with_defaults();
        assert_eq!(config.origin(), "http://127.0.0.1:8000");
        assert_eq!(
            config.endpoint("/users/login/"),
            "http://127.0.0.1:8000/api/users/login/"
        );
        assert_eq!(config.csrf_bootstrap_url(), "http://127.0.0.1:8000/csrf-token/");

        let bare = ClientConfig::with_defaults().with_api_base_url("https://api.ubuntucap.com/");
        assert_eq!(bare.origin(), "https://api.ubuntucap.com");
        assert_eq!(bare.endpoint("loans/my-loans/"), "https://api.ubuntucap.com/loans/my-loans/");
    }

    #[test]
    fn test_from_json_partial() {
        let config = ClientConfig::from_json(r#"{"api_base_url": "https://api.example.com/api"}"#)
            .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/api");
        assert_eq!(config.request_timeout_ms, 15_000);
    }

    #[test]
    fn test_from_toml() {
        let config = ClientConfig::from_toml("request_timeout_ms = 2500\n").unwrap();
        assert_eq!(config.request_timeout_ms, 2500);
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = ClientConfig {
            api_base_url: "ftp://nope".to_string(),
            request_timeout_ms: 0,
            ..ClientConfig::with_defaults()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test_case("http://" ; "scheme only")]
    #[test_case("https://exa mple.com/api" ; "space in host")]
    #[test_case("http://:8000/api" ; "port without host")]
    #[test_case("127.0.0.1:8000/api" ; "missing scheme")]
    #[test_case("mailto:support@ubuntucap.com" ; "not http")]
    fn test_validate_rejects_malformed_base_url(url: &str) {
        let config = ClientConfig::with_defaults().with_api_base_url(url);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("API base URL"));
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_absolute_urls() {
        let config = ClientConfig::with_defaults().with_api_base_url("https://ubuntucap.com/api/v1");
        assert_eq!(config.origin(), "https://ubuntucap.com");
        assert_eq!(
            config.endpoint("credit/scores/history/?page=2"),
            "https://ubuntucap.com/api/v1/credit/scores/history/?page=2"
        );
        assert_eq!(
            config.endpoint("https://cdn.ubuntucap.com/terms.pdf"),
            "https://cdn.ubuntucap.com/terms.pdf"
        );
        let with_port =
            ClientConfig::with_defaults().with_api_base_url("https://ubuntucap.com:8443/api");
        assert_eq!(with_port.origin(), "https://ubuntucap.com:8443");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        cleanup_env_vars();
        // SAFETY: serialized with the other environment tests.
        unsafe {
            env::set_var("UBUNTUCAP_API_BASE_URL", "https://staging.ubuntucap.com/api");
            env::set_var("UBUNTUCAP_REQUEST_TIMEOUT_MS", "3000");
        }
        let config = ClientConfig::load(None).unwrap();
        assert_eq!(config.api_base_url, "https://staging.ubuntucap.com/api");
        assert_eq!(config.request_timeout_ms, 3000);
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_env_invalid_timeout() {
        cleanup_env_vars();
        // SAFETY: serialized with the other environment tests.
        unsafe {
            env::set_var("UBUNTUCAP_REQUEST_TIMEOUT_MS", "soon");
        }
        let result = ClientConfig::load(None);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_load_from_files() -> Result<(), Box<dyn std::error::Error>> {
        cleanup_env_vars();
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile()?;
        writeln!(json_file, r#"{{"request_timeout_ms": 1234}}"#)?;
        assert_eq!(ClientConfig::load(Some(json_file.path()))?.request_timeout_ms, 1234);

        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(toml_file, r#"api_base_url = "https://api.example.com/api""#)?;
        assert_eq!(
            ClientConfig::load(Some(toml_file.path()))?.api_base_url,
            "https://api.example.com/api"
        );

        let mut wrong_scheme = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(wrong_scheme, r#"api_base_url = "ftp://files.example.com/api""#)?;
        assert!(matches!(
            ClientConfig::load(Some(wrong_scheme.path())),
            Err(ConfigError::Invalid(problems)) if problems.len() == 1
        ));

        let yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        assert!(matches!(
            ClientConfig::load(Some(yaml_file.path())),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        Ok(())
    }
}
