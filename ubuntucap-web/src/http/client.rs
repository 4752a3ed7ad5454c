use super::cookies::CookieSource;
use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::session::SessionStore;
use futures::future::{Either, select};
use futures::pin_mut;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{CsrfTokenResponse, ErrorBody, reports_failure};
use shared::ClientConfig;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

struct ClientInner {
    config: Rc<ClientConfig>,
    transport: Rc<dyn Transport>,
    cookies: Rc<dyn CookieSource>,
    session: SessionStore,
    csrf_token: RefCell<Option<String>>,
}

/// JSON client for the UbuntuCap API.
///
/// Session identity travels in cookies only. Mutating requests carry the
/// CSRF token, bootstrapping one first when none is known. Every response is
/// normalized here: callers see either a JSON payload or one [`ApiError`].
#[derive(Clone)]
pub struct HttpClient {
    inner: Rc<ClientInner>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("api_base_url", &self.inner.config.api_base_url)
            .field("timeout_ms", &self.inner.config.request_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(
        config: Rc<ClientConfig>,
        transport: Rc<dyn Transport>,
        cookies: Rc<dyn CookieSource>,
        session: SessionStore,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                config,
                transport,
                cookies,
                session,
                csrf_token: RefCell::new(None),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Token for the next mutating request: the cookie wins over a token
    /// remembered from the bootstrap endpoint.
    pub fn current_csrf_token(&self) -> Option<String> {
        self.inner
            .cookies
            .cookie(&self.inner.config.csrf_cookie_name)
            .or_else(|| self.inner.csrf_token.borrow().clone())
    }

    /// Forgets a remembered token, e.g. after logout or a CSRF rejection.
    pub fn forget_csrf_token(&self) {
        self.inner.csrf_token.borrow_mut().take();
    }

    /// Makes sure a CSRF token is available, asking the backend for one if
    /// needed. Returns `None` when the backend does not issue one.
    pub async fn ensure_csrf_token(&self) -> Option<String> {
        if let Some(token) = self.current_csrf_token() {
            return Some(token);
        }
        let url = self.inner.config.csrf_bootstrap_url();
        debug!(%url, "bootstrapping CSRF token");
        let request = HttpRequest::new(Method::Get, url).header(REQUESTED_WITH.0, REQUESTED_WITH.1);
        let response = match self.with_timeout(self.inner.transport.send(request)).await {
            Ok(Ok(response)) if response.is_success() => response,
            Ok(Ok(response)) => {
                warn!(status = response.status, "CSRF bootstrap rejected");
                return None;
            }
            Ok(Err(err)) => {
                warn!("CSRF bootstrap failed: {err}");
                return None;
            }
            Err(err) => {
                warn!("CSRF bootstrap failed: {err}");
                return None;
            }
        };
        let from_body = serde_json::from_str::<CsrfTokenResponse>(&response.body)
            .ok()
            .and_then(|body| body.csrf_token)
            .filter(|token| !token.is_empty());
        if let Some(token) = &from_body {
            *self.inner.csrf_token.borrow_mut() = Some(token.clone());
        }
        self.current_csrf_token().or(from_body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.send(Method::Get, path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::Get, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self.post_value(path, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post_value<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Post, path, Some(body)).await
    }

    pub async fn put_value<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Put, path, Some(body)).await
    }

    pub async fn delete_value(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::Delete, path, None).await
    }

    /// Issues one request and normalizes the outcome.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.inner.config.endpoint(path);
        let mut request = HttpRequest::new(method, url.clone())
            .header("Accept", "application/json")
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1);
        if method.is_mutating() {
            match self.ensure_csrf_token().await {
                Some(token) => {
                    request = request.header(self.inner.config.csrf_header_name.clone(), token);
                }
                None => warn!(%method, %url, "sending without a CSRF token"),
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "request");
        let response = match self.with_timeout(self.inner.transport.send(request)).await {
            Ok(result) => result.map_err(|err| {
                warn!(%method, %url, "transport failure: {err}");
                ApiError::from(err)
            })?,
            Err(timeout) => {
                warn!(%method, %url, "{timeout}");
                return Err(timeout);
            }
        };
        self.interpret(method, &url, response)
    }

    fn interpret(&self, method: Method, url: &str, response: HttpResponse) -> Result<Value, ApiError> {
        let parsed = if response.body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(&response.body)
        };

        if response.status == 401 {
            let message = parsed
                .as_ref()
                .ok()
                .map(ErrorBody::from_value)
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Authentication credentials were not provided.".to_string());
            warn!(%method, %url, "unauthorized");
            self.inner.session.expire();
            return Err(ApiError::Unauthorized { message });
        }

        if response.is_success() {
            let value = parsed?;
            if reports_failure(&value) {
                let body = ErrorBody::from_value(&value);
                warn!(%method, %url, "request reported failure: {body}");
                return Err(ApiError::Application {
                    status: response.status,
                    message: body.message,
                    field_errors: body.field_errors,
                });
            }
            return Ok(value);
        }

        let body = match &parsed {
            Ok(value) => ErrorBody::from_value(value),
            Err(_) => ErrorBody::from_text(&response.body),
        };
        if response.status == 403 && method.is_mutating() {
            self.forget_csrf_token();
        }
        warn!(%method, %url, status = response.status, "request failed: {body}");
        Err(ApiError::Application {
            status: response.status,
            message: body.message,
            field_errors: body.field_errors,
        })
    }

    async fn with_timeout<F: Future>(&self, future: F) -> Result<F::Output, ApiError> {
        let after_ms = self.inner.config.request_timeout_ms;
        let timer = sleep(Duration::from_millis(after_ms));
        pin_mut!(future);
        pin_mut!(timer);
        match select(future, timer).await {
            Either::Left((output, _)) => Ok(output),
            Either::Right(((), _)) => Err(ApiError::Timeout { after_ms }),
        }
    }
}
