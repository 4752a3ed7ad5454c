use std::cell::RefCell;
use std::collections::HashMap;

/// Read access to the cookies the backend has set for this client.
pub trait CookieSource {
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Finds `name` in a `Cookie`-style header (`a=1; b=2`), percent-decoding
/// the value.
#[must_use]
pub fn parse_cookie_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|value| !value.is_empty())
}

/// `document.cookie` in the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookies;

impl CookieSource for DocumentCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()?;
        let header = document.cookie().ok()?;
        parse_cookie_header(&header, name)
    }
}

/// Cookies held by a reqwest jar for one origin.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JarCookies {
    jar: std::sync::Arc<reqwest::cookie::Jar>,
    origin: reqwest::Url,
}

#[cfg(not(target_arch = "wasm32"))]
impl JarCookies {
    /// Returns `None` when `origin` is not a valid URL.
    pub fn new(jar: std::sync::Arc<reqwest::cookie::Jar>, origin: &str) -> Option<Self> {
        let origin = reqwest::Url::parse(origin).ok()?;
        Some(Self { jar, origin })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CookieSource for JarCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        use reqwest::cookie::CookieStore;

        let header = self.jar.cookies(&self.origin)?;
        parse_cookie_header(header.to_str().ok()?, name)
    }
}

/// Fixed cookies, for tests and for hosts without a cookie jar.
#[derive(Debug, Default)]
pub struct StaticCookies {
    values: RefCell<HashMap<String, String>>,
}

impl StaticCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn clear(&self) {
        self.values.borrow_mut().clear();
    }
}

impl CookieSource for StaticCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }
}
