//! The HTTP boundary: transport, cookies, and the normalizing client.

pub mod client;
pub mod cookies;
pub mod error;
#[cfg(test)]
pub mod testing;
pub mod transport;

pub use client::HttpClient;
pub use cookies::{CookieSource, DocumentCookies, StaticCookies};
pub use error::{ApiError, TransportError};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
