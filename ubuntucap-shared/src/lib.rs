//! Platform-neutral building blocks for the UbuntuCap client: typed payloads,
//! the response normalization layer, form validation, display formatting and
//! client configuration.
#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod format;
pub mod models;
pub mod validation;

pub use config::ClientConfig;
pub use models::errors::{ErrorBody, FieldErrors};
