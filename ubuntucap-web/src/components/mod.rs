pub(crate) mod empty_state;
pub(crate) mod form_field;
pub(crate) mod header_nav_item;
pub(crate) mod language_selector;
pub(crate) mod loading;
pub(crate) mod status_badge;
pub(crate) mod theme_switcher;
pub(crate) mod toast;
pub(crate) mod user_dropdown;

// Re-export components for convenience
pub use empty_state::{EmptyState, FailedState};
pub use form_field::{FieldError, SelectField, TextField};
pub use loading::Loading;
pub use status_badge::{LoanStatusBadge, ScoreBadge};
