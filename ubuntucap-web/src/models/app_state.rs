use crate::session::SessionEvent;
use shared::models::User;
use yewdux::Store;

/// Who is signed in. Written only through
/// [`SessionStore`](crate::session::SessionStore); the shell (header, route
/// guards) selects from it directly.
#[derive(Debug, Default, Clone, PartialEq, Eq, Store)]
pub struct AppState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// The transition that produced this state; `None` for a fresh or
    /// restored session.
    pub last_event: Option<SessionEvent>,
}
