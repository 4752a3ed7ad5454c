//! Feature managers: one view state machine per product area.
//!
//! A manager owns its feature's current view and the data that view shows.
//! Components render its snapshot and call its `show_*` and action methods;
//! they never hold feature state of their own beyond form drafts.
//!
//! Entering a view bumps the machine's generation and aborts the fetch of the
//! view it replaces, so a late response can never land in a view the user has
//! already left. Each feature's state is a yewdux store in the app's
//! [`Context`]; pages select from it with `use_store_value`.

pub mod auth;
pub mod credit;
pub mod dashboard;
pub mod loans;
pub mod mpesa;
pub mod profile;

pub use auth::{AuthManager, AuthState, AuthView};
pub use credit::{CreditManager, CreditState, CreditView};
pub use dashboard::{DashboardManager, DashboardState, DashboardView};
pub use loans::{LoansManager, LoansState, LoansView};
pub use mpesa::{MpesaManager, MpesaState, MpesaView};
pub use profile::{ProfileManager, ProfileState, ProfileView};

use crate::http::ApiError;
use crate::notify::NoticeBoard;
use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use shared::FieldErrors;
use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, warn};
use yewdux::{Context, Dispatch, Store};

/// Data a view is waiting for, has, or failed to get.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// A user-facing message; the view offers a retry.
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The closed set of views a feature can show.
pub trait ViewKind: Copy + Eq + Debug + 'static {}

impl<V: Copy + Eq + Debug + 'static> ViewKind for V {}

/// Current view plus the generation stamp of its entry.
#[derive(Debug)]
pub struct ViewMachine<V> {
    current: V,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl<V: ViewKind> ViewMachine<V> {
    pub fn new(initial: V) -> Self {
        Self {
            current: initial,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn current(&self) -> V {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switches to `view`, cancelling whatever the previous entry was
    /// fetching. The ticket scopes the new entry's own fetch.
    pub fn enter(&mut self, view: V) -> ViewTicket {
        self.cancel();
        self.current = view;
        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some(handle);
        ViewTicket {
            generation: self.generation,
            registration,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Aborts the in-flight fetch, if any, without changing the view. The
    /// generation moves on, so a response already being handled is stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
    }
}

/// Scope of one view entry's fetch.
#[derive(Debug)]
pub struct ViewTicket {
    generation: u64,
    registration: AbortRegistration,
}

impl ViewTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drives `future` until it completes or the view is left.
    pub async fn run<F: Future>(self, future: F) -> Result<F::Output, Aborted> {
        Abortable::new(future, self.registration).await
    }
}

/// A view machine and the store holding the state it renders.
pub struct Feature<V, S: Store> {
    name: &'static str,
    machine: RefCell<ViewMachine<V>>,
    state: Dispatch<S>,
}

impl<V: Debug, S: Store + Debug> Debug for Feature<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("machine", &self.machine)
            .field("state", &*self.state.get())
            .finish()
    }
}

impl<V: ViewKind, S: Store + Clone + PartialEq> Feature<V, S> {
    /// Starts at `initial` with the store's current state in `cx`.
    pub fn new(name: &'static str, initial: V, cx: &Context) -> Rc<Self> {
        Rc::new(Self {
            name,
            machine: RefCell::new(ViewMachine::new(initial)),
            state: Dispatch::new(cx),
        })
    }

    pub fn view(&self) -> V {
        self.machine.borrow().current()
    }

    pub fn generation(&self) -> u64 {
        self.machine.borrow().generation()
    }

    pub fn state(&self) -> S {
        (*self.state.get()).clone()
    }

    /// Reads the state without cloning it.
    pub fn with_state<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.state.get())
    }

    /// Mutates the state. Subscribers hear about it only if it changed.
    pub fn update(&self, change: impl FnOnce(&mut S)) {
        self.state.reduce_mut(change);
    }

    /// Enters `view`, applying `prepare` to the state in the same change.
    pub fn enter(&self, view: V, prepare: impl FnOnce(&mut S)) -> ViewTicket {
        let ticket = self.machine.borrow_mut().enter(view);
        debug!(feature = self.name, ?view, generation = ticket.generation(), "enter view");
        self.update(prepare);
        ticket
    }

    pub fn cancel(&self) {
        self.machine.borrow_mut().cancel();
    }

    /// Runs a view entry's fetch and applies its outcome, unless the view
    /// was left or re-entered meanwhile. Returns whether it was applied.
    pub async fn load<T, Fut>(
        &self,
        ticket: ViewTicket,
        operation: &str,
        fetch: Fut,
        apply: impl FnOnce(&mut S, Loadable<T>),
    ) -> bool
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let generation = ticket.generation();
        let Ok(outcome) = ticket.run(fetch).await else {
            debug!(feature = self.name, generation, "fetch aborted");
            return false;
        };
        if !self.machine.borrow().is_current(generation) {
            debug!(feature = self.name, generation, "discarding stale response");
            return false;
        }
        let loadable = match outcome {
            Ok(data) => Loadable::Ready(data),
            Err(ApiError::Cancelled) => return false,
            Err(err) => Loadable::Failed(err.user_message(operation)),
        };
        self.update(|state| apply(state, loadable));
        true
    }
}

/// Turns a failed user action into feedback: the field errors to show inline
/// beside `form_fields`, plus a toast for whatever those inputs cannot show.
/// That is a headline the server wrote itself, errors on other fields
/// (`non_field_errors` included), or a failure with no field detail at all.
/// An expired session produces neither; the session listener redirects to
/// login instead.
pub(crate) fn action_failed(
    notices: &NoticeBoard,
    operation: &str,
    form_fields: &[&str],
    err: &ApiError,
) -> FieldErrors {
    if matches!(err, ApiError::Unauthorized { .. } | ApiError::Cancelled) {
        return FieldErrors::new();
    }
    warn!(operation, "action failed: {err}");
    let inline = err.field_errors().cloned().unwrap_or_default();
    let unplaced = inline.iter().any(|(field, _)| !form_fields.contains(&field));
    let headline = err
        .message()
        .is_some_and(|message| inline.summary().as_deref() != Some(message));
    if inline.is_empty() || unplaced || headline {
        notices.error(err.user_message(operation));
    }
    inline
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::Cell;
    use test_case::test_case;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        First,
        Second,
    }

    #[derive(Debug, Clone, Default, PartialEq, Store)]
    struct State {
        data: Loadable<u32>,
    }

    fn feature() -> Rc<Feature<View, State>> {
        Feature::new("test", View::First, &Context::new())
    }

    #[test]
    fn test_enter_bumps_generation() {
        let mut machine = ViewMachine::new(View::First);
        let first = machine.enter(View::First);
        let second = machine.enter(View::Second);
        assert_eq!(machine.current(), View::Second);
        assert!(!machine.is_current(first.generation()));
        assert!(machine.is_current(second.generation()));
    }

    #[test]
    fn test_cancel_invalidates_current_entry() {
        let mut machine = ViewMachine::new(View::First);
        let ticket = machine.enter(View::Second);
        machine.cancel();
        assert_eq!(machine.current(), View::Second);
        assert!(!machine.is_current(ticket.generation()));
    }

    /// Tests a late response is dropped once the view was re-entered
    #[tokio::test]
    async fn test_stale_response_discarded() {
        let feature = feature();
        let (release, gate) = oneshot::channel::<u32>();

        let stale_ticket = feature.enter(View::First, |state| state.data = Loadable::Loading);
        let stale = feature.load(
            stale_ticket,
            "Loading",
            async move { gate.await.map_err(|_| ApiError::Cancelled) },
            |state, data| state.data = data,
        );
        let fresh_ticket = feature.enter(View::First, |state| state.data = Loadable::Loading);
        release.send(1).unwrap();

        assert!(!stale.await, "superseded fetch must not apply");
        assert!(feature.state().data.is_loading());

        let applied = feature
            .load(fresh_ticket, "Loading", async { Ok(2) }, |state, data| {
                state.data = data;
            })
            .await;
        assert!(applied);
        assert_eq!(feature.state().data, Loadable::Ready(2));
    }

    /// Tests a reset made while the fetch is still resolving survives it,
    /// as happens when a 401 ends the session mid-request
    #[tokio::test]
    async fn test_reset_during_fetch_is_not_overwritten() {
        let feature = feature();
        let ticket = feature.enter(View::First, |state| state.data = Loadable::Loading);
        let resetting = Rc::clone(&feature);
        let applied = feature
            .load(
                ticket,
                "Loading",
                async move {
                    resetting.cancel();
                    resetting.update(|state| *state = State::default());
                    Err::<u32, _>(ApiError::Unauthorized {
                        message: "expired".into(),
                    })
                },
                |state, data| state.data = data,
            )
            .await;

        assert!(!applied);
        assert_eq!(feature.state(), State::default());
    }

    /// Tests failures become a retryable message, not a spinner
    #[tokio::test]
    async fn test_failure_degrades_view() {
        let feature = feature();
        let ticket = feature.enter(View::Second, |state| state.data = Loadable::Loading);
        feature
            .load(
                ticket,
                "Loading numbers",
                async { Err::<u32, _>(ApiError::Decode("eof".into())) },
                |state, data| state.data = data,
            )
            .await;
        assert_eq!(feature.state().data.error(), Some("Loading numbers failed"));
    }

    /// Tests store subscribers hear real changes only
    #[test]
    fn test_subscribers_notified_on_change() {
        let cx = Context::new();
        let feature = Feature::<View, State>::new("test", View::First, &cx);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _listener = Dispatch::<State>::new(&cx)
            .subscribe_silent(move |_: Rc<State>| counter.set(counter.get() + 1));

        let _ticket = feature.enter(View::Second, |state| state.data = Loadable::Loading);
        feature.update(|state| state.data = Loadable::Ready(3));
        feature.update(|state| state.data = Loadable::Ready(3));
        assert_eq!(count.get(), 2);
    }

    fn rejected(body: serde_json::Value) -> ApiError {
        let body = shared::ErrorBody::from_value(&body);
        ApiError::Application {
            status: 400,
            message: body.message,
            field_errors: body.field_errors,
        }
    }

    #[test_case(
        serde_json::json!({"errors": {"amount": ["Exceeds your limit"]}}), false, 1 ;
        "form field stays inline"
    )]
    #[test_case(
        serde_json::json!({"success": false, "message": "You already have a pending application", "errors": ["pending"]}),
        true, 1 ;
        "non field errors toast"
    )]
    #[test_case(
        serde_json::json!({"message": "Check the highlighted fields", "errors": {"amount": ["Too small"]}}),
        true, 1 ;
        "server headline toasts beside inline errors"
    )]
    #[test_case(
        serde_json::json!({"errors": {"national_id": ["Already registered"]}}), true, 1 ;
        "field outside the form toasts"
    )]
    #[test_case(serde_json::json!({"detail": "Server error"}), true, 0 ; "no field detail")]
    fn test_action_failed_feedback(body: serde_json::Value, toasts: bool, inline: usize) {
        let notices = NoticeBoard::new(&Context::new());
        let fields = ["amount", "term_days"];
        let errors = action_failed(&notices, "Loan application", &fields, &rejected(body));
        assert_eq!(!notices.notices().is_empty(), toasts);
        assert_eq!(errors.len(), inline);
    }

    #[test]
    fn test_expired_session_gets_no_feedback() {
        let notices = NoticeBoard::new(&Context::new());
        let err = ApiError::Unauthorized {
            message: "expired".into(),
        };
        assert!(action_failed(&notices, "Loan application", &["amount"], &err).is_empty());
        assert!(notices.notices().is_empty());
    }
}
