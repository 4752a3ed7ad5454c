use super::{Feature, Loadable};
use crate::api::UbuntuCapApi;
use crate::session::SessionStore;
use shared::models::DashboardData;
use std::fmt;
use std::rc::Rc;
use yewdux::{Context, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Overview,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct DashboardState {
    pub data: Loadable<DashboardData>,
}

/// The signed-in landing view.
#[derive(Clone)]
pub struct DashboardManager {
    feature: Rc<Feature<DashboardView, DashboardState>>,
    api: UbuntuCapApi,
    session: SessionStore,
}

impl fmt::Debug for DashboardManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardManager")
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl DashboardManager {
    pub fn new(cx: &Context, api: UbuntuCapApi, session: SessionStore) -> Self {
        Self {
            feature: Feature::new("dashboard", DashboardView::Overview, cx),
            api,
            session,
        }
    }

    pub fn view(&self) -> DashboardView {
        self.feature.view()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.feature.state()
    }

    /// Fetches the dashboard. A user embedded in the payload refreshes the
    /// session copy.
    pub async fn show_overview(&self) {
        let ticket = self.feature.enter(DashboardView::Overview, |state| {
            state.data = Loadable::Loading;
        });
        let api = self.api.clone();
        let session = self.session.clone();
        self.feature
            .load(
                ticket,
                "Loading dashboard",
                async move {
                    let data = api.dashboard().await?;
                    if let Some(user) = &data.user {
                        if session.is_authenticated() {
                            session.update_user(user.clone());
                        }
                    }
                    Ok(data)
                },
                |state, data| state.data = data,
            )
            .await;
    }

    pub fn reset(&self) {
        self.feature.cancel();
        self.feature.update(|state| *state = DashboardState::default());
    }
}
