//! Credit score analytics, history, calculation and loan offers.

use super::{Feature, Loadable, action_failed};
use crate::api::UbuntuCapApi;
use crate::notify::NoticeBoard;
use shared::format::format_score;
use shared::models::{
    CalculateScoreRequest, CreditScoreResult, LoanOffer, ScoreAnalytics, ScoreHistoryEntry,
};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};
use yewdux::{Context, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditView {
    Overview,
    History,
    Offers,
}

/// Current offers and everything offered before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferBook {
    pub current: Vec<LoanOffer>,
    pub history: Vec<LoanOffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct CreditState {
    pub analytics: Loadable<ScoreAnalytics>,
    pub history: Loadable<Vec<ScoreHistoryEntry>>,
    pub offers: Loadable<OfferBook>,
    pub last_result: Option<CreditScoreResult>,
    pub calculating: bool,
    /// Offer with an accept or decline in flight.
    pub pending_offer: Option<String>,
}

#[derive(Clone)]
pub struct CreditManager {
    feature: Rc<Feature<CreditView, CreditState>>,
    api: UbuntuCapApi,
    notices: NoticeBoard,
}

impl fmt::Debug for CreditManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditManager")
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

impl CreditManager {
    pub fn new(cx: &Context, api: UbuntuCapApi, notices: NoticeBoard) -> Self {
        Self {
            feature: Feature::new("credit", CreditView::Overview, cx),
            api,
            notices,
        }
    }

    pub fn view(&self) -> CreditView {
        self.feature.view()
    }

    pub fn snapshot(&self) -> CreditState {
        self.feature.state()
    }

    pub async fn show_overview(&self) {
        let ticket = self.feature.enter(CreditView::Overview, |state| {
            state.analytics = Loadable::Loading;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading credit analytics",
                async move { api.score_analytics().await },
                |state, analytics| state.analytics = analytics,
            )
            .await;
    }

    pub async fn show_history(&self) {
        let ticket = self.feature.enter(CreditView::History, |state| {
            state.history = Loadable::Loading;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading score history",
                async move { api.score_history().await },
                |state, history| state.history = history,
            )
            .await;
    }

    pub async fn show_offers(&self) {
        let ticket = self.feature.enter(CreditView::Offers, |state| {
            state.offers = Loadable::Loading;
        });
        let api = self.api.clone();
        self.feature
            .load(
                ticket,
                "Loading loan offers",
                async move {
                    let (current, history) =
                        futures::try_join!(api.current_offers(), api.offer_history())?;
                    Ok(OfferBook { current, history })
                },
                |state, offers| state.offers = offers,
            )
            .await;
    }

    /// Re-enters the current view, refetching its data.
    pub async fn refresh(&self) {
        match self.view() {
            CreditView::Overview => self.show_overview().await,
            CreditView::History => self.show_history().await,
            CreditView::Offers => self.show_offers().await,
        }
    }

    /// Runs a fresh score calculation, then refreshes the view.
    pub async fn calculate_score(&self) -> bool {
        if self.feature.with_state(|state| state.calculating) {
            debug!("score calculation already running");
            return false;
        }
        self.feature.update(|state| state.calculating = true);

        match self.api.calculate_score(&CalculateScoreRequest::default()).await {
            Ok(result) => {
                info!(score = ?result.credit_score, "credit score calculated");
                self.notices.success(format!(
                    "Credit score calculated: {} ({})",
                    format_score(result.credit_score),
                    result.category()
                ));
                self.feature.update(|state| {
                    state.calculating = false;
                    state.last_result = Some(result);
                });
                self.refresh().await;
                true
            }
            Err(err) => {
                action_failed(&self.notices, "Credit score calculation", &[], &err);
                self.feature.update(|state| state.calculating = false);
                false
            }
        }
    }

    pub async fn accept_offer(&self, offer_id: &str) -> bool {
        self.respond_to_offer(offer_id, true).await
    }

    pub async fn decline_offer(&self, offer_id: &str) -> bool {
        self.respond_to_offer(offer_id, false).await
    }

    async fn respond_to_offer(&self, offer_id: &str, accept: bool) -> bool {
        if self.feature.with_state(|state| state.pending_offer.is_some()) {
            debug!(offer_id, "offer response already in flight");
            return false;
        }
        let id = offer_id.to_string();
        self.feature.update(|state| state.pending_offer = Some(id));

        let (outcome, operation, fallback) = if accept {
            (
                self.api.accept_offer(offer_id).await,
                "Accepting offer",
                "Offer accepted. Your loan is being processed.",
            )
        } else {
            (
                self.api.decline_offer(offer_id).await,
                "Declining offer",
                "Offer declined.",
            )
        };
        self.feature.update(|state| state.pending_offer = None);

        match outcome {
            Ok(ack) => {
                info!(offer_id, accept, "offer answered");
                self.notices
                    .success(ack.message.unwrap_or_else(|| fallback.to_string()));
                self.show_offers().await;
                true
            }
            Err(err) => {
                action_failed(&self.notices, operation, &[], &err);
                false
            }
        }
    }

    pub fn reset(&self) {
        self.feature.cancel();
        self.feature.update(|state| *state = CreditState::default());
    }
}
