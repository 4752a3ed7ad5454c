//! Credit score analytics, score history and loan offers.

use crate::components::{EmptyState, FailedState, Loading, ScoreBadge};
use crate::context::use_app_context;
use crate::features::credit::OfferBook;
use crate::features::{CreditManager, CreditState, CreditView, Loadable};
use crate::routes::Route;
use i18nrs::yew::use_translation;
use shared::format::{format_currency, format_date, format_rate, format_score, humanize};
use shared::models::{
    LoanOffer, ScoreAnalytics, ScoreBand, ScoreHistoryEntry, ScoreTrend, improvement_tips,
    score_factors,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_store_value;

#[derive(Properties, PartialEq)]
pub struct CreditPageProps {
    pub view: CreditView,
}

#[function_component(CreditPage)]
pub fn credit_page(props: &CreditPageProps) -> Html {
    let context = use_app_context();
    let credit = context.credit.clone();
    let state = use_store_value::<CreditState>();
    let (i18n, ..) = use_translation();

    let enter = {
        let credit = credit.clone();
        Callback::from(move |view: CreditView| {
            let credit = credit.clone();
            spawn_local(async move {
                match view {
                    CreditView::Overview => credit.show_overview().await,
                    CreditView::History => credit.show_history().await,
                    CreditView::Offers => credit.show_offers().await,
                }
            });
        })
    };
    {
        let enter = enter.clone();
        use_effect_with(props.view, move |view| {
            enter.emit(*view);
            || ()
        });
    }
    let view = props.view;
    let retry = Callback::from(move |()| enter.emit(view));

    let calculate = {
        let credit = credit.clone();
        Callback::from(move |_: MouseEvent| {
            let credit = credit.clone();
            spawn_local(async move {
                credit.calculate_score().await;
            });
        })
    };

    let body = match props.view {
        CreditView::Overview => match &state.analytics {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(analytics) => html! { <Analytics analytics={analytics.clone()} /> },
            _ => html! { <Loading /> },
        },
        CreditView::History => match &state.history {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(history) => html! { <History entries={history.clone()} /> },
            _ => html! { <Loading /> },
        },
        CreditView::Offers => match &state.offers {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(book) => html! {
                <Offers book={book.clone()} {credit} pending={state.pending_offer.clone()} />
            },
            _ => html! { <Loading /> },
        },
    };

    let tab = |route: Route, key: &str, active: bool| {
        html! {
            <Link<Route> to={route} classes={classes!("tab", active.then_some("tab-active"))}>
                {i18n.t(key)}
            </Link<Route>>
        }
    };

    html! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-3">
                <h1 class="text-2xl font-bold">{i18n.t("nav.credit")}</h1>
                <button class="btn btn-primary btn-sm" onclick={calculate} disabled={state.calculating}>
                    if state.calculating {
                        <span class="loading loading-spinner loading-sm"></span>
                        {i18n.t("credit.calculating")}
                    } else {
                        {i18n.t("credit.calculate")}
                    }
                </button>
            </div>
            <div role="tablist" class="tabs tabs-boxed w-fit">
                {tab(Route::Credit, "credit.overview", props.view == CreditView::Overview)}
                {tab(Route::CreditHistory, "credit.history", props.view == CreditView::History)}
                {tab(Route::CreditOffers, "credit.offers", props.view == CreditView::Offers)}
            </div>
            if let Some(result) = &state.last_result {
                if let Some(offer) = &result.loan_offer {
                    <div class="alert alert-info">
                        <span>
                            {format!("{}: {}", i18n.t("credit.new_offer"), format_currency(offer.amount_offered))}
                        </span>
                        <Link<Route> to={Route::CreditOffers} classes="btn btn-sm">{i18n.t("common.view")}</Link<Route>>
                    </div>
                }
            }
            {body}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AnalyticsProps {
    analytics: ScoreAnalytics,
}

#[function_component(Analytics)]
fn analytics(props: &AnalyticsProps) -> Html {
    let (i18n, ..) = use_translation();
    let analytics = &props.analytics;
    let Some(score) = analytics.current_score else {
        return html! { <EmptyState message={i18n.t("credit.no_score")} /> };
    };
    let band = ScoreBand::from_score(score);
    let trend = match analytics.score_trend {
        ScoreTrend::Improving => ("↑", "text-success"),
        ScoreTrend::Declining => ("↓", "text-error"),
        ScoreTrend::Stable => ("→", "text-base-content"),
    };
    let gauge_style = format!("--value:{score:.0}; --size:9rem; color:{};", band.color());

    html! {
        <div class="grid gap-6 md:grid-cols-3">
            <div class="card bg-base-100 shadow">
                <div class="card-body items-center text-center">
                    <div class="radial-progress text-3xl font-bold" style={gauge_style} role="progressbar">
                        {format_score(Some(score))}
                    </div>
                    <ScoreBadge score={Some(score)} />
                </div>
            </div>
            <div class="stats stats-vertical shadow md:col-span-2">
                <div class="stat">
                    <div class="stat-title">{i18n.t("credit.best")}</div>
                    <div class="stat-value text-2xl">{format_score(analytics.best_score)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">{i18n.t("credit.average")}</div>
                    <div class="stat-value text-2xl">{format_score(analytics.average_score)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">{i18n.t("credit.trend")}</div>
                    <div class={classes!("stat-value", "text-2xl", trend.1)}>
                        {format!("{} {}", trend.0, analytics.score_trend)}
                    </div>
                    <div class="stat-desc">
                        {format!("{} {}", analytics.total_calculations, i18n.t("credit.calculations"))}
                        {" · "}
                        {format_date(analytics.latest_calculation.as_deref())}
                    </div>
                </div>
            </div>
            <ScoreBreakdown {score} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ScoreBreakdownProps {
    score: f64,
}

#[function_component(ScoreBreakdown)]
fn score_breakdown(props: &ScoreBreakdownProps) -> Html {
    let (i18n, ..) = use_translation();

    html! {
        <>
            <div class="card bg-base-100 shadow md:col-span-2">
                <div class="card-body gap-3">
                    <h2 class="card-title">{i18n.t("credit.factors_title")}</h2>
                    { for score_factors(props.score).into_iter().map(|rating| html! {
                        <div class="flex items-center justify-between rounded-lg bg-base-200 p-3">
                            <div>
                                <div class="font-semibold">{i18n.t(&format!("credit.factors.{}.name", rating.factor))}</div>
                                <div class="text-sm opacity-70">{i18n.t(&format!("credit.factors.{}.description", rating.factor))}</div>
                            </div>
                            <div class="text-right">
                                <div class="font-semibold" style={format!("color:{};", rating.color())}>
                                    {i18n.t(&format!("credit.impact.{}", rating.impact))}
                                </div>
                                <div class="text-sm opacity-70">{i18n.t(&format!("credit.status.{}", rating.status))}</div>
                            </div>
                        </div>
                    }) }
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body gap-3">
                    <h2 class="card-title">{i18n.t("credit.tips_title")}</h2>
                    <ul class="space-y-2">
                        { for improvement_tips(props.score).into_iter().map(|tip| html! {
                            <li class="flex gap-2">
                                <span>{"💡"}</span>
                                <span>{i18n.t(&format!("credit.tips.{tip}"))}</span>
                            </li>
                        }) }
                    </ul>
                </div>
            </div>
        </>
    }
}

#[derive(Properties, PartialEq)]
struct HistoryProps {
    entries: Vec<ScoreHistoryEntry>,
}

#[function_component(History)]
fn history(props: &HistoryProps) -> Html {
    let (i18n, ..) = use_translation();
    if props.entries.is_empty() {
        return html! { <EmptyState message={i18n.t("credit.no_history")} /> };
    }

    html! {
        <div class="overflow-x-auto">
            <table class="table">
                <thead>
                    <tr>
                        <th>{i18n.t("credit.date")}</th>
                        <th>{i18n.t("credit.score")}</th>
                        <th>{i18n.t("credit.model")}</th>
                        <th>{i18n.t("credit.offers")}</th>
                    </tr>
                </thead>
                <tbody>
                    { for props.entries.iter().map(|entry| html! {
                        <tr>
                            <td>{format_date(entry.date.as_deref())}</td>
                            <td><ScoreBadge score={entry.score} /></td>
                            <td>{&entry.model_version}</td>
                            <td>{entry.loan_offers_count}</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[derive(Properties)]
struct OffersProps {
    book: OfferBook,
    credit: CreditManager,
    pending: Option<String>,
}

impl PartialEq for OffersProps {
    fn eq(&self, other: &Self) -> bool {
        self.book == other.book && self.pending == other.pending
    }
}

#[function_component(Offers)]
fn offers(props: &OffersProps) -> Html {
    let (i18n, ..) = use_translation();
    let respond = |offer: &LoanOffer, accept: bool| {
        let credit = props.credit.clone();
        let id = offer.id.clone();
        Callback::from(move |_: MouseEvent| {
            let credit = credit.clone();
            let id = id.clone();
            spawn_local(async move {
                if accept {
                    credit.accept_offer(&id).await;
                } else {
                    credit.decline_offer(&id).await;
                }
            });
        })
    };
    let busy = props.pending.is_some();

    html! {
        <div class="space-y-6">
            if props.book.current.is_empty() {
                <EmptyState message={i18n.t("credit.no_offers")} />
            } else {
                <div class="grid gap-4 md:grid-cols-2">
                    { for props.book.current.iter().map(|offer| html! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h2 class="card-title">{format_currency(offer.amount_offered)}</h2>
                                <p>{format!("{}: {}", i18n.t("credit.rate"), format_rate(offer.interest_rate))}</p>
                                <p>{format!("{}: {}", i18n.t("credit.monthly"), format_currency(offer.monthly_payment))}</p>
                                if let Some(months) = offer.term_months {
                                    <p>{format!("{}: {months}", i18n.t("credit.term_months"))}</p>
                                }
                                <p class="text-sm text-base-content/70">
                                    {format!("{}: {}", i18n.t("credit.expires"), format_date(offer.expires_at.as_deref()))}
                                </p>
                                if offer.status.is_actionable() {
                                    <div class="card-actions justify-end">
                                        <button class="btn btn-ghost btn-sm" disabled={busy} onclick={respond(offer, false)}>
                                            {i18n.t("credit.decline")}
                                        </button>
                                        <button class="btn btn-primary btn-sm" disabled={busy} onclick={respond(offer, true)}>
                                            {i18n.t("credit.accept")}
                                        </button>
                                    </div>
                                }
                            </div>
                        </div>
                    }) }
                </div>
            }
            if !props.book.history.is_empty() {
                <h2 class="text-lg font-semibold">{i18n.t("credit.offer_history")}</h2>
                <div class="overflow-x-auto">
                    <table class="table table-sm">
                        <tbody>
                            { for props.book.history.iter().map(|offer| html! {
                                <tr>
                                    <td>{format_date(offer.created_at.as_deref())}</td>
                                    <td>{format_currency(offer.amount_offered)}</td>
                                    <td>{format_rate(offer.interest_rate)}</td>
                                    <td><span class="badge badge-ghost">{humanize(&offer.status.to_string())}</span></td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            }
        </div>
    }
}
