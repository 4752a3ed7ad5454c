use crate::components::{EmptyState, FailedState, Loading, ScoreBadge};
use crate::context::use_app_context;
use crate::features::{DashboardState, Loadable};
use crate::routes::Route;
use i18nrs::yew::use_translation;
use shared::format::{format_currency, format_date_time, humanize};
use shared::models::DashboardData;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_store_value;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let context = use_app_context();
    let dashboard = context.dashboard.clone();
    let state = use_store_value::<DashboardState>();
    let (i18n, ..) = use_translation();

    let load = {
        let dashboard = dashboard.clone();
        Callback::from(move |()| {
            let dashboard = dashboard.clone();
            spawn_local(async move { dashboard.show_overview().await });
        })
    };
    {
        let load = load.clone();
        use_effect_with((), move |()| {
            load.emit(());
            || ()
        });
    }

    let greeting = format!("{}, {}", i18n.t("dashboard.welcome"), context.session.user_name());
    let body = match &state.data {
        Loadable::Idle | Loadable::Loading => html! { <Loading /> },
        Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={load} /> },
        Loadable::Ready(data) => html! { <DashboardSummary data={data.clone()} /> },
    };

    html! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-3">
                <h1 class="text-2xl font-bold">{greeting}</h1>
                <div class="flex gap-2">
                    <Link<Route> to={Route::LoanApply} classes="btn btn-primary btn-sm">{i18n.t("loans.apply")}</Link<Route>>
                    <Link<Route> to={Route::Credit} classes="btn btn-ghost btn-sm">{i18n.t("dashboard.check_score")}</Link<Route>>
                </div>
            </div>
            {body}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct DashboardSummaryProps {
    data: DashboardData,
}

#[function_component(DashboardSummary)]
fn dashboard_summary(props: &DashboardSummaryProps) -> Html {
    let (i18n, ..) = use_translation();
    let data = &props.data;
    let stats = &data.loan_stats;
    let completion = data.profile_completion.unwrap_or_default();
    let stat = |label: &str, value: String| {
        html! {
            <div class="stat">
                <div class="stat-title">{i18n.t(label)}</div>
                <div class="stat-value text-2xl">{value}</div>
            </div>
        }
    };

    html! {
        <>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                {stat("dashboard.active_loans", stats.active_loans.to_string())}
                {stat("dashboard.total_borrowed", format_currency(Some(stats.total_borrowed)))}
                {stat("dashboard.total_repaid", format_currency(Some(stats.total_repaid)))}
                {stat("dashboard.outstanding", format_currency(Some(stats.outstanding_balance)))}
            </div>
            <div class="grid gap-6 md:grid-cols-2">
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">{i18n.t("dashboard.credit_score")}</h2>
                        <ScoreBadge score={data.credit_score} />
                        <div class="flex items-center gap-2 mt-2">
                            if data.is_verified {
                                <span class="badge badge-success">{i18n.t("dashboard.verified")}</span>
                            } else {
                                <span class="badge badge-warning">{i18n.t("dashboard.unverified")}</span>
                            }
                        </div>
                    </div>
                </div>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">{i18n.t("dashboard.profile_completion")}</h2>
                        <progress class="progress progress-primary w-full" value={completion.to_string()} max="100"></progress>
                        <span>{format!("{completion}%")}</span>
                        if completion < 100 {
                            <Link<Route> to={Route::ProfileEdit} classes="link link-primary text-sm">
                                {i18n.t("dashboard.complete_profile")}
                            </Link<Route>>
                        }
                    </div>
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{i18n.t("dashboard.recent_activity")}</h2>
                    if data.recent_activity.is_empty() {
                        <EmptyState message={i18n.t("dashboard.no_activity")} />
                    } else {
                        <ul class="divide-y divide-base-300">
                            { for data.recent_activity.iter().map(|activity| html! {
                                <li class="py-2 flex justify-between gap-4">
                                    <span>
                                        <span class="badge badge-ghost mr-2">{humanize(&activity.activity_type)}</span>
                                        {&activity.description}
                                    </span>
                                    <span class="text-sm text-base-content/70">
                                        {format_date_time(activity.created_at.as_deref())}
                                    </span>
                                </li>
                            }) }
                        </ul>
                    }
                </div>
            </div>
        </>
    }
}
