//! M-Pesa profile metrics, statement and STK push repayment.

use crate::components::{EmptyState, FailedState, Loading, SelectField, TextField};
use crate::context::use_app_context;
use crate::features::{Loadable, MpesaManager, MpesaState, MpesaView};
use crate::hooks::draft_setter;
use crate::routes::Route;
use i18nrs::yew::use_translation;
use shared::format::{format_currency, format_date, format_date_time, format_ratio, humanize};
use shared::models::{Loan, MAX_REPAYMENT_AMOUNT, MIN_REPAYMENT_AMOUNT, MpesaProfile, TransactionHistory};
use shared::validation::RepaymentForm;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_store_value;

#[derive(Properties, PartialEq)]
pub struct MpesaPageProps {
    pub view: MpesaView,
}

#[function_component(MpesaPage)]
pub fn mpesa_page(props: &MpesaPageProps) -> Html {
    let context = use_app_context();
    let mpesa = context.mpesa.clone();
    let state = use_store_value::<MpesaState>();
    let (i18n, ..) = use_translation();

    let enter = {
        let mpesa = mpesa.clone();
        Callback::from(move |view: MpesaView| {
            let mpesa = mpesa.clone();
            spawn_local(async move {
                match view {
                    MpesaView::Profile => mpesa.show_profile().await,
                    MpesaView::Transactions => mpesa.show_transactions().await,
                    MpesaView::Repayment => mpesa.show_repayment().await,
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

    let body = match props.view {
        MpesaView::Profile => match &state.profile {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(profile) => html! {
                <ProfileSummary profile={profile.clone()} mpesa={mpesa.clone()} working={state.working} />
            },
            _ => html! { <Loading /> },
        },
        MpesaView::Transactions => match &state.transactions {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(history) => html! { <Statement history={history.clone()} /> },
            _ => html! { <Loading /> },
        },
        MpesaView::Repayment => match &state.repayable {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(loans) if loans.is_empty() => html! {
                <EmptyState message={i18n.t("mpesa.no_loans")} />
            },
            Loadable::Ready(loans) => html! {
                <RepaymentFormView loans={loans.clone()} {mpesa} state={state.clone()} />
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
            <h1 class="text-2xl font-bold">{i18n.t("nav.mpesa")}</h1>
            <div role="tablist" class="tabs tabs-boxed w-fit">
                {tab(Route::Mpesa, "mpesa.profile", props.view == MpesaView::Profile)}
                {tab(Route::MpesaTransactions, "mpesa.transactions", props.view == MpesaView::Transactions)}
                {tab(Route::MpesaRepayment, "mpesa.repayment", props.view == MpesaView::Repayment)}
            </div>
            {body}
        </div>
    }
}

#[derive(Properties)]
struct ProfileSummaryProps {
    profile: Option<MpesaProfile>,
    mpesa: MpesaManager,
    working: bool,
}

impl PartialEq for ProfileSummaryProps {
    fn eq(&self, other: &Self) -> bool {
        self.profile == other.profile && self.working == other.working
    }
}

#[function_component(ProfileSummary)]
fn profile_summary(props: &ProfileSummaryProps) -> Html {
    let (i18n, ..) = use_translation();
    let run = |simulate: bool| {
        let mpesa = props.mpesa.clone();
        Callback::from(move |_: MouseEvent| {
            let mpesa = mpesa.clone();
            spawn_local(async move {
                if simulate {
                    mpesa.simulate().await;
                } else {
                    mpesa.refresh_analysis().await;
                }
            });
        })
    };
    let actions = html! {
        <div class="flex gap-2">
            <button class="btn btn-primary btn-sm" disabled={props.working} onclick={run(false)}>
                {i18n.t("mpesa.refresh")}
            </button>
            <button class="btn btn-ghost btn-sm" disabled={props.working} onclick={run(true)}>
                {i18n.t("mpesa.simulate")}
            </button>
            if props.working {
                <span class="loading loading-spinner loading-sm"></span>
            }
        </div>
    };

    let Some(profile) = props.profile.as_ref().filter(|profile| !profile.is_empty()) else {
        return html! {
            <EmptyState message={i18n.t("mpesa.no_profile")}>
                {actions}
            </EmptyState>
        };
    };
    let stat = |key: &str, value: String| {
        html! {
            <div class="stat">
                <div class="stat-title">{i18n.t(key)}</div>
                <div class="stat-value text-xl">{value}</div>
            </div>
        }
    };
    let yes_no = |flag: bool| i18n.t(if flag { "common.yes" } else { "common.no" });

    html! {
        <div class="space-y-4">
            {actions}
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                {stat("mpesa.weekly_income", format_currency(profile.average_weekly_income))}
                {stat("mpesa.weekly_expenses", format_currency(profile.average_weekly_expenses))}
                {stat("mpesa.weekly_surplus", format_currency(profile.weekly_surplus()))}
            </div>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                {stat("mpesa.consistency", format_ratio(profile.transaction_consistency))}
                {stat("mpesa.fuliza", format_ratio(profile.fuliza_repayment_ratio))}
                {stat("mpesa.savings", yes_no(profile.has_savings_habit))}
                {stat("mpesa.network", profile.network_diversity.to_string())}
            </div>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                {stat("mpesa.total_transactions", profile.total_transactions.to_string())}
                {stat("mpesa.volume", format_currency(profile.total_volume))}
                {stat("mpesa.active_days", profile.active_days.to_string())}
            </div>
            <p class="text-sm text-base-content/70">
                {format!("{}: {}", i18n.t("mpesa.last_analysis"), format_date_time(profile.last_analysis.as_deref()))}
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StatementProps {
    history: TransactionHistory,
}

#[function_component(Statement)]
fn statement(props: &StatementProps) -> Html {
    let (i18n, ..) = use_translation();
    if props.history.transactions.is_empty() {
        return html! { <EmptyState message={i18n.t("mpesa.no_transactions")} /> };
    }

    html! {
        <div class="overflow-x-auto">
            <p class="text-sm mb-2">{format!("{} {}", props.history.total_count, i18n.t("mpesa.transactions_total"))}</p>
            <table class="table table-sm">
                <thead>
                    <tr>
                        <th>{i18n.t("mpesa.date")}</th>
                        <th>{i18n.t("mpesa.description")}</th>
                        <th>{i18n.t("mpesa.category")}</th>
                        <th class="text-right">{i18n.t("mpesa.amount")}</th>
                    </tr>
                </thead>
                <tbody>
                    { for props.history.transactions.iter().map(|transaction| {
                        let (sign, tone) = if transaction.is_credit() { ("+", "text-success") } else { ("-", "text-error") };
                        let description = if transaction.description.is_empty() {
                            transaction.counterparty.clone()
                        } else {
                            transaction.description.clone()
                        };
                        html! {
                            <tr>
                                <td>{format_date(transaction.transaction_date.as_deref())}</td>
                                <td>
                                    {description}
                                    if let Some(receipt) = &transaction.receipt_number {
                                        <div class="text-xs text-base-content/60">{receipt}</div>
                                    }
                                </td>
                                <td>{humanize(&transaction.category)}</td>
                                <td class={classes!("text-right", tone)}>
                                    {format!("{sign}{}", format_currency(Some(transaction.amount.abs())))}
                                </td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        </div>
    }
}

#[derive(Properties)]
struct RepaymentFormProps {
    loans: Vec<Loan>,
    mpesa: MpesaManager,
    state: Rc<MpesaState>,
}

impl PartialEq for RepaymentFormProps {
    fn eq(&self, other: &Self) -> bool {
        self.loans == other.loans
            && self.state.form_errors == other.state.form_errors
            && self.state.submitting == other.state.submitting
            && self.state.last_initiation == other.state.last_initiation
    }
}

#[function_component(RepaymentFormView)]
fn repayment_form_view(props: &RepaymentFormProps) -> Html {
    let (i18n, ..) = use_translation();
    let phone = props.mpesa.default_phone();
    let only_loan = (props.loans.len() == 1).then(|| props.loans[0].id.clone());
    let draft = use_state(move || RepaymentForm {
        phone_number: phone,
        loan_id: only_loan.unwrap_or_default(),
        ..RepaymentForm::default()
    });

    let onsubmit = {
        let mpesa = props.mpesa.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let mpesa = mpesa.clone();
            let form = (*draft).clone();
            spawn_local(async move {
                mpesa.initiate_repayment(&form).await;
            });
        })
    };
    let loan_options: Vec<(AttrValue, AttrValue)> = props
        .loans
        .iter()
        .map(|loan| {
            let label = format!(
                "#{} · {} · {}",
                loan.id,
                format_currency(loan.total_amount_due),
                format_date(loan.due_date.as_deref())
            );
            (loan.id.clone().into(), label.into())
        })
        .collect();
    let errors = props.state.form_errors.clone();
    let busy = props.state.submitting;

    html! {
        <div class="space-y-4 max-w-xl">
            if let Some(initiation) = &props.state.last_initiation {
                <div class="alert alert-info">
                    <span>{i18n.t("mpesa.check_phone")}</span>
                    if let Some(checkout) = &initiation.checkout_request_id {
                        <span class="text-xs">{checkout}</span>
                    }
                </div>
            }
            <form class="card bg-base-100 shadow" {onsubmit}>
                <div class="card-body space-y-2">
                    <SelectField
                        name="loan_id"
                        label={i18n.t("mpesa.loan")}
                        value={draft.loan_id.clone()}
                        options={loan_options}
                        placeholder={i18n.t("mpesa.select_loan")}
                        on_change={draft_setter(&draft, |form, value| form.loan_id = value)}
                        errors={errors.clone()}
                    />
                    <TextField
                        name="phone_number"
                        label={i18n.t("auth.phone")}
                        input_type="tel"
                        value={draft.phone_number.clone()}
                        on_input={draft_setter(&draft, |form, value| form.phone_number = value)}
                        errors={errors.clone()}
                        required=true
                    />
                    <TextField
                        name="amount"
                        label={format!("{} (KES {MIN_REPAYMENT_AMOUNT} – {MAX_REPAYMENT_AMOUNT})", i18n.t("mpesa.amount"))}
                        input_type="number"
                        value={draft.amount.clone()}
                        on_input={draft_setter(&draft, |form, value| form.amount = value)}
                        {errors}
                        required=true
                    />
                    <div class="card-actions justify-end mt-4">
                        <button class="btn btn-primary" type="submit" disabled={busy}>
                            if busy {
                                <span class="loading loading-spinner loading-sm"></span>
                                {i18n.t("mpesa.sending")}
                            } else {
                                {i18n.t("mpesa.pay")}
                            }
                        </button>
                    </div>
                </div>
            </form>
        </div>
    }
}
