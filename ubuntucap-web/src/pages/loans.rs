//! Loan application, portfolio and loan details.

use crate::components::{EmptyState, FailedState, Loading, LoanStatusBadge, SelectField, TextField};
use crate::context::use_app_context;
use crate::features::{Loadable, LoansManager, LoansState, LoansView};
use crate::hooks::draft_setter;
use crate::routes::Route;
use i18nrs::yew::use_translation;
use shared::format::{format_currency, format_date, format_rate};
use shared::models::{
    DEFAULT_LOAN_TERM, LOAN_TERMS, LoanDetails, LoanPortfolio, LoanPurpose, MAX_LOAN_AMOUNT,
    MIN_LOAN_AMOUNT,
};
use shared::validation::LoanApplicationForm;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_store_value;

#[derive(Properties, PartialEq)]
pub struct LoansPageProps {
    pub view: LoansView,
    #[prop_or_default]
    pub loan_id: Option<String>,
}

#[function_component(LoansPage)]
pub fn loans_page(props: &LoansPageProps) -> Html {
    let context = use_app_context();
    let loans = context.loans.clone();
    let state = use_store_value::<LoansState>();
    let (i18n, ..) = use_translation();

    let enter = {
        let loans = loans.clone();
        Callback::from(move |(view, loan_id): (LoansView, Option<String>)| {
            let loans = loans.clone();
            match (view, loan_id) {
                (LoansView::Application, _) => loans.show_application(),
                (LoansView::Details, Some(id)) => {
                    spawn_local(async move { loans.show_details(&id).await });
                }
                _ => spawn_local(async move { loans.show_list().await }),
            }
        })
    };
    {
        let enter = enter.clone();
        use_effect_with((props.view, props.loan_id.clone()), move |deps| {
            enter.emit(deps.clone());
            || ()
        });
    }
    let retry = {
        let deps = (props.view, props.loan_id.clone());
        Callback::from(move |()| enter.emit(deps.clone()))
    };

    let tab = |route: Route, key: &str, active: bool| {
        html! {
            <Link<Route> to={route} classes={classes!("tab", active.then_some("tab-active"))}>
                {i18n.t(key)}
            </Link<Route>>
        }
    };
    let body = match props.view {
        LoansView::Application => html! { <ApplicationForm {loans} state={state.clone()} /> },
        LoansView::List => match &state.portfolio {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(portfolio) => html! { <Portfolio portfolio={portfolio.clone()} /> },
            _ => html! { <Loading /> },
        },
        LoansView::Details => match &state.details {
            Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
            Loadable::Ready(details) => html! { <Details details={details.clone()} /> },
            _ => html! { <Loading /> },
        },
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{i18n.t("nav.loans")}</h1>
            <div role="tablist" class="tabs tabs-boxed w-fit">
                {tab(Route::Loans, "loans.my_loans", props.view != LoansView::Application)}
                {tab(Route::LoanApply, "loans.apply", props.view == LoansView::Application)}
            </div>
            if props.view == LoansView::List {
                if let Some(receipt) = &state.receipt {
                    <div class="alert alert-success">
                        <span>
                            {receipt.message.clone().unwrap_or_else(|| i18n.t("loans.submitted"))}
                            if let Some(id) = &receipt.application_id {
                                {format!(" (#{id})")}
                            }
                        </span>
                    </div>
                }
            }
            {body}
        </div>
    }
}

#[derive(Properties)]
struct ApplicationFormProps {
    loans: LoansManager,
    state: Rc<LoansState>,
}

impl PartialEq for ApplicationFormProps {
    fn eq(&self, other: &Self) -> bool {
        self.state.form_errors == other.state.form_errors
            && self.state.submitting == other.state.submitting
    }
}

#[function_component(ApplicationForm)]
fn application_form(props: &ApplicationFormProps) -> Html {
    let (i18n, ..) = use_translation();
    let draft = use_state(|| LoanApplicationForm {
        term_days: DEFAULT_LOAN_TERM.to_string(),
        ..LoanApplicationForm::default()
    });

    let onsubmit = {
        let loans = props.loans.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let loans = loans.clone();
            let draft = draft.clone();
            let form = (*draft).clone();
            spawn_local(async move {
                if loans.submit_application(&form).await {
                    draft.set(LoanApplicationForm::default());
                }
            });
        })
    };
    let terms: Vec<(AttrValue, AttrValue)> = LOAN_TERMS
        .iter()
        .map(|days| (days.to_string().into(), format!("{days} {}", i18n.t("loans.days")).into()))
        .collect();
    let purposes: Vec<(AttrValue, AttrValue)> = LoanPurpose::all()
        .map(|purpose| (purpose.to_string().into(), purpose.label().into()))
        .collect();
    let errors = props.state.form_errors.clone();
    let busy = props.state.submitting;

    html! {
        <form class="card bg-base-100 shadow max-w-xl" {onsubmit}>
            <div class="card-body space-y-2">
                <TextField
                    name="amount"
                    label={format!("{} (KES {MIN_LOAN_AMOUNT} – {MAX_LOAN_AMOUNT})", i18n.t("loans.amount"))}
                    input_type="number"
                    placeholder="5000"
                    value={draft.amount.clone()}
                    on_input={draft_setter(&draft, |form, value| form.amount = value)}
                    errors={errors.clone()}
                    required=true
                />
                <SelectField
                    name="term_days"
                    label={i18n.t("loans.term")}
                    value={draft.term_days.clone()}
                    options={terms}
                    on_change={draft_setter(&draft, |form, value| form.term_days = value)}
                    errors={errors.clone()}
                />
                <SelectField
                    name="purpose"
                    label={i18n.t("loans.purpose")}
                    value={draft.purpose.clone()}
                    options={purposes}
                    placeholder={i18n.t("loans.select_purpose")}
                    on_change={draft_setter(&draft, |form, value| form.purpose = value)}
                    errors={errors.clone()}
                />
                <TextField
                    name="notes"
                    label={i18n.t("loans.notes")}
                    value={draft.notes.clone()}
                    on_input={draft_setter(&draft, |form, value| form.notes = value)}
                    {errors}
                />
                <div class="card-actions justify-end mt-4">
                    <button class="btn btn-primary" type="submit" disabled={busy}>
                        if busy {
                            <span class="loading loading-spinner loading-sm"></span>
                            {i18n.t("loans.submitting")}
                        } else {
                            {i18n.t("loans.submit")}
                        }
                    </button>
                </div>
            </div>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct PortfolioProps {
    portfolio: LoanPortfolio,
}

#[function_component(Portfolio)]
fn portfolio(props: &PortfolioProps) -> Html {
    let (i18n, ..) = use_translation();
    let portfolio = &props.portfolio;
    if portfolio.is_empty() {
        return html! {
            <EmptyState message={i18n.t("loans.empty")}>
                <Link<Route> to={Route::LoanApply} classes="btn btn-primary btn-sm">{i18n.t("loans.apply")}</Link<Route>>
            </EmptyState>
        };
    }

    html! {
        <div class="space-y-6">
            if !portfolio.loans.is_empty() {
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{i18n.t("loans.principal")}</th>
                                <th>{i18n.t("loans.total_due")}</th>
                                <th>{i18n.t("loans.status")}</th>
                                <th>{i18n.t("loans.due_date")}</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            { for portfolio.loans.iter().map(|loan| html! {
                                <tr class={classes!(loan.is_overdue.then_some("text-error"))}>
                                    <td>{format_currency(loan.principal_amount)}</td>
                                    <td>{format_currency(loan.total_amount_due)}</td>
                                    <td><LoanStatusBadge status={loan.status} /></td>
                                    <td>{format_date(loan.due_date.as_deref())}</td>
                                    <td>
                                        <Link<Route> to={Route::LoanDetails { id: loan.id.clone() }} classes="btn btn-ghost btn-xs">
                                            {i18n.t("common.view")}
                                        </Link<Route>>
                                    </td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            }
            if !portfolio.applications.is_empty() {
                <h2 class="text-lg font-semibold">{i18n.t("loans.applications")}</h2>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{i18n.t("loans.requested")}</th>
                                <th>{i18n.t("loans.term")}</th>
                                <th>{i18n.t("loans.purpose")}</th>
                                <th>{i18n.t("loans.status")}</th>
                                <th>{i18n.t("loans.applied_on")}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for portfolio.applications.iter().map(|application| html! {
                                <tr>
                                    <td>{format_currency(application.requested_amount)}</td>
                                    <td>{application.requested_term.map_or_else(String::new, |days| format!("{days} {}", i18n.t("loans.days")))}</td>
                                    <td>{application.purpose.clone().unwrap_or_default()}</td>
                                    <td>
                                        <LoanStatusBadge status={application.status} />
                                        if let Some(reason) = &application.rejection_reason {
                                            <div class="text-xs text-error">{reason}</div>
                                        }
                                    </td>
                                    <td>{format_date(application.created_at.as_deref())}</td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct DetailsProps {
    details: LoanDetails,
}

#[function_component(Details)]
fn details(props: &DetailsProps) -> Html {
    let (i18n, ..) = use_translation();
    let LoanDetails {
        loan,
        repayment_summary: summary,
        repayment_history: history,
    } = &props.details;
    let row = |key: &str, value: String| {
        html! {
            <tr><th class="font-normal text-base-content/70">{i18n.t(key)}</th><td>{value}</td></tr>
        }
    };

    html! {
        <div class="grid gap-6 md:grid-cols-2">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h2 class="card-title">{format!("{} #{}", i18n.t("loans.loan"), loan.id)}</h2>
                        <LoanStatusBadge status={loan.status} />
                    </div>
                    <table class="table table-sm">
                        <tbody>
                            {row("loans.principal", format_currency(loan.principal_amount))}
                            {row("loans.interest", format_rate(loan.interest_rate))}
                            {row("loans.total_due", format_currency(loan.total_amount_due))}
                            {row("loans.disbursed", format_currency(loan.amount_disbursed))}
                            {row("loans.disbursed_on", format_date(loan.disbursed_at.as_deref()))}
                            {row("loans.due_date", format_date(loan.due_date.as_deref()))}
                            if let Some(days) = loan.days_remaining {
                                {row("loans.days_remaining", days.to_string())}
                            }
                        </tbody>
                    </table>
                    if loan.is_overdue {
                        <div class="alert alert-warning">{i18n.t("loans.overdue")}</div>
                    }
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{i18n.t("loans.repayments")}</h2>
                    <table class="table table-sm">
                        <tbody>
                            {row("loans.repaid", format_currency(Some(summary.total_repaid)))}
                            {row("loans.remaining", format_currency(Some(summary.remaining_balance)))}
                        </tbody>
                    </table>
                    if history.is_empty() {
                        <EmptyState message={i18n.t("loans.no_repayments")} />
                    } else {
                        <ul class="divide-y divide-base-300">
                            { for history.iter().map(|repayment| html! {
                                <li class="py-2 flex justify-between">
                                    <span>{format_currency(Some(repayment.amount))}</span>
                                    <span class="text-sm text-base-content/70">
                                        {format!("{} · {}", repayment.payment_method, format_date(repayment.paid_at.as_deref()))}
                                    </span>
                                </li>
                            }) }
                        </ul>
                    }
                    if !summary.is_fully_repaid && loan.status.is_outstanding() {
                        <div class="card-actions justify-end">
                            <Link<Route> to={Route::MpesaRepayment} classes="btn btn-primary btn-sm">
                                {i18n.t("loans.repay")}
                            </Link<Route>>
                        </div>
                    }
                </div>
            </div>
        </div>
    }
}
