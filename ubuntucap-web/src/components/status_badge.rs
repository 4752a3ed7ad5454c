use shared::format::format_score;
use shared::models::{LoanStatus, ScoreBand};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoanStatusBadgeProps {
    pub status: LoanStatus,
}

#[function_component(LoanStatusBadge)]
pub fn loan_status_badge(props: &LoanStatusBadgeProps) -> Html {
    let tone = match props.status {
        LoanStatus::Active | LoanStatus::Disbursed | LoanStatus::Approved => "badge-info",
        LoanStatus::Paid => "badge-success",
        LoanStatus::Rejected | LoanStatus::Defaulted => "badge-error",
        LoanStatus::Pending | LoanStatus::PendingDisbursement => "badge-warning",
        LoanStatus::Unknown => "badge-ghost",
    };
    html! {
        <span class={classes!("badge", tone)}>{props.status.label()}</span>
    }
}

#[derive(Properties, PartialEq)]
pub struct ScoreBadgeProps {
    pub score: Option<f64>,
}

/// Score with its band, e.g. `72 · Good`.
#[function_component(ScoreBadge)]
pub fn score_badge(props: &ScoreBadgeProps) -> Html {
    let Some(score) = props.score else {
        return html! { <span class="badge badge-ghost">{format_score(None)}</span> };
    };
    let band = ScoreBand::from_score(score);
    html! {
        <span class={classes!("badge", "badge-lg", band.badge_class())}>
            {format!("{} · {band}", format_score(Some(score)))}
        </span>
    }
}
