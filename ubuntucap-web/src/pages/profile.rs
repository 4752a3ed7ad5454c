use crate::components::{FailedState, Loading, SelectField, TextField};
use crate::context::use_app_context;
use crate::features::{Loadable, ProfileManager, ProfileState, ProfileView};
use crate::hooks::draft_setter;
use crate::routes::Route;
use i18nrs::yew::use_translation;
use shared::format::{format_currency, format_date, humanize};
use shared::models::{ConsentType, EmploymentStatus, ProfileUpdate, User};
use std::rc::Rc;
use strum::IntoEnumIterator;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_store_value;

#[derive(Properties, PartialEq)]
pub struct ProfilePageProps {
    pub view: ProfileView,
}

#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfilePageProps) -> Html {
    let context = use_app_context();
    let profile = context.profile.clone();
    let state = use_store_value::<ProfileState>();
    let (i18n, ..) = use_translation();

    let enter = {
        let profile = profile.clone();
        Callback::from(move |view: ProfileView| {
            let profile = profile.clone();
            spawn_local(async move {
                match view {
                    ProfileView::Overview => profile.show_overview().await,
                    ProfileView::Edit => profile.show_edit().await,
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

    let body = match &state.profile {
        Loadable::Failed(message) => html! { <FailedState message={message.clone()} on_retry={retry} /> },
        Loadable::Ready(user) => match props.view {
            ProfileView::Overview => html! { <Overview user={user.clone()} {profile} state={state.clone()} /> },
            // Keyed so the draft is rebuilt when fresher data arrives.
            ProfileView::Edit => html! {
                <EditForm key={user.id.clone()} user={user.clone()} {profile} state={state.clone()} />
            },
        },
        _ => html! { <Loading /> },
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{i18n.t("nav.profile")}</h1>
            {body}
        </div>
    }
}

#[derive(Properties)]
struct ProfileProps {
    user: User,
    profile: ProfileManager,
    state: Rc<ProfileState>,
}

impl PartialEq for ProfileProps {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user && self.state == other.state
    }
}

#[function_component(Overview)]
fn overview(props: &ProfileProps) -> Html {
    let (i18n, ..) = use_translation();
    let user = &props.user;
    let details = user.profile.clone().unwrap_or_default();
    let completion = user.completion_percentage();
    let row = |key: &str, value: String| {
        html! {
            <tr><th class="font-normal text-base-content/70">{i18n.t(key)}</th><td>{value}</td></tr>
        }
    };
    let text = |value: Option<String>| value.filter(|v| !v.is_empty()).unwrap_or_else(|| "N/A".to_string());

    let consent = |consented: bool| {
        let profile = props.profile.clone();
        Callback::from(move |_: MouseEvent| {
            let profile = profile.clone();
            spawn_local(async move {
                profile.record_consent(ConsentType::MpesaAnalysis, consented).await;
            });
        })
    };
    let consent_busy = props.state.pending_consent.is_some();

    html! {
        <div class="grid gap-6 md:grid-cols-3">
            <div class="card bg-base-100 shadow">
                <div class="card-body items-center text-center">
                    <div class="avatar placeholder">
                        <div class="bg-primary text-primary-content w-20 rounded-full">
                            <span class="text-2xl">{user.initials()}</span>
                        </div>
                    </div>
                    <h2 class="card-title">{user.full_name()}</h2>
                    <p class="text-sm">{&user.phone_number}</p>
                    if user.is_verified {
                        <span class="badge badge-success">{i18n.t("dashboard.verified")}</span>
                    } else {
                        <span class="badge badge-warning">{i18n.t("dashboard.unverified")}</span>
                    }
                    <div class="w-full mt-4">
                        <div class="flex justify-between text-sm">
                            <span>{i18n.t("dashboard.profile_completion")}</span>
                            <span>{format!("{completion}%")}</span>
                        </div>
                        <progress class="progress progress-primary w-full" value={completion.to_string()} max="100"></progress>
                    </div>
                    <Link<Route> to={Route::ProfileEdit} classes="btn btn-primary btn-sm mt-2">{i18n.t("profile.edit")}</Link<Route>>
                </div>
            </div>
            <div class="card bg-base-100 shadow md:col-span-2">
                <div class="card-body">
                    <table class="table table-sm">
                        <tbody>
                            {row("profile.email", text(Some(user.email.clone())))}
                            {row("auth.id_number", text(Some(user.id_number.clone())))}
                            {row("profile.date_of_birth", format_date(details.date_of_birth.as_deref()))}
                            {row("profile.gender", text(details.gender.as_deref().map(humanize)))}
                            {row("profile.county", text(details.county.clone()))}
                            {row("profile.town", text(details.town.clone()))}
                            {row("profile.employment_status", text(details.employment_status.as_deref().map(humanize)))}
                            {row("profile.occupation", text(details.occupation.clone()))}
                            {row("profile.monthly_income", format_currency(details.monthly_income))}
                            {row("profile.member_since", format_date(user.date_joined.as_deref()))}
                        </tbody>
                    </table>
                </div>
            </div>
            <div class="card bg-base-100 shadow md:col-span-3">
                <div class="card-body">
                    <h2 class="card-title">{i18n.t("profile.consent_title")}</h2>
                    <p>{i18n.t("profile.consent_body")}</p>
                    <div class="card-actions justify-end">
                        <button class="btn btn-ghost btn-sm" disabled={consent_busy} onclick={consent(false)}>
                            {i18n.t("profile.consent_revoke")}
                        </button>
                        <button class="btn btn-primary btn-sm" disabled={consent_busy} onclick={consent(true)}>
                            {i18n.t("profile.consent_grant")}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[function_component(EditForm)]
fn edit_form(props: &ProfileProps) -> Html {
    let (i18n, ..) = use_translation();
    let seed = ProfileUpdate::from_user(&props.user);
    let draft = use_state(move || seed);

    let onsubmit = {
        let profile = props.profile.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let profile = profile.clone();
            let update = (*draft).clone();
            spawn_local(async move {
                profile.save(update).await;
            });
        })
    };
    let value = |field: &Option<String>| field.clone().unwrap_or_default();
    let employment: Vec<(AttrValue, AttrValue)> = EmploymentStatus::iter()
        .map(|status| (status.to_string().into(), status.label().into()))
        .collect();
    let genders: Vec<(AttrValue, AttrValue)> = [
        ("MALE", "profile.male"),
        ("FEMALE", "profile.female"),
        ("OTHER", "profile.other"),
        ("PREFER_NOT_TO_SAY", "profile.prefer_not_to_say"),
    ]
    .into_iter()
    .map(|(code, key)| (code.into(), i18n.t(key).into()))
    .collect();
    let errors = props.state.form_errors.clone();
    let busy = props.state.saving;

    html! {
        <form class="card bg-base-100 shadow" {onsubmit}>
            <div class="card-body">
                <div class="grid gap-2 md:grid-cols-2">
                    <TextField
                        name="first_name"
                        label={i18n.t("profile.first_name")}
                        value={value(&draft.first_name)}
                        on_input={draft_setter(&draft, |form, value| form.first_name = Some(value))}
                        errors={errors.clone()}
                        required=true
                    />
                    <TextField
                        name="last_name"
                        label={i18n.t("profile.last_name")}
                        value={value(&draft.last_name)}
                        on_input={draft_setter(&draft, |form, value| form.last_name = Some(value))}
                        errors={errors.clone()}
                        required=true
                    />
                    <TextField
                        name="email"
                        label={i18n.t("profile.email")}
                        input_type="email"
                        value={value(&draft.email)}
                        on_input={draft_setter(&draft, |form, value| form.email = Some(value))}
                        errors={errors.clone()}
                    />
                    <TextField
                        name="date_of_birth"
                        label={i18n.t("profile.date_of_birth")}
                        input_type="date"
                        value={value(&draft.date_of_birth)}
                        on_input={draft_setter(&draft, |form, value| form.date_of_birth = Some(value))}
                        errors={errors.clone()}
                    />
                    <SelectField
                        name="gender"
                        label={i18n.t("profile.gender")}
                        value={value(&draft.gender)}
                        options={genders}
                        placeholder={i18n.t("profile.select")}
                        on_change={draft_setter(&draft, |form, value| form.gender = Some(value))}
                        errors={errors.clone()}
                    />
                    <TextField
                        name="county"
                        label={i18n.t("profile.county")}
                        value={value(&draft.county)}
                        on_input={draft_setter(&draft, |form, value| form.county = Some(value))}
                        errors={errors.clone()}
                    />
                    <TextField
                        name="town"
                        label={i18n.t("profile.town")}
                        value={value(&draft.town)}
                        on_input={draft_setter(&draft, |form, value| form.town = Some(value))}
                        errors={errors.clone()}
                    />
                    <SelectField
                        name="employment_status"
                        label={i18n.t("profile.employment_status")}
                        value={value(&draft.employment_status)}
                        options={employment}
                        placeholder={i18n.t("profile.select")}
                        on_change={draft_setter(&draft, |form, value| form.employment_status = Some(value))}
                        errors={errors.clone()}
                    />
                    <TextField
                        name="occupation"
                        label={i18n.t("profile.occupation")}
                        value={value(&draft.occupation)}
                        on_input={draft_setter(&draft, |form, value| form.occupation = Some(value))}
                        errors={errors.clone()}
                    />
                    <TextField
                        name="monthly_income"
                        label={i18n.t("profile.monthly_income")}
                        input_type="number"
                        value={value(&draft.monthly_income)}
                        on_input={draft_setter(&draft, |form, value| form.monthly_income = Some(value))}
                        {errors}
                    />
                </div>
                <div class="card-actions justify-end mt-4">
                    <Link<Route> to={Route::Profile} classes="btn btn-ghost">{i18n.t("common.cancel")}</Link<Route>>
                    <button class="btn btn-primary" type="submit" disabled={busy}>
                        if busy {
                            <span class="loading loading-spinner loading-sm"></span>
                            {i18n.t("profile.saving")}
                        } else {
                            {i18n.t("profile.save")}
                        }
                    </button>
                </div>
            </div>
        </form>
    }
}
