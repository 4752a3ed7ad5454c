//! Sign-in, registration, phone verification and password reset forms.

use crate::components::TextField;
use crate::context::use_app_context;
use crate::features::{AuthManager, AuthState, AuthView};
use crate::hooks::draft_setter;
use crate::routes::Route;
use i18nrs::yew::use_translation;
use shared::validation::{LoginForm, PasswordResetForm, RegistrationForm};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_store_value;

#[derive(Properties, PartialEq)]
pub struct AuthPageProps {
    pub view: AuthView,
}

#[function_component(AuthPage)]
pub fn auth_page(props: &AuthPageProps) -> Html {
    let context = use_app_context();
    let auth = context.auth.clone();
    let state = use_store_value::<AuthState>();
    let (i18n, ..) = use_translation();

    {
        let auth = auth.clone();
        use_effect_with(props.view, move |view| {
            match view {
                AuthView::Login => auth.show_login(),
                AuthView::Register => auth.show_register(),
                AuthView::Verify => auth.show_verify(),
                AuthView::ResetRequest => auth.show_reset_request(),
                AuthView::ResetConfirm => auth.show_reset_confirm(),
            }
            || ()
        });
    }

    // The reset request advances to confirmation without a route change.
    let view = auth.view();
    let (title, form) = match view {
        AuthView::Login => ("auth.login_title", html! { <LoginFormView {auth} state={state.clone()} /> }),
        AuthView::Register => ("auth.register_title", html! { <RegisterFormView {auth} state={state.clone()} /> }),
        AuthView::Verify => ("auth.verify_title", html! { <VerifyFormView {auth} state={state.clone()} /> }),
        AuthView::ResetRequest => ("auth.reset_title", html! { <ResetRequestView {auth} state={state.clone()} /> }),
        AuthView::ResetConfirm => ("auth.reset_confirm_title", html! { <ResetConfirmView {auth} state={state.clone()} /> }),
    };

    html! {
        <div class="flex items-center justify-center py-10">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <div class="card-body">
                    <h2 class="card-title text-2xl">{i18n.t(title)}</h2>
                    if let Some(message) = &state.error {
                        <div class="alert alert-error">
                            <span>{message.clone()}</span>
                        </div>
                    }
                    {form}
                </div>
            </div>
        </div>
    }
}

#[derive(Properties)]
struct FormProps {
    auth: AuthManager,
    state: Rc<AuthState>,
}

impl PartialEq for FormProps {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

fn submit_button(busy: bool, label: String, busy_label: String) -> Html {
    html! {
        <div class="form-control mt-6">
            <button class="btn btn-primary" type="submit" disabled={busy}>
                if busy {
                    <span class="loading loading-spinner loading-sm"></span>
                    {busy_label}
                } else {
                    {label}
                }
            </button>
        </div>
    }
}

#[function_component(LoginFormView)]
fn login_form_view(props: &FormProps) -> Html {
    let (i18n, ..) = use_translation();
    let draft = use_state(LoginForm::default);

    let onsubmit = {
        let auth = props.auth.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let auth = auth.clone();
            let form = (*draft).clone();
            spawn_local(async move {
                auth.login(&form).await;
            });
        })
    };
    let errors = props.state.form_errors.clone();

    html! {
        <form class="space-y-2" {onsubmit}>
            <TextField
                name="phone_number"
                label={i18n.t("auth.phone")}
                input_type="tel"
                placeholder="0712345678"
                value={draft.phone_number.clone()}
                on_input={draft_setter(&draft, |form, value| form.phone_number = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="password"
                label={i18n.t("auth.password")}
                input_type="password"
                value={draft.password.clone()}
                on_input={draft_setter(&draft, |form, value| form.password = value)}
                {errors}
                required=true
            />
            <div class="flex justify-end">
                <Link<Route> to={Route::ResetPassword} classes="link link-hover text-sm">
                    {i18n.t("auth.forgot_password")}
                </Link<Route>>
            </div>
            {submit_button(props.state.submitting, i18n.t("auth.sign_in"), i18n.t("auth.signing_in"))}
            <p class="text-sm text-center">
                {i18n.t("auth.no_account")}{" "}
                <Link<Route> to={Route::Register} classes="link link-primary">{i18n.t("header.register")}</Link<Route>>
            </p>
        </form>
    }
}

#[function_component(RegisterFormView)]
fn register_form_view(props: &FormProps) -> Html {
    let (i18n, ..) = use_translation();
    let draft = use_state(RegistrationForm::default);

    let onsubmit = {
        let auth = props.auth.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let auth = auth.clone();
            let form = (*draft).clone();
            spawn_local(async move {
                auth.register(&form).await;
            });
        })
    };
    let errors = props.state.form_errors.clone();

    html! {
        <form class="space-y-2" {onsubmit}>
            <div class="grid gap-2 sm:grid-cols-2">
                <TextField
                    name="first_name"
                    label={i18n.t("profile.first_name")}
                    value={draft.first_name.clone()}
                    on_input={draft_setter(&draft, |form, value| form.first_name = value)}
                    errors={errors.clone()}
                    required=true
                />
                <TextField
                    name="last_name"
                    label={i18n.t("profile.last_name")}
                    value={draft.last_name.clone()}
                    on_input={draft_setter(&draft, |form, value| form.last_name = value)}
                    errors={errors.clone()}
                    required=true
                />
            </div>
            <TextField
                name="email"
                label={i18n.t("profile.email")}
                input_type="email"
                value={draft.email.clone()}
                on_input={draft_setter(&draft, |form, value| form.email = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="phone_number"
                label={i18n.t("auth.phone")}
                input_type="tel"
                placeholder="0712345678"
                value={draft.phone_number.clone()}
                on_input={draft_setter(&draft, |form, value| form.phone_number = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="id_number"
                label={i18n.t("auth.id_number")}
                value={draft.id_number.clone()}
                on_input={draft_setter(&draft, |form, value| form.id_number = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="password"
                label={i18n.t("auth.password")}
                input_type="password"
                value={draft.password.clone()}
                on_input={draft_setter(&draft, |form, value| form.password = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="password_confirm"
                label={i18n.t("auth.password_confirm")}
                input_type="password"
                value={draft.password_confirm.clone()}
                on_input={draft_setter(&draft, |form, value| form.password_confirm = value)}
                {errors}
                required=true
            />
            <p class="text-xs text-base-content/70">{i18n.t("auth.password_hint")}</p>
            {submit_button(props.state.submitting, i18n.t("auth.create_account"), i18n.t("auth.creating_account"))}
            <p class="text-sm text-center">
                {i18n.t("auth.have_account")}{" "}
                <Link<Route> to={Route::Login} classes="link link-primary">{i18n.t("header.login")}</Link<Route>>
            </p>
        </form>
    }
}

#[function_component(VerifyFormView)]
fn verify_form_view(props: &FormProps) -> Html {
    let (i18n, ..) = use_translation();
    let pending = props.state.pending_phone.clone().unwrap_or_default();
    let phone = use_state(move || pending);
    let code = use_state(String::new);

    let onsubmit = {
        let auth = props.auth.clone();
        let (phone, code) = (phone.clone(), code.clone());
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let auth = auth.clone();
            let (phone, code) = ((*phone).clone(), (*code).clone());
            spawn_local(async move {
                auth.verify(&phone, &code).await;
            });
        })
    };
    let set = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |value: String| handle.set(value))
    };
    let errors = props.state.form_errors.clone();

    html! {
        <form class="space-y-2" {onsubmit}>
            <p class="text-sm">{i18n.t("auth.verify_hint")}</p>
            <TextField
                name="phone_number"
                label={i18n.t("auth.phone")}
                input_type="tel"
                value={(*phone).clone()}
                on_input={set(&phone)}
                errors={errors.clone()}
            />
            <TextField
                name="code"
                label={i18n.t("auth.code")}
                placeholder="123456"
                value={(*code).clone()}
                on_input={set(&code)}
                {errors}
                required=true
            />
            {submit_button(props.state.submitting, i18n.t("auth.verify"), i18n.t("auth.verifying"))}
        </form>
    }
}

#[function_component(ResetRequestView)]
fn reset_request_view(props: &FormProps) -> Html {
    let (i18n, ..) = use_translation();
    let phone = use_state(String::new);

    let onsubmit = {
        let auth = props.auth.clone();
        let phone = phone.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let auth = auth.clone();
            let phone = (*phone).clone();
            spawn_local(async move {
                auth.request_reset(&phone).await;
            });
        })
    };
    let on_input = {
        let phone = phone.clone();
        Callback::from(move |value: String| phone.set(value))
    };

    html! {
        <form class="space-y-2" {onsubmit}>
            <p class="text-sm">{i18n.t("auth.reset_hint")}</p>
            <TextField
                name="phone_number"
                label={i18n.t("auth.phone")}
                input_type="tel"
                placeholder="0712345678"
                value={(*phone).clone()}
                {on_input}
                errors={props.state.form_errors.clone()}
                required=true
            />
            {submit_button(props.state.submitting, i18n.t("auth.send_code"), i18n.t("auth.sending"))}
            <p class="text-sm text-center">
                <Link<Route> to={Route::Login} classes="link link-hover">{i18n.t("auth.back_to_login")}</Link<Route>>
            </p>
        </form>
    }
}

#[function_component(ResetConfirmView)]
fn reset_confirm_view(props: &FormProps) -> Html {
    let (i18n, ..) = use_translation();
    let pending = props.state.pending_phone.clone().unwrap_or_default();
    let draft = use_state(move || PasswordResetForm {
        phone_number: pending,
        ..PasswordResetForm::default()
    });

    let onsubmit = {
        let auth = props.auth.clone();
        let draft = draft.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let auth = auth.clone();
            let form = (*draft).clone();
            spawn_local(async move {
                auth.confirm_reset(&form).await;
            });
        })
    };
    let errors = props.state.form_errors.clone();

    html! {
        <form class="space-y-2" {onsubmit}>
            <TextField
                name="phone_number"
                label={i18n.t("auth.phone")}
                input_type="tel"
                value={draft.phone_number.clone()}
                on_input={draft_setter(&draft, |form, value| form.phone_number = value)}
                errors={errors.clone()}
            />
            <TextField
                name="code"
                label={i18n.t("auth.code")}
                value={draft.code.clone()}
                on_input={draft_setter(&draft, |form, value| form.code = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="new_password"
                label={i18n.t("auth.new_password")}
                input_type="password"
                value={draft.new_password.clone()}
                on_input={draft_setter(&draft, |form, value| form.new_password = value)}
                errors={errors.clone()}
                required=true
            />
            <TextField
                name="new_password_confirm"
                label={i18n.t("auth.password_confirm")}
                input_type="password"
                value={draft.new_password_confirm.clone()}
                on_input={draft_setter(&draft, |form, value| form.new_password_confirm = value)}
                {errors}
                required=true
            />
            {submit_button(props.state.submitting, i18n.t("auth.reset_password"), i18n.t("auth.resetting"))}
        </form>
    }
}
