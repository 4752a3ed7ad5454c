use crate::routes::Route;
use i18nrs::yew::use_translation;
use yew::{Html, function_component, html};
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;

/// Guest home page.
#[function_component(LandingPage)]
pub fn landing_page() -> Html {
    let (i18n, ..) = use_translation();

    let features = [
        (IconId::HeroiconsOutlineBanknotes, "landing.loans_title", "landing.loans_body"),
        (IconId::HeroiconsOutlineChartBar, "landing.credit_title", "landing.credit_body"),
        (IconId::HeroiconsOutlineDevicePhoneMobile, "landing.mpesa_title", "landing.mpesa_body"),
    ];

    html! {
        <div class="space-y-12">
            <section class="hero bg-base-200 rounded-box py-16">
                <div class="hero-content text-center">
                    <div class="max-w-xl">
                        <h1 class="text-4xl font-bold">{i18n.t("landing.headline")}</h1>
                        <p class="py-6">{i18n.t("landing.subtitle")}</p>
                        <div class="flex justify-center gap-3">
                            <Link<Route> to={Route::Register} classes="btn btn-primary">
                                {i18n.t("landing.get_started")}
                            </Link<Route>>
                            <Link<Route> to={Route::About} classes="btn btn-ghost">
                                {i18n.t("landing.learn_more")}
                            </Link<Route>>
                        </div>
                    </div>
                </div>
            </section>
            <section class="grid gap-6 md:grid-cols-3">
                { for features.into_iter().map(|(icon, title, body)| html! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body items-center text-center">
                            <Icon icon_id={icon} class="h-10 w-10 text-primary" />
                            <h2 class="card-title">{i18n.t(title)}</h2>
                            <p>{i18n.t(body)}</p>
                        </div>
                    </div>
                }) }
            </section>
        </div>
    }
}
