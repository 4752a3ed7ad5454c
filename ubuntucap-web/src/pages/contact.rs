use crate::context::use_app_context;
use i18nrs::yew::use_translation;
use yew::{Html, function_component, html};
use yew_icons::{Icon, IconId};

#[function_component(ContactPage)]
pub fn contact_page() -> Html {
    let (i18n, ..) = use_translation();
    let context = use_app_context();
    let email = context.config.support_email.clone();
    let phone = context.config.support_phone.clone();

    html! {
        <div class="max-w-xl mx-auto space-y-6">
            <h1 class="text-2xl font-bold">{i18n.t("contact.title")}</h1>
            <p>{i18n.t("contact.intro")}</p>
            <ul class="menu bg-base-200 rounded-box">
                <li>
                    <a href={format!("mailto:{email}")}>
                        <Icon icon_id={IconId::HeroiconsOutlineEnvelope} class="h-5 w-5" />
                        {email}
                    </a>
                </li>
                <li>
                    <a href={format!("tel:{}", phone.replace(' ', ""))}>
                        <Icon icon_id={IconId::HeroiconsOutlinePhone} class="h-5 w-5" />
                        {phone}
                    </a>
                </li>
            </ul>
            <p class="text-sm text-base-content/70">{i18n.t("contact.hours")}</p>
        </div>
    }
}
