use i18nrs::yew::use_translation;
use yew::{Html, function_component, html};

#[function_component(AboutPage)]
pub fn about_page() -> Html {
    let (i18n, ..) = use_translation();

    html! {
        <article class="prose max-w-3xl mx-auto space-y-4">
            <h1>{i18n.t("about.title")}</h1>
            <p>{i18n.t("about.intro")}</p>
            <h2>{i18n.t("about.how_title")}</h2>
            <ol>
                <li>{i18n.t("about.step_register")}</li>
                <li>{i18n.t("about.step_score")}</li>
                <li>{i18n.t("about.step_borrow")}</li>
                <li>{i18n.t("about.step_repay")}</li>
            </ol>
        </article>
    }
}
