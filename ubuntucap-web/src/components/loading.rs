use i18nrs::yew::use_translation;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    /// Replaces the generic "Loading" text.
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    let (i18n, ..) = use_translation();
    let label = props
        .label
        .as_ref()
        .map_or_else(|| i18n.t("common.loading"), ToString::to_string);

    html! {
        <div class="flex flex-col items-center justify-center py-12 animate-fadeIn" role="status">
            <span class="loading loading-spinner loading-lg text-primary"></span>
            <span class="mt-3 text-base-content/70">{label}</span>
        </div>
    }
}
