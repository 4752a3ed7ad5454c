use i18nrs::yew::use_translation;
use yew::prelude::*;
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub message: AttrValue,
    /// Optional call to action below the message.
    #[prop_or_default]
    pub children: Html,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class="flex flex-col items-center gap-3 py-10 text-center text-base-content/70">
            <Icon icon_id={IconId::HeroiconsOutlineInboxStack} class="h-10 w-10" />
            <p>{props.message.clone()}</p>
            {props.children.clone()}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FailedStateProps {
    pub message: AttrValue,
    pub on_retry: Callback<()>,
}

/// A view whose data failed to load. The rest of the page stays usable.
#[function_component(FailedState)]
pub fn failed_state(props: &FailedStateProps) -> Html {
    let (i18n, ..) = use_translation();
    let onclick = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |_: yew::MouseEvent| on_retry.emit(()))
    };

    html! {
        <div role="alert" class="alert alert-error my-4">
            <Icon icon_id={IconId::HeroiconsOutlineExclamationTriangle} class="h-6 w-6" />
            <span>{props.message.clone()}</span>
            <button class="btn btn-sm" {onclick}>{i18n.t("common.retry")}</button>
        </div>
    }
}
