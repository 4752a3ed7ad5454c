//! Toast notices, each dismissed after the configured delay.

use crate::context::use_app_context;
use crate::notify::{Notice, NoticeBoard, NoticeLevel, NoticeQueue};
use gloo_timers::callback::Timeout;
use i18nrs::yew::use_translation;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yewdux::prelude::use_store_value;

#[function_component(ToastStack)]
pub fn toast_stack() -> Html {
    let context = use_app_context();
    let queue = use_store_value::<NoticeQueue>();
    let timeout_ms = u32::try_from(context.config.notice_timeout_ms).unwrap_or(u32::MAX);

    html! {
        <div class="toast toast-top toast-end z-50">
            { for queue.notices.iter().map(|notice| html! {
                <ToastItem key={notice.id} notice={notice.clone()} board={context.notices.clone()} {timeout_ms} />
            }) }
        </div>
    }
}

#[derive(Properties)]
pub struct ToastItemProps {
    pub notice: Notice,
    pub board: NoticeBoard,
    pub timeout_ms: u32,
}

impl PartialEq for ToastItemProps {
    fn eq(&self, other: &Self) -> bool {
        self.notice == other.notice && self.timeout_ms == other.timeout_ms
    }
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    let (i18n, ..) = use_translation();
    {
        let board = props.board.clone();
        use_effect_with((props.notice.id, props.timeout_ms), move |&(id, timeout_ms)| {
            let timer = Timeout::new(timeout_ms, move || board.dismiss(id));
            move || drop(timer)
        });
    }

    let onclick = {
        let board = props.board.clone();
        let id = props.notice.id;
        Callback::from(move |_: yew::MouseEvent| board.dismiss(id))
    };
    let icon = match props.notice.level {
        NoticeLevel::Success => IconId::HeroiconsOutlineCheckCircle,
        NoticeLevel::Error => IconId::HeroiconsOutlineXCircle,
        NoticeLevel::Warning => IconId::HeroiconsOutlineExclamationTriangle,
        NoticeLevel::Info => IconId::HeroiconsOutlineInformationCircle,
    };

    html! {
        <div role="alert" class={classes!("alert", "shadow-lg", props.notice.level.alert_class())}>
            <Icon icon_id={icon} class="h-5 w-5" />
            <span>{props.notice.message.clone()}</span>
            <button class="btn btn-ghost btn-xs" aria-label={i18n.t("common.close")} {onclick}>
                {"✕"}
            </button>
        </div>
    }
}
