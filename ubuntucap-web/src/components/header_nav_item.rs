use crate::routes::Route;
use i18nrs::yew::use_translation;
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq, Eq)]
pub struct HeaderNavItemProps {
    pub route: Route,
    pub current_route: Option<Route>,
}

#[function_component(HeaderNavItem)]
pub fn header_nav_item(props: &HeaderNavItemProps) -> Html {
    let (i18n, ..) = use_translation();

    let active = props
        .current_route
        .as_ref()
        .is_some_and(|current| current.section() == props.route);
    let active_route_class = if active { "btn-soft" } else { "" };

    html! {
      <li>
          <Link<Route> to={props.route.clone()} classes={classes!("btn", "btn-ghost", "gap-2", active_route_class)}>
              {i18n.t(props.route.title_key())}
          </Link<Route>>
      </li>
    }
}
