//! Labelled form inputs with their inline validation message.

use shared::FieldErrors;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FieldErrorProps {
    pub errors: FieldErrors,
    pub field: AttrValue,
}

/// First error reported for `field`, if any.
#[function_component(FieldError)]
pub fn field_error(props: &FieldErrorProps) -> Html {
    match props.errors.first(&props.field) {
        Some(message) => html! {
            <span class="label-text-alt text-error mt-1">{message.to_string()}</span>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    /// Input id and the field's key in `errors`.
    pub name: AttrValue,
    pub label: AttrValue,
    pub value: AttrValue,
    pub on_input: Callback<String>,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    #[prop_or_default]
    pub errors: FieldErrors,
    #[prop_or_default]
    pub required: bool,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                on_input.emit(input.value());
            }
        })
    };
    let invalid = props.errors.contains(&props.name);

    html! {
        <div class="form-control w-full">
            <label class="label" for={props.name.clone()}>
                <span class="label-text">{props.label.clone()}</span>
            </label>
            <input
                id={props.name.clone()}
                name={props.name.clone()}
                class={classes!("input", "input-bordered", "w-full", invalid.then_some("input-error"))}
                type={props.input_type.clone()}
                placeholder={props.placeholder.clone()}
                required={props.required}
                disabled={props.disabled}
                value={props.value.clone()}
                {oninput}
            />
            <FieldError errors={props.errors.clone()} field={props.name.clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectFieldProps {
    pub name: AttrValue,
    pub label: AttrValue,
    pub value: AttrValue,
    /// `(value, label)` pairs.
    pub options: Vec<(AttrValue, AttrValue)>,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    #[prop_or_default]
    pub errors: FieldErrors,
}

#[function_component(SelectField)]
pub fn select_field(props: &SelectFieldProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                on_change.emit(select.value());
            }
        })
    };
    let invalid = props.errors.contains(&props.name);

    html! {
        <div class="form-control w-full">
            <label class="label" for={props.name.clone()}>
                <span class="label-text">{props.label.clone()}</span>
            </label>
            <select
                id={props.name.clone()}
                class={classes!("select", "select-bordered", "w-full", invalid.then_some("select-error"))}
                {onchange}
            >
                if let Some(placeholder) = &props.placeholder {
                    <option value="" selected={props.value.is_empty()}>{placeholder.clone()}</option>
                }
                { for props.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()} selected={*value == props.value}>{label.clone()}</option>
                }) }
            </select>
            <FieldError errors={props.errors.clone()} field={props.name.clone()} />
        </div>
    }
}
