use yew::prelude::*;

/// A callback writing one field of a form draft held in `use_state`.
pub fn draft_setter<F>(draft: &UseStateHandle<F>, apply: fn(&mut F, String)) -> Callback<String>
where
    F: Clone + 'static,
{
    let draft = draft.clone();
    Callback::from(move |value: String| {
        let mut next = (*draft).clone();
        apply(&mut next, value);
        draft.set(next);
    })
}
