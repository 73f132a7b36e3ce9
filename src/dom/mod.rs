use crate::actions::Effect;
use crate::models::{Comment, FormPayload};
use crate::state::AppState;
use crate::util::{like_label, next_like_count};
use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Clone, Debug)]
pub(crate) enum DomError {
    Missing(String),
    NoCount(String),
    Js(String),
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::Missing(what) => write!(f, "element not found: {}", what),
            DomError::NoCount(text) => write!(f, "no count in {:?}", text),
            DomError::Js(e) => write!(f, "{}", e),
        }
    }
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub(crate) type DomResult<T> = Result<T, DomError>;

pub(crate) fn by_id(id: &str) -> DomResult<web_sys::Element> {
    document()
        .get_element_by_id(id)
        .ok_or_else(|| DomError::Missing(format!("#{}", id)))
}

/// All elements matching `selector`, in document order.
pub(crate) fn select_all(selector: &str) -> Vec<web_sys::Element> {
    let Ok(list) = document().query_selector_all(selector) else {
        return vec![];
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
        .collect()
}

/// Value of an `<input>`, `<textarea>` or `<select>`.
pub(crate) fn field_value(el: &web_sys::Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    el.dyn_ref::<web_sys::HtmlSelectElement>().map(|s| s.value())
}

pub(crate) fn set_field_value(el: &web_sys::Element, value: &str) {
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

pub(crate) fn field_value_by_id(id: &str) -> Option<String> {
    by_id(id).ok().and_then(|el| field_value(&el))
}

/// Flat name → value map of a form's string entries.
pub(crate) fn form_payload(form: &web_sys::HtmlFormElement) -> DomResult<FormPayload> {
    let data = web_sys::FormData::new_with_form(form)?;
    let entries = js_sys::try_iter(&data)?.ok_or_else(|| DomError::Js("FormData is not iterable".into()))?;

    let mut pairs = Vec::new();
    for entry in entries {
        let entry: js_sys::Array = entry?.unchecked_into();
        let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) else {
            // File inputs yield Blobs.
            continue;
        };
        pairs.push((name, value));
    }

    Ok(FormPayload::from_pairs(pairs))
}

pub(crate) fn data_attr(el: &web_sys::Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{}", name))
        .filter(|v| !v.trim().is_empty())
}

pub(crate) fn set_display(el: &web_sys::Element, value: &str) -> DomResult<()> {
    if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
        html.style().set_property("display", value)?;
    }
    Ok(())
}

/// Flip between `display: none` and `display: block`.
pub(crate) fn toggle_display(el: &web_sys::Element) -> DomResult<()> {
    let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() else {
        return Ok(());
    };
    let hidden = html.style().get_property_value("display")? == "none";
    set_display(el, if hidden { "block" } else { "none" })
}

pub(crate) fn notify(message: &str) {
    if window().alert_with_message(message).is_err() {
        leptos::logging::warn!("alert unavailable: {}", message);
    }
}

pub(crate) fn navigate(path: &str) {
    if let Err(e) = window().location().set_href(path) {
        leptos::logging::error!("navigation to {} failed: {:?}", path, e);
    }
}

pub(crate) fn reload() {
    if let Err(e) = window().location().reload() {
        leptos::logging::error!("reload failed: {:?}", e);
    }
}

fn like_button(post_id: &str) -> DomResult<web_sys::Element> {
    select_all(".like-btn")
        .into_iter()
        .find(|el| data_attr(el, "post-id").as_deref() == Some(post_id))
        .ok_or_else(|| DomError::Missing(format!(".like-btn[data-post-id={}]", post_id)))
}

/// Rewrite the like counter of `post_id`. The `.like-count` child is used when
/// present, otherwise the button itself.
pub(crate) fn update_like_count(post_id: &str, liked: bool, server_count: Option<u64>) -> DomResult<u64> {
    let button = like_button(post_id)?;
    let target = button.query_selector(".like-count")?.unwrap_or(button);
    let current = target.text_content().unwrap_or_default();
    let next = next_like_count(&current, liked, server_count).ok_or(DomError::NoCount(current))?;
    target.set_text_content(Some(&like_label(next)));
    Ok(next)
}

/// `<div class="comment"><strong><a href="/user/{id}">{username}</a>:</strong> {content}</div>`,
/// built from text nodes.
pub(crate) fn comment_node(comment: &Comment) -> DomResult<web_sys::Element> {
    let doc = document();
    let node = doc.create_element("div")?;
    node.set_class_name("comment");

    let strong = doc.create_element("strong")?;
    match &comment.user_id {
        Some(user_id) => {
            let link = doc.create_element("a")?;
            link.set_attribute("href", &format!("/user/{}", urlencoding::encode(user_id)))?;
            link.set_text_content(Some(&comment.username));
            strong.append_child(&link)?;
        }
        None => {
            strong.append_child(&doc.create_text_node(&comment.username))?;
        }
    }
    strong.append_child(&doc.create_text_node(":"))?;

    node.append_child(&strong)?;
    node.append_child(&doc.create_text_node(&format!(" {}", comment.content)))?;
    Ok(node)
}

pub(crate) fn append_comment(post_id: &str, comment: &Comment) -> DomResult<()> {
    let list = by_id(&format!("comments-{}", post_id))?;
    let node = comment_node(comment)?;
    list.append_child(&node)?;

    if let Ok(input) = by_id(&format!("comment-text-{}", post_id)) {
        set_field_value(&input, "");
    }
    Ok(())
}

/// Clear and hide the comment form of `post_id`.
pub(crate) fn cancel_comment(post_id: &str) -> DomResult<()> {
    let form = by_id(&format!("comment-form-{}", post_id))?;
    if let Some(area) = form.query_selector("textarea")? {
        set_field_value(&area, "");
    }
    set_display(&form, "none")
}

/// Apply effects in order. Stops at the first DOM failure and reports it.
pub(crate) fn apply_effects(state: &AppState, effects: Vec<Effect>) -> DomResult<()> {
    for effect in effects {
        match effect {
            Effect::StoreToken(token) => state.session.sign_in(&token),
            Effect::Notify(message) => notify(&message),
            Effect::Navigate(path) => navigate(path),
            Effect::Reload => reload(),
            Effect::SetLikeCount {
                post_id,
                liked,
                server_count,
            } => {
                update_like_count(&post_id, liked, server_count)?;
            }
            Effect::AppendComment { post_id, comment } => append_comment(&post_id, &comment)?,
            Effect::ShowSuggestion(suggestion) => {
                state.suggestion.update(|s| s.finish(Some(suggestion)));
            }
        }
    }
    Ok(())
}
