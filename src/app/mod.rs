use crate::bindings::bind_all;
use crate::dom::navigate;
use crate::state::{AppState, Session};
use crate::suggest::SuggestionModal;
use crate::util::{should_redirect_to_login, strip_token_from_query, token_from_query};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// OAuth callbacks land on `/feed?token=<jwt>`. Keep the token and drop it
/// from the address bar.
pub(crate) fn capture_callback_token(session: &Session) {
    let location = window().location();
    let search = location.search().unwrap_or_default();
    let Some(token) = token_from_query(&search) else {
        return;
    };

    session.sign_in(&token);

    let path = location.pathname().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    let clean = format!("{}{}{}", path, strip_token_from_query(&search), hash);
    if let Ok(history) = window().history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&clean));
    }
}

/// Send anonymous visitors of authenticated pages to `/login`. Returns whether
/// a redirect was issued.
pub(crate) fn enforce_route_guard(session: &Session) -> bool {
    let path = window().location().pathname().unwrap_or_default();
    if should_redirect_to_login(&path, session.is_authenticated()) {
        navigate("/login");
        return true;
    }
    false
}

fn highlight_code() {
    let Some(prism) = window().get("Prism") else {
        return;
    };
    let Ok(highlight_all) = js_sys::Reflect::get(&prism, &"highlightAll".into()) else {
        return;
    };
    if let Some(f) = highlight_all.dyn_ref::<js_sys::Function>() {
        if let Err(e) = f.call0(&prism) {
            leptos::logging::warn!("Prism.highlightAll failed: {:?}", e);
        }
    }
}

/// Bind handlers, mount the suggestion modal host and highlight code.
pub(crate) fn on_ready(state: AppState) {
    bind_all(&state);

    let suggestion = state.suggestion;
    mount_to_body(move || view! { <SuggestionModal state=suggestion /> });

    highlight_code();
}

/// Run `f` once the document is parsed.
pub(crate) fn when_ready(f: impl FnOnce() + 'static) {
    let document = document();
    if document.ready_state() != "loading" {
        f();
        return;
    }

    let cb = Closure::once_into_js(f);
    if let Err(e) = document.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref()) {
        leptos::logging::error!("could not wait for DOMContentLoaded: {:?}", e);
    }
}

pub(crate) fn start() {
    let state = AppState::new();

    capture_callback_token(&state.session);
    if enforce_route_guard(&state.session) {
        return;
    }

    when_ready(move || on_ready(state));
}
