use crate::actions::{execute, Action};
use crate::api::Transport;
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::dom::{apply_effects, by_id, field_value_by_id, notify, set_field_value};
use crate::messages;
use crate::state::{AppState, SuggestState};
use icons::{Check, X};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;

pub(crate) const SNIPPET_ID: &str = "code_snippet";
pub(crate) const LANGUAGE_ID: &str = "code_language";
pub(crate) const TRIGGER_ID: &str = "ai-suggest-btn";
const DEFAULT_LANGUAGE: &str = "python";

/// A control that can be put into a busy state.
pub(crate) trait BusyControl {
    fn label(&self) -> String;
    fn set_label(&self, label: &str);
    fn set_disabled(&self, disabled: bool);
}

impl BusyControl for web_sys::HtmlButtonElement {
    fn label(&self) -> String {
        self.inner_html()
    }

    fn set_label(&self, label: &str) {
        self.set_inner_html(label);
    }

    fn set_disabled(&self, disabled: bool) {
        web_sys::HtmlButtonElement::set_disabled(self, disabled);
    }
}

/// Holds a control busy (disabled, working label) until dropped; dropping
/// restores the original label and re-enables it.
pub(crate) struct BusyGuard<C: BusyControl> {
    control: C,
    original_label: String,
}

impl<C: BusyControl> BusyGuard<C> {
    pub fn acquire(control: C, working_label: &str) -> Self {
        let original_label = control.label();
        control.set_label(working_label);
        control.set_disabled(true);
        Self {
            control,
            original_label,
        }
    }
}

impl<C: BusyControl> Drop for BusyGuard<C> {
    fn drop(&mut self) {
        self.control.set_label(&self.original_label);
        self.control.set_disabled(false);
    }
}

fn working_label() -> String {
    format!(
        r#"<i class="fas fa-spinner fa-spin"></i> {}"#,
        messages::SUGGEST_WORKING
    )
}

fn read_language() -> String {
    field_value_by_id(LANGUAGE_ID)
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Ask the backend for a suggestion on the current snippet and open the modal
/// with the answer.
pub(crate) fn request_suggestion(state: AppState) {
    let client = state.api_client.clone();
    request_suggestion_via(state, client);
}

fn request_suggestion_via<T: Transport + 'static>(state: AppState, transport: T) {
    if state.suggestion.with_untracked(SuggestState::is_requesting) {
        return;
    }

    let action = Action::Suggest {
        code: field_value_by_id(SNIPPET_ID).unwrap_or_default(),
        language: read_language(),
    };

    let request = match action.prepare(&state.session) {
        Ok(request) => request,
        Err(pre) => {
            notify(pre.message());
            return;
        }
    };

    let trigger = by_id(TRIGGER_ID)
        .ok()
        .and_then(|el| wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlButtonElement>(el).ok());

    state.suggestion.update(|s| {
        s.begin();
    });
    let busy = trigger.map(|t| BusyGuard::acquire(t, &working_label()));

    spawn_local(async move {
        let _busy = busy;

        let effects = execute(&transport, &action, request).await;
        if let Err(e) = apply_effects(&state, effects) {
            leptos::logging::error!("suggestion display failed: {}", e);
        }

        // Anything but a shown suggestion ends back in Idle.
        state.suggestion.update(|s| s.finish(None));
    });
}

/// Copy the modal's text into the snippet field and close the modal.
pub(crate) fn apply_suggestion(state: RwSignal<SuggestState>) {
    let mut taken = None;
    state.update(|s| taken = s.close());
    let Some(text) = taken else {
        return;
    };

    match by_id(SNIPPET_ID) {
        Ok(field) => set_field_value(&field, &text),
        Err(e) => leptos::logging::warn!("cannot apply suggestion: {}", e),
    }
}

pub(crate) fn close_suggestion(state: RwSignal<SuggestState>) {
    state.update(|s| {
        s.close();
    });
}

/// Overlay showing the current suggestion. Renders nothing unless the state is
/// `Showing`, so at most one modal exists.
#[component]
pub fn SuggestionModal(state: RwSignal<SuggestState>) -> impl IntoView {
    let _escape = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && state.with_untracked(|s| s.suggestion().is_some()) {
            close_suggestion(state);
        }
    });

    move || {
        state.get().suggestion().map(|text| {
            let text = text.to_string();
            view! {
                <div class="ai-suggestion-modal">
                    <div class="modal-content">
                        <div class="modal-header">
                            <h3>{messages::SUGGEST_TITLE}</h3>
                            <Button
                                class="close-modal"
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                attr:aria-label=messages::SUGGEST_CLOSE
                                on:click=move |_| close_suggestion(state)
                            >
                                <X />
                            </Button>
                        </div>
                        <div class="modal-body">
                            <pre class="suggestion-text">{text}</pre>
                        </div>
                        <div class="modal-footer">
                            <Button
                                class="btn-secondary close-modal"
                                variant=ButtonVariant::Secondary
                                on:click=move |_| close_suggestion(state)
                            >
                                {messages::SUGGEST_CLOSE}
                            </Button>
                            <Button
                                class="btn-primary apply-suggestion"
                                on:click=move |_| apply_suggestion(state)
                            >
                                <Check />
                                {messages::SUGGEST_APPLY}
                            </Button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::api::{ApiClient, ApiReply, ApiRequest, ApiResult, EnvConfig};
    use crate::dom::field_value;
    use crate::dom::test_support::{alerts, record_alerts, sleep};
    use crate::state::Session;
    use crate::storage::MemoryTokenStore;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    struct CannedTransport(ApiReply);

    impl Transport for CannedTransport {
        async fn send(&self, _request: ApiRequest) -> ApiResult<ApiReply> {
            sleep(20).await;
            Ok(self.0.clone())
        }
    }

    fn app_state(token: Option<&str>) -> AppState {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::default(),
        };
        AppState {
            session: Session::new(Rc::new(store)),
            api_client: ApiClient::new(&EnvConfig::with_base("http://localhost:5000")),
            suggestion: RwSignal::new(SuggestState::Idle),
        }
    }

    fn mount_editor() -> (web_sys::Element, web_sys::HtmlButtonElement) {
        let host = document().create_element("div").unwrap();
        host.set_inner_html(
            r#"<textarea id="code_snippet">x=1</textarea><button id="ai-suggest-btn">Sugestão IA</button>"#,
        );
        document().body().unwrap().append_child(&host).unwrap();
        let trigger = by_id(TRIGGER_ID).unwrap().unchecked_into();
        (host, trigger)
    }

    #[wasm_bindgen_test]
    fn test_apply_suggestion_fills_snippet_and_closes() {
        let host = document().create_element("div").unwrap();
        host.set_inner_html(r#"<textarea id="code_snippet">x=1</textarea>"#);
        document().body().unwrap().append_child(&host).unwrap();

        let state = RwSignal::new(SuggestState::Showing {
            suggestion: "x = 1  # tidy".into(),
        });
        apply_suggestion(state);

        let field = by_id(SNIPPET_ID).unwrap();
        assert_eq!(field_value(&field).as_deref(), Some("x = 1  # tidy"));
        assert_eq!(state.get_untracked(), SuggestState::Idle);
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn test_suggestion_success_shows_modal_and_frees_trigger() {
        let (host, trigger) = mount_editor();
        let state = app_state(Some("jwt"));
        let reply = ApiReply {
            status: 200,
            body: serde_json::json!({"suggestion": "x = 1"}),
        };

        request_suggestion_via(state.clone(), CannedTransport(reply));
        assert!(trigger.disabled());
        assert!(trigger.inner_html().contains(messages::SUGGEST_WORKING));
        assert!(state.suggestion.get_untracked().is_requesting());

        sleep(100).await;
        assert!(!trigger.disabled());
        assert_eq!(trigger.inner_html(), "Sugestão IA");
        assert_eq!(state.suggestion.get_untracked().suggestion(), Some("x = 1"));
        host.remove();
    }

    #[wasm_bindgen_test]
    async fn test_suggestion_failure_returns_to_idle_and_frees_trigger() {
        record_alerts();
        let (host, trigger) = mount_editor();
        let state = app_state(Some("jwt"));
        let reply = ApiReply {
            status: 500,
            body: serde_json::json!({"error": "AI suggestion failed"}),
        };

        request_suggestion_via(state.clone(), CannedTransport(reply));
        assert!(trigger.disabled());

        sleep(100).await;
        assert!(!trigger.disabled());
        assert_eq!(trigger.inner_html(), "Sugestão IA");
        assert_eq!(state.suggestion.get_untracked(), SuggestState::Idle);
        assert_eq!(alerts(), vec!["AI suggestion failed".to_string()]);
        host.remove();
    }

    #[wasm_bindgen_test]
    fn test_suggestion_without_login_leaves_trigger_alone() {
        record_alerts();
        let (host, trigger) = mount_editor();
        let state = app_state(None);

        request_suggestion(state.clone());

        assert!(!trigger.disabled());
        assert_eq!(state.suggestion.get_untracked(), SuggestState::Idle);
        assert_eq!(alerts(), vec![messages::SUGGEST_LOGIN_REQUIRED.to_string()]);
        host.remove();
    }
}
