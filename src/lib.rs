mod actions;
mod api;
mod app;
mod bindings;
mod clipboard;
mod components;
mod dom;
mod messages;
mod models;
mod state;
mod storage;
mod suggest;
mod util;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    app::start();
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::app::enforce_route_guard;
    use crate::state::Session;
    use crate::storage::{LocalTokenStore, TokenStore, TOKEN_KEY};
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn local_store() -> LocalTokenStore {
        LocalTokenStore::open().expect("localStorage should exist in the test browser")
    }

    #[wasm_bindgen_test]
    fn test_local_token_store_roundtrip() {
        let store = local_store();
        store.clear();
        assert!(store.get().is_none());

        store.set("t1");
        assert_eq!(store.get().as_deref(), Some("t1"));

        let raw = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());
        assert_eq!(raw.as_deref(), Some("t1"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[wasm_bindgen_test]
    fn test_session_reads_token_written_by_login() {
        let store = Rc::new(local_store());
        store.clear();
        let session = Session::new(store.clone());
        assert!(!session.is_authenticated());

        session.sign_in("jwt");
        let reloaded = Session::new(Rc::new(local_store()));
        assert_eq!(reloaded.token().as_deref(), Some("jwt"));
        store.clear();
    }

    #[wasm_bindgen_test]
    fn test_route_guard_ignores_unprotected_test_page() {
        // The test runner page is never a protected path.
        let session = Session::new(Rc::new(crate::storage::MemoryTokenStore::default()));
        assert!(!enforce_route_guard(&session));
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::{perform, Action, Effect};
    use crate::api::{ApiReply, ApiRequest, ApiResult, Transport};
    use crate::messages;
    use crate::models::FormPayload;
    use crate::state::{Session, SuggestState};
    use crate::storage::MemoryTokenStore;
    use crate::util::should_redirect_to_login;
    use pollster::FutureExt as _;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingTransport {
        calls: Cell<usize>,
        reply: serde_json::Value,
    }

    impl Transport for CountingTransport {
        async fn send(&self, _request: ApiRequest) -> ApiResult<ApiReply> {
            self.calls.set(self.calls.get() + 1);
            Ok(ApiReply {
                status: 200,
                body: self.reply.clone(),
            })
        }
    }

    #[test]
    fn test_login_then_authenticated_action_uses_stored_token() {
        let session = Session::new(Rc::new(MemoryTokenStore::default()));
        let transport = CountingTransport {
            calls: Cell::new(0),
            reply: serde_json::json!({"access_token": "jwt-9", "liked": true}),
        };

        // Before login: nothing is sent.
        let like = Action::Like { post_id: "1".into() };
        let effects = perform(&transport, &session, &like).block_on();
        assert_eq!(transport.calls.get(), 0);
        assert_eq!(effects, vec![Effect::Notify(messages::LIKE_LOGIN_REQUIRED.into())]);

        let login = Action::Login(FormPayload::from_pairs([("username", "bob"), ("password", "pw")]));
        for effect in perform(&transport, &session, &login).block_on() {
            if let Effect::StoreToken(token) = effect {
                session.sign_in(&token);
            }
        }
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(session.token().as_deref(), Some("jwt-9"));

        let request = like.prepare(&session).expect("now authenticated");
        assert_eq!(request.auth_header().as_deref(), Some("Bearer jwt-9"));
    }

    #[test]
    fn test_route_guard_follows_session() {
        let session = Session::new(Rc::new(MemoryTokenStore::default()));
        assert!(should_redirect_to_login("/feed", session.is_authenticated()));
        session.sign_in("jwt");
        assert!(!should_redirect_to_login("/feed", session.is_authenticated()));
    }

    #[test]
    fn test_suggest_state_default_is_idle() {
        assert_eq!(SuggestState::default(), SuggestState::Idle);
    }
}
