use crate::api::ApiClient;
use crate::storage::{LocalTokenStore, MemoryTokenStore, TokenStore};
use leptos::prelude::*;
use std::rc::Rc;

/// Explicit session context handed to every request-issuing function.
#[derive(Clone)]
pub(crate) struct Session {
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Rc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// `localStorage`-backed session, or an in-memory one when storage is
    /// unavailable.
    pub fn from_browser() -> Self {
        match LocalTokenStore::open() {
            Some(store) => Self::new(Rc::new(store)),
            None => {
                leptos::logging::warn!("localStorage unavailable; session will not persist");
                Self::new(Rc::new(MemoryTokenStore::default()))
            }
        }
    }

    /// Stored token, treating an empty string as anonymous.
    pub fn token(&self) -> Option<String> {
        self.store.get().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) {
        self.store.set(token);
    }

    pub fn sign_out(&self) {
        self.store.clear();
    }
}

/// AI suggestion lifecycle: `Idle → Requesting → Showing | Idle`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SuggestState {
    #[default]
    Idle,
    Requesting,
    Showing { suggestion: String },
}

impl SuggestState {
    /// Enter `Requesting`. Returns `false` if a request is already in flight.
    pub fn begin(&mut self) -> bool {
        if *self == SuggestState::Requesting {
            return false;
        }
        *self = SuggestState::Requesting;
        true
    }

    /// Leave `Requesting`; a suggestion opens the modal, anything else returns to idle.
    /// No-op outside `Requesting`.
    pub fn finish(&mut self, suggestion: Option<String>) {
        if *self != SuggestState::Requesting {
            return;
        }
        *self = match suggestion {
            Some(suggestion) => SuggestState::Showing { suggestion },
            None => SuggestState::Idle,
        };
    }

    /// Close the modal, handing back the text it held.
    pub fn close(&mut self) -> Option<String> {
        match std::mem::take(self) {
            SuggestState::Showing { suggestion } => Some(suggestion),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            SuggestState::Showing { suggestion } => Some(suggestion),
            _ => None,
        }
    }

    pub fn is_requesting(&self) -> bool {
        *self == SuggestState::Requesting
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub session: Session,
    pub api_client: ApiClient,
    pub suggestion: RwSignal<SuggestState>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Session::from_browser(),
            api_client: ApiClient::from_env(),
            suggestion: RwSignal::new(SuggestState::Idle),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
