use crate::actions::{perform, Action};
use crate::clipboard::{copy_code, share_post};
use crate::dom::{
    apply_effects, by_id, cancel_comment, data_attr, field_value_by_id, form_payload, navigate,
    notify, select_all, toggle_display,
};
use crate::models::FormPayload;
use crate::state::AppState;
use crate::suggest::request_suggestion;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Forms the layer takes over, by element id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormKind {
    Register,
    Login,
    Post,
    Repository,
}

impl FormKind {
    pub const ALL: [FormKind; 4] = [
        FormKind::Register,
        FormKind::Login,
        FormKind::Post,
        FormKind::Repository,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            FormKind::Register => "register-form",
            FormKind::Login => "login-form",
            FormKind::Post => "post-form",
            FormKind::Repository => "repo-form",
        }
    }

    pub fn action(self, payload: FormPayload) -> Action {
        match self {
            FormKind::Register => Action::Register(payload),
            FormKind::Login => Action::Login(payload),
            FormKind::Post => Action::CreatePost(payload),
            FormKind::Repository => Action::CreateRepository(payload),
        }
    }
}

/// Click-driven commands, one per kind of interactive control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClickKind {
    Follow,
    Like,
    ToggleComment,
    SubmitComment,
    CancelComment,
    Share,
    CopyCode,
    Suggest,
    Logout,
}

impl ClickKind {
    pub const ALL: [ClickKind; 9] = [
        ClickKind::Follow,
        ClickKind::Like,
        ClickKind::ToggleComment,
        ClickKind::SubmitComment,
        ClickKind::CancelComment,
        ClickKind::Share,
        ClickKind::CopyCode,
        ClickKind::Suggest,
        ClickKind::Logout,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            ClickKind::Follow => "#follow-btn, .follow-btn",
            ClickKind::Like => ".like-btn",
            ClickKind::ToggleComment => ".comment-btn",
            ClickKind::SubmitComment => ".comment-submit-btn",
            ClickKind::CancelComment => ".cancel-comment-btn",
            ClickKind::Share => ".share-btn",
            ClickKind::CopyCode => ".copy-btn",
            ClickKind::Suggest => "#ai-suggest-btn",
            ClickKind::Logout => "#logout-btn, .logout-btn",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Command {
    Submit(FormKind, FormPayload),
    Follow { user_id: String, following: bool },
    Like { post_id: String },
    ToggleComment { post_id: String },
    SubmitComment { post_id: String },
    CancelComment { post_id: String },
    Share { post_id: String },
    CopyCode(web_sys::Element),
    Suggest,
    Logout,
}

impl Command {
    /// Read what a click on `el` means. `None` when a required data attribute
    /// is missing.
    pub fn from_click(kind: ClickKind, el: &web_sys::Element) -> Option<Command> {
        let post_id = || data_attr(el, "post-id");
        Some(match kind {
            ClickKind::Follow => Command::Follow {
                user_id: data_attr(el, "user-id")?,
                following: el.class_list().contains("unfollow"),
            },
            ClickKind::Like => Command::Like { post_id: post_id()? },
            ClickKind::ToggleComment => Command::ToggleComment { post_id: post_id()? },
            ClickKind::SubmitComment => Command::SubmitComment { post_id: post_id()? },
            ClickKind::CancelComment => Command::CancelComment { post_id: post_id()? },
            ClickKind::Share => Command::Share { post_id: post_id()? },
            ClickKind::CopyCode => Command::CopyCode(el.clone()),
            ClickKind::Suggest => Command::Suggest,
            ClickKind::Logout => Command::Logout,
        })
    }
}

fn run_action(state: AppState, action: Action) {
    spawn_local(async move {
        let effects = perform(&state.api_client, &state.session, &action).await;
        if let Err(e) = apply_effects(&state, effects) {
            leptos::logging::error!("{}: {}", action.endpoint().path(), e);
            notify(action.failure_message());
        }
    });
}

pub(crate) fn dispatch(state: &AppState, command: Command) {
    match command {
        Command::Submit(kind, payload) => run_action(state.clone(), kind.action(payload)),
        Command::Follow { user_id, following } => {
            run_action(state.clone(), Action::Follow { user_id, following })
        }
        Command::Like { post_id } => run_action(state.clone(), Action::Like { post_id }),
        Command::ToggleComment { post_id } => {
            if let Ok(form) = by_id(&format!("comment-form-{}", post_id)) {
                if let Err(e) = toggle_display(&form) {
                    leptos::logging::warn!("comment form toggle failed: {}", e);
                }
            }
        }
        Command::SubmitComment { post_id } => {
            let content = field_value_by_id(&format!("comment-text-{}", post_id)).unwrap_or_default();
            run_action(state.clone(), Action::Comment { post_id, content });
        }
        Command::CancelComment { post_id } => {
            if let Err(e) = cancel_comment(&post_id) {
                leptos::logging::warn!("cancel comment failed: {}", e);
            }
        }
        Command::Share { post_id } => share_post(post_id),
        Command::CopyCode(button) => copy_code(button),
        Command::Suggest => request_suggestion(state.clone()),
        Command::Logout => {
            state.session.sign_out();
            navigate("/login");
        }
    }
}

fn bind_form(state: &AppState, kind: FormKind) {
    let Ok(el) = by_id(kind.element_id()) else {
        return;
    };
    let Ok(form) = el.dyn_into::<web_sys::HtmlFormElement>() else {
        leptos::logging::warn!("#{} is not a form", kind.element_id());
        return;
    };

    let state = state.clone();
    let target = form.clone();
    let on_submit = Closure::<dyn FnMut(web_sys::SubmitEvent)>::new(move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match form_payload(&target) {
            Ok(payload) => dispatch(&state, Command::Submit(kind, payload)),
            Err(e) => {
                leptos::logging::error!("#{}: {}", kind.element_id(), e);
                notify(kind.action(FormPayload::default()).failure_message());
            }
        }
    });

    if form
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .is_ok()
    {
        // Lives as long as the page.
        on_submit.forget();
    }
}

fn bind_click(state: &AppState, kind: ClickKind, el: web_sys::Element) {
    let state = state.clone();
    let target = el.clone();
    let on_click = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        match Command::from_click(kind, &target) {
            Some(command) => dispatch(&state, command),
            None => leptos::logging::warn!("{:?} control without its data attribute", kind),
        }
    });

    if el
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .is_ok()
    {
        on_click.forget();
    }
}

/// Register handlers on every form and control present in the page.
pub(crate) fn bind_all(state: &AppState) {
    for kind in FormKind::ALL {
        bind_form(state, kind);
    }

    let mut controls = 0;
    for kind in ClickKind::ALL {
        for el in select_all(kind.selector()) {
            bind_click(state, kind, el);
            controls += 1;
        }
    }

    leptos::logging::log!("bound {} controls", controls);
}
