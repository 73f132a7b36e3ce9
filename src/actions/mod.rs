use crate::api::{ApiReply, ApiRequest, Endpoint, FollowDirection, Transport};
use crate::messages;
use crate::models::{
    Comment, CommentRequest, CommentResponse, FormPayload, LikeResponse, LoginResponse,
    SuggestRequest, SuggestionResponse,
};
use crate::state::Session;

/// A network-backed user action.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Register(FormPayload),
    Login(FormPayload),
    CreatePost(FormPayload),
    CreateRepository(FormPayload),
    Follow { user_id: String, following: bool },
    Like { post_id: String },
    Comment { post_id: String, content: String },
    Suggest { code: String, language: String },
}

/// Why an action was stopped before any request went out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Precondition {
    LoginRequired(&'static str),
    Invalid(&'static str),
}

impl Precondition {
    pub fn message(&self) -> &'static str {
        match self {
            Precondition::LoginRequired(m) | Precondition::Invalid(m) => m,
        }
    }
}

/// What the page should do in response to an action.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Effect {
    StoreToken(String),
    Notify(String),
    Navigate(&'static str),
    Reload,
    SetLikeCount {
        post_id: String,
        liked: bool,
        server_count: Option<u64>,
    },
    AppendComment {
        post_id: String,
        comment: Comment,
    },
    ShowSuggestion(String),
}

impl Action {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Action::Register(_) => Endpoint::Register,
            Action::Login(_) => Endpoint::Login,
            Action::CreatePost(_) => Endpoint::Post,
            Action::CreateRepository(_) => Endpoint::CreateRepository,
            Action::Follow { user_id, following } => {
                let direction = if *following {
                    FollowDirection::Unfollow
                } else {
                    FollowDirection::Follow
                };
                Endpoint::Follow(direction, user_id.clone())
            }
            Action::Like { post_id } => Endpoint::Like(post_id.clone()),
            Action::Comment { post_id, .. } => Endpoint::Comment(post_id.clone()),
            Action::Suggest { .. } => Endpoint::SuggestCode,
        }
    }

    /// Login-required message for actions that need a session, `None` for anonymous ones.
    fn login_required(&self) -> Option<&'static str> {
        match self {
            Action::Register(_) | Action::Login(_) => None,
            Action::CreatePost(_) => Some(messages::POST_LOGIN_REQUIRED),
            Action::CreateRepository(_) => Some(messages::REPO_LOGIN_REQUIRED),
            Action::Follow { .. } => Some(messages::FOLLOW_LOGIN_REQUIRED),
            Action::Like { .. } => Some(messages::LIKE_LOGIN_REQUIRED),
            Action::Comment { .. } => Some(messages::COMMENT_LOGIN_REQUIRED),
            Action::Suggest { .. } => Some(messages::SUGGEST_LOGIN_REQUIRED),
        }
    }

    /// Shown when the request could not complete or the reply was unusable.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Register(_) => messages::REGISTER_FAILED,
            Action::Login(_) => messages::LOGIN_FAILED,
            Action::CreatePost(_) => messages::POST_FAILED,
            Action::CreateRepository(_) => messages::REPO_FAILED,
            Action::Follow { .. } => messages::FOLLOW_FAILED,
            Action::Like { .. } => messages::LIKE_FAILED,
            Action::Comment { .. } => messages::COMMENT_FAILED,
            Action::Suggest { .. } => messages::SUGGEST_UNREACHABLE,
        }
    }

    fn rejection_fallback(&self) -> &'static str {
        match self {
            Action::Suggest { .. } => messages::SUGGEST_FAILED,
            other => other.failure_message(),
        }
    }

    fn validate(&self) -> Result<(), Precondition> {
        match self {
            Action::Comment { content, .. } if content.trim().is_empty() => {
                Err(Precondition::Invalid(messages::COMMENT_EMPTY))
            }
            Action::Suggest { code, .. } if code.trim().is_empty() => {
                Err(Precondition::Invalid(messages::SUGGEST_EMPTY))
            }
            _ => Ok(()),
        }
    }

    fn body(&self) -> Option<serde_json::Value> {
        let value = match self {
            Action::Register(form)
            | Action::Login(form)
            | Action::CreatePost(form)
            | Action::CreateRepository(form) => serde_json::to_value(form),
            Action::Follow { .. } | Action::Like { .. } => return None,
            Action::Comment { content, .. } => serde_json::to_value(CommentRequest {
                content: content.clone(),
            }),
            Action::Suggest { code, language } => serde_json::to_value(SuggestRequest {
                code: code.clone(),
                language: language.clone(),
            }),
        };
        value.ok()
    }

    /// Check preconditions and build the request. Nothing is sent from here.
    pub fn prepare(&self, session: &Session) -> Result<ApiRequest, Precondition> {
        let bearer = match self.login_required() {
            Some(message) => Some(session.token().ok_or(Precondition::LoginRequired(message))?),
            None => None,
        };
        self.validate()?;

        Ok(ApiRequest {
            endpoint: self.endpoint(),
            bearer,
            body: self.body(),
        })
    }

    /// Map a completed exchange to page effects.
    pub fn resolve(&self, reply: &ApiReply) -> Vec<Effect> {
        if !reply.is_success() {
            let message = reply
                .message()
                .unwrap_or_else(|| self.rejection_fallback().to_string());
            return vec![Effect::Notify(message)];
        }

        match self.resolve_success(reply) {
            Ok(effects) => effects,
            Err(e) => {
                leptos::logging::error!("unexpected reply from {}: {}", self.endpoint().path(), e);
                vec![Effect::Notify(self.failure_message().to_string())]
            }
        }
    }

    fn resolve_success(&self, reply: &ApiReply) -> Result<Vec<Effect>, serde_json::Error> {
        let body = reply.body.clone();
        Ok(match self {
            Action::Register(_) => vec![
                Effect::Notify(messages::REGISTER_OK.to_string()),
                Effect::Navigate("/login"),
            ],
            Action::Login(_) => {
                let login: LoginResponse = serde_json::from_value(body)?;
                vec![
                    Effect::StoreToken(login.access_token),
                    Effect::Notify(messages::LOGIN_OK.to_string()),
                    Effect::Navigate("/feed"),
                ]
            }
            Action::CreatePost(_) => vec![
                Effect::Notify(messages::POST_OK.to_string()),
                Effect::Reload,
            ],
            Action::CreateRepository(_) => vec![
                Effect::Notify(messages::REPO_OK.to_string()),
                Effect::Navigate("/repositories"),
            ],
            Action::Follow { .. } => vec![Effect::Reload],
            Action::Like { post_id } => {
                let like: LikeResponse = serde_json::from_value(body)?;
                vec![Effect::SetLikeCount {
                    post_id: post_id.clone(),
                    liked: like.liked,
                    server_count: like.like_count,
                }]
            }
            Action::Comment { post_id, .. } => {
                let created: CommentResponse = serde_json::from_value(body)?;
                vec![Effect::AppendComment {
                    post_id: post_id.clone(),
                    comment: created.comment,
                }]
            }
            Action::Suggest { .. } => {
                let suggestion: SuggestionResponse = serde_json::from_value(body)?;
                vec![Effect::ShowSuggestion(suggestion.suggestion)]
            }
        })
    }
}

/// Send an already prepared request and resolve the reply.
pub(crate) async fn execute<T: Transport>(
    transport: &T,
    action: &Action,
    request: ApiRequest,
) -> Vec<Effect> {
    match transport.send(request).await {
        Ok(reply) => action.resolve(&reply),
        Err(e) => {
            leptos::logging::error!("{} failed ({:?}): {}", action.endpoint().path(), e.kind, e);
            vec![Effect::Notify(action.failure_message().to_string())]
        }
    }
}

/// Prepare, send and resolve. Precondition failures produce a notification and
/// no request.
pub(crate) async fn perform<T: Transport>(
    transport: &T,
    session: &Session,
    action: &Action,
) -> Vec<Effect> {
    match action.prepare(session) {
        Ok(request) => execute(transport, action, request).await,
        Err(pre) => vec![Effect::Notify(pre.message().to_string())],
    }
}
