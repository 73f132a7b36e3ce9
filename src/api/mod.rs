use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Parse,
}

/// Transport-level failure. Non-2xx replies are not errors here; they come
/// back as an [`ApiReply`] so callers can read the server's message.
#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

const FALLBACK_API_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // `window.ENV.API_URL` wins, then `window.ENV.api_url`, then the page origin.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self::with_base(&url_str);
                            }
                        }
                    }
                }
            }

            if let Ok(origin) = window.location().origin() {
                if origin != "null" && !origin.is_empty() {
                    return Self::with_base(&origin);
                }
            }
        }

        Self::with_base(FALLBACK_API_URL)
    }

    pub(crate) fn with_base(url: &str) -> Self {
        Self {
            api_url: url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FollowDirection {
    Follow,
    Unfollow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Register,
    Login,
    Post,
    CreateRepository,
    Follow(FollowDirection, String),
    Like(String),
    Comment(String),
    SuggestCode,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Register => "/register".to_string(),
            Endpoint::Login => "/login".to_string(),
            Endpoint::Post => "/post".to_string(),
            Endpoint::CreateRepository => "/repository/create".to_string(),
            Endpoint::Follow(direction, user_id) => {
                format!("/{}/{}", direction, urlencoding::encode(user_id))
            }
            Endpoint::Like(post_id) => format!("/like/{}", urlencoding::encode(post_id)),
            Endpoint::Comment(post_id) => format!("/comment/{}", urlencoding::encode(post_id)),
            Endpoint::SuggestCode => "/suggest_code".to_string(),
        }
    }
}

/// A fully prepared `POST` request. Every endpoint the layer talks to is a POST
/// with an optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiRequest {
    pub endpoint: Endpoint,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub(crate) fn auth_header(&self) -> Option<String> {
        self.bearer.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Status plus parsed JSON body of a completed exchange.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Server-provided rejection text: `message`, then `error`.
    pub fn message(&self) -> Option<String> {
        ["message", "error"].iter().find_map(|k| {
            self.body
                .get(*k)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        })
    }
}

/// Sends prepared requests. `ApiClient` is the browser implementation; tests
/// substitute a recording transport.
#[allow(async_fn_in_trait)]
pub(crate) trait Transport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiReply>;
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&EnvConfig::new())
    }

    pub(crate) fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        auth_header: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(header) = auth_header {
            req = req.header("Authorization", header);
        }
        req
    }
}

impl Transport for ApiClient {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiReply> {
        let client = reqwest::Client::new();
        let mut req = client
            .post(self.url_for(&request.endpoint))
            .header("Content-Type", "application/json");
        req = Self::with_auth_headers(req, request.auth_header());

        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status().as_u16();
        let text = res.text().await.map_err(ApiError::network)?;
        let body = serde_json::from_str(&text).map_err(ApiError::parse)?;

        Ok(ApiReply { status, body })
    }
}
