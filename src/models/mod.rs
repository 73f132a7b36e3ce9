use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat field-name → value mapping built from a submitted form.
///
/// Serializes as a plain JSON object, which is what the backend expects for
/// register, login, post and repository creation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub(crate) struct FormPayload(pub BTreeMap<String, String>);

impl FormPayload {
    /// Later entries with the same name replace earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CommentRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SuggestRequest {
    pub code: String,
    pub language: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub access_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LikeResponse {
    pub liked: bool,
    /// Not sent by every backend version; preferred over the displayed count when present.
    #[serde(default)]
    pub like_count: Option<u64>,
}

/// A comment as returned by `POST /comment/{id}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Comment {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    pub username: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CommentResponse {
    pub comment: Comment,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SuggestionResponse {
    pub suggestion: String,
}

// User ids come back as integers from the Flask backend but as strings from
// fixtures and older deployments.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
