use crate::messages::LIKE_LABEL;

const PROTECTED_PATHS: &[&str] = &[
    "/feed",
    "/repositories",
    "/dashboard",
    "/repository/create",
    "/search",
];

const PROTECTED_PREFIXES: &[&str] = &["/user/"];

pub(crate) fn is_protected_path(path: &str) -> bool {
    PROTECTED_PATHS.contains(&path) || PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Whether the route guard should send the visitor to `/login`.
pub(crate) fn should_redirect_to_login(path: &str, has_token: bool) -> bool {
    !has_token && is_protected_path(path)
}

/// First run of ASCII digits in `text`, e.g. `"Curtir (5)"` → `5`.
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Count to display after a like toggle. A server-provided count wins over
/// the one re-parsed from the current label.
pub(crate) fn next_like_count(current_text: &str, liked: bool, server_count: Option<u64>) -> Option<u64> {
    if server_count.is_some() {
        return server_count;
    }

    let current = parse_count(current_text)?;
    Some(if liked {
        current.saturating_add(1)
    } else {
        current.saturating_sub(1)
    })
}

pub(crate) fn like_label(count: u64) -> String {
    format!("{} ({})", LIKE_LABEL, count)
}

pub(crate) fn share_url(origin: &str, post_id: &str) -> String {
    format!(
        "{}/post/{}",
        origin.trim_end_matches('/'),
        urlencoding::encode(post_id)
    )
}

/// `token` parameter from a `?a=b&token=...` query string (OAuth callback).
pub(crate) fn token_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "token")
        .and_then(|(_, v)| urlencoding::decode(&v.replace('+', " ")).ok().map(|s| s.into_owned()))
        .filter(|t| !t.trim().is_empty())
}

/// The query string with the `token` parameter removed (`""` when nothing remains).
pub(crate) fn strip_token_from_query(search: &str) -> String {
    let rest: Vec<&str> = search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("token"))
        .collect();

    if rest.is_empty() {
        String::new()
    } else {
        format!("?{}", rest.join("&"))
    }
}
