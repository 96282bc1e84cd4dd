//! Session cookie plumbing

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Cookie carrying the opaque session identifier
pub const SESSION_COOKIE: &str = "brewdesk_session";

/// Extract the session id from the request's Cookie header
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;
    for cookie in cookie_str.split(';') {
        if let Some(id) = cookie.trim().strip_prefix("brewdesk_session=") {
            return Some(id.to_string());
        }
    }
    None
}

/// Set-Cookie value binding the browser to a session
pub fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    )
}

/// Set-Cookie value that expires the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}
