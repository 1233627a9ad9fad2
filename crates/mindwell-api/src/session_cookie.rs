//! Session cookie handling.
//!
//! The browser carries only an opaque session UUID; all conversation state
//! stays server-side in the `SessionStore`.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "mindwell_session";

/// Read the session id from the request's `Cookie` header(s).
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` header binding the browser to `id`.
pub fn set_cookie(id: Uuid) -> (axum::http::HeaderName, HeaderValue) {
    let value = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    // A hyphenated UUID is always a valid header value.
    let value = HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""));
    (SET_COOKIE, value)
}

/// `Set-Cookie` header that removes the session cookie.
pub fn clear_cookie() -> (axum::http::HeaderName, HeaderValue) {
    (
        SET_COOKIE,
        HeaderValue::from_static("mindwell_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    )
}
