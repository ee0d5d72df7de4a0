//! One-shot flash messages
//!
//! Messages queued before a redirect travel in the signed `empdir_flash`
//! cookie (base64 of a JSON list) and are shown by the next rendered page,
//! which clears the cookie. Cookies with a bad signature are ignored.
//! Messages raised while rendering a page directly are shown in that same
//! response.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FLASH_COOKIE: &str = "empdir_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.into(),
        }
    }
}

/// Pending messages carried by the request (malformed cookies yield none)
pub fn pending(jar: &SignedCookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

/// Remove pending messages, returning them with the updated jar
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<FlashMessage>) {
    let messages = pending(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, messages);
    }
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}

/// Queue a message for the next rendered page
pub fn push(jar: SignedCookieJar, message: FlashMessage) -> SignedCookieJar {
    let mut messages = pending(&jar);
    messages.push(message);
    let cookie = Cookie::build((FLASH_COOKIE, encode(&messages)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

fn encode(messages: &[FlashMessage]) -> String {
    // Serializing plain structs of strings cannot fail
    let json = serde_json::to_vec(messages).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode(value: &str) -> Option<Vec<FlashMessage>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(messages) => Some(messages),
        Err(e) => {
            debug!("Discarding malformed flash cookie: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap};
    use axum_extra::extract::cookie::Key;

    fn jar_with_raw_cookie(value: &str) -> SignedCookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("{}={}", FLASH_COOKIE, value).parse().unwrap(),
        );
        SignedCookieJar::from_headers(&headers, Key::generate())
    }

    #[test]
    fn test_push_then_take() {
        let jar = SignedCookieJar::new(Key::generate());
        let jar = push(jar, FlashMessage::success("Gil Flangeworm added to database"));
        let jar = push(jar, FlashMessage::error("Database error: x"));

        let (jar, messages) = take(jar);
        assert_eq!(
            messages,
            vec![
                FlashMessage::success("Gil Flangeworm added to database"),
                FlashMessage::error("Database error: x"),
            ]
        );
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_cookie_value_is_header_safe() {
        let jar = push(
            SignedCookieJar::new(Key::generate()),
            FlashMessage::error("a; b = c\n\"d\""),
        );
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        assert!(value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_forged_cookie_is_ignored() {
        // Well-formed payload, but not signed with the server key
        let payload = URL_SAFE_NO_PAD.encode(r#"[{"category":"success","message":"forged"}]"#);
        assert!(pending(&jar_with_raw_cookie(&payload)).is_empty());
    }

    #[test]
    fn test_malformed_cookie_is_ignored() {
        let key = Key::generate();
        let jar = SignedCookieJar::new(key.clone()).add(Cookie::new(FLASH_COOKIE, "not base64 !!"));
        assert!(pending(&jar).is_empty());

        let jar = SignedCookieJar::new(key).add(Cookie::new(FLASH_COOKIE, URL_SAFE_NO_PAD.encode("{}")));
        assert!(pending(&jar).is_empty());
    }

    #[test]
    fn test_take_without_cookie() {
        let (_jar, messages) = take(SignedCookieJar::new(Key::generate()));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&FlashMessage::success("ok")).unwrap();
        assert_eq!(json, r#"{"category":"success","message":"ok"}"#);
    }
}
