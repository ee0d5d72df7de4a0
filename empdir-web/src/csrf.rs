//! CSRF protection for form posts
//!
//! Double-submit token: a random token lives in the signed `empdir_csrf`
//! cookie and is rendered as the hidden `csrf_token` field of every form. A
//! POST is accepted only when the submitted field equals the cookie value.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;
use tracing::warn;

use crate::WebError;

pub const CSRF_COOKIE: &str = "empdir_csrf";

/// Random bytes per token
const TOKEN_BYTES: usize = 32;

pub const MSG_TOKEN_MISSING: &str = "The CSRF token is missing.";
pub const MSG_SESSION_TOKEN_MISSING: &str = "The CSRF session token is missing.";
pub const MSG_TOKEN_MISMATCH: &str = "The CSRF tokens do not match.";

/// Body of a form that carries nothing but the token (delete buttons)
#[derive(Debug, Default, Deserialize)]
pub struct TokenOnly {
    #[serde(default)]
    pub csrf_token: String,
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Token for the page being rendered, creating the cookie when absent
pub fn issue(jar: SignedCookieJar) -> (SignedCookieJar, String) {
    if let Some(token) = jar.get(CSRF_COOKIE).map(|c| c.value().to_string()) {
        if !token.is_empty() {
            return (jar, token);
        }
    }

    let token = new_token();
    let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), token)
}

/// Check a submitted token against the cookie
pub fn verify(jar: &SignedCookieJar, submitted: &str) -> Result<(), WebError> {
    let reason = match jar.get(CSRF_COOKIE) {
        _ if submitted.is_empty() => MSG_TOKEN_MISSING,
        None => MSG_SESSION_TOKEN_MISSING,
        Some(cookie) if tokens_match(cookie.value(), submitted) => return Ok(()),
        Some(_) => MSG_TOKEN_MISMATCH,
    };
    warn!("Rejected form post: {}", reason);
    Err(WebError::Csrf(reason))
}

/// Comparison time independent of where the tokens differ
fn tokens_match(expected: &str, submitted: &str) -> bool {
    let (a, b) = (expected.as_bytes(), submitted.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap};
    use axum_extra::extract::cookie::Key;

    #[test]
    fn test_issue_reuses_existing_token() {
        let (jar, first) = issue(SignedCookieJar::new(Key::generate()));
        let (_jar, second) = issue(jar);
        assert_eq!(first, second);
        assert_eq!(first.len(), 43);
    }

    #[test]
    fn test_verify() {
        let (jar, token) = issue(SignedCookieJar::new(Key::generate()));

        assert!(verify(&jar, &token).is_ok());
        assert!(matches!(verify(&jar, ""), Err(WebError::Csrf(MSG_TOKEN_MISSING))));
        assert!(matches!(verify(&jar, "forged"), Err(WebError::Csrf(MSG_TOKEN_MISMATCH))));

        let empty = SignedCookieJar::new(Key::generate());
        assert!(matches!(
            verify(&empty, &token),
            Err(WebError::Csrf(MSG_SESSION_TOKEN_MISSING))
        ));
    }

    #[test]
    fn test_unsigned_cookie_is_not_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "empdir_csrf=chosen-by-attacker".parse().unwrap());
        let jar = SignedCookieJar::from_headers(&headers, Key::generate());

        assert!(verify(&jar, "chosen-by-attacker").is_err());
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("abc", "abc"));
        assert!(!tokens_match("abc", "abd"));
        assert!(!tokens_match("abc", "ab"));
    }
}
