//! Web error type and HTML error pages
//!
//! Validation failures never reach this type: they are re-rendered as forms.
//! What does reach it is fatal to the request (unknown id, template or
//! storage failure outside a handler's own recovery path).

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Web error type
#[derive(Debug, Error)]
pub enum WebError {
    /// Referenced employee or route does not exist (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Form post without a valid CSRF token (400)
    #[error("CSRF check failed: {0}")]
    Csrf(&'static str),

    /// Template compilation or rendering failure (500)
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Storage failure with no local recovery (500)
    #[error("Common error: {0}")]
    Common(#[from] empdir_common::Error),
}

/// Result type for web handlers
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(_) => error_page(
                StatusCode::NOT_FOUND,
                "The requested URL was not found on the server.",
            ),
            WebError::Csrf(reason) => error_page(StatusCode::BAD_REQUEST, reason),
            WebError::Common(empdir_common::Error::NotFound(_)) => error_page(
                StatusCode::NOT_FOUND,
                "The requested URL was not found on the server.",
            ),
            other => {
                error!("Request failed: {}", other);
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The server encountered an internal error and was unable to complete your request.",
                )
            }
        }
    }
}

/// Minimal HTML page for a status code
///
/// Only fixed text is interpolated here, never request data.
pub fn error_page(status: StatusCode, detail: &'static str) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{code} {reason}</title>
</head>
<body>
    <h1>{reason}</h1>
    <p>{detail}</p>
    <p><a href="/index/">Back to the directory</a></p>
</body>
</html>
"#,
        code = status.as_u16(),
        reason = reason,
        detail = detail,
    );
    (status, Html(body)).into_response()
}

/// Router fallback for unknown paths
pub async fn not_found() -> WebError {
    WebError::NotFound("route".to_string())
}

/// Give axum's bare 405 responses an HTML body, keeping the `Allow` header
pub async fn render_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut page = error_page(
        StatusCode::METHOD_NOT_ALLOWED,
        "The method is not allowed for the requested URL.",
    );
    if let Some(allow) = allow {
        page.headers_mut().insert(header::ALLOW, allow);
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = WebError::NotFound("employee 9".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            WebError::Common(empdir_common::Error::NotFound("Employee 9".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_csrf_failure_maps_to_400() {
        let response = WebError::Csrf("The CSRF token is missing.").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let response =
            WebError::Common(empdir_common::Error::Config("broken".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_method_not_allowed_keeps_allow_header() {
        let bare = Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(header::ALLOW, "POST")
            .body(axum::body::Body::empty())
            .unwrap();

        let page = render_method_not_allowed(bare).await;
        assert_eq!(page.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(page.headers()[header::ALLOW], "POST");
        assert!(page.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
