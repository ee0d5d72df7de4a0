//! empdir-web library - Employee directory HTTP server
//!
//! Routes:
//! - `GET /`, `GET /index/` paginated listing
//! - `GET|POST /add_emp/` create
//! - `GET|POST /update_emp/:id/` update
//! - `POST /delete_emp/:id/` delete
//! - `GET /health` health check

use axum::extract::FromRef;
use axum::Router;
use axum_extra::extract::cookie::Key;
use minijinja::Environment;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod csrf;
pub mod error;
pub mod flash;
pub mod pagination;
pub mod templates;

pub use error::{WebError, WebResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; handlers open one transaction per request
    pub db: SqlitePool,
    /// Compiled page templates
    pub templates: Arc<Environment<'static>>,
    /// Signs the flash and CSRF cookies
    pub cookie_key: Key,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, cookie_key: Key) -> WebResult<Self> {
        Ok(Self {
            db,
            templates: Arc::new(templates::environment()?),
            cookie_key,
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Cookie signing key from the configured secret, or a random one
///
/// A random key invalidates outstanding cookies on every restart.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        // SHA-512 yields exactly the 64 bytes a key needs
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => Key::generate(),
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::list_employees))
        .route("/index/", get(api::list_employees))
        .route("/add_emp/", get(api::show_add_form).post(api::submit_add_form))
        .route(
            "/update_emp/:id/",
            get(api::show_update_form).post(api::submit_update_form),
        )
        .route("/delete_emp/:id/", post(api::delete_employee))
        .merge(api::health_routes())
        .fallback(error::not_found)
        .layer(middleware::map_response(error::render_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
