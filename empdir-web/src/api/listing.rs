//! Paginated employee listing
//!
//! Read-only. A failed query is reported as a flash message and the page is
//! rendered with an empty table instead of failing the request.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::SignedCookieJar;
use empdir_common::db::employees;
use empdir_common::Employee;
use serde::Deserialize;
use tracing::error;

use crate::csrf;
use crate::flash::{self, FlashMessage};
use crate::pagination::{calculate_pagination, parse_page};
use crate::templates::{render_index, IndexPage};
use crate::{AppState, WebResult};

const LISTING_FAILED: &str = "Database error: the employee list could not be loaded.";

/// Query parameters for the listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed); kept raw so junk falls back to page 1
    pub page: Option<String>,
}

/// One rendered slice of the listing
#[derive(Debug, Default)]
struct ListingSlice {
    employees: Vec<Employee>,
    current_page: i64,
    total_pages: i64,
}

/// GET / and GET /index/
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    jar: SignedCookieJar,
) -> WebResult<impl IntoResponse> {
    let requested = parse_page(query.page.as_deref());
    let (jar, mut flashes) = flash::take(jar);
    let (jar, csrf_token) = csrf::issue(jar);

    let slice = match load_slice(&state, requested).await {
        Ok(slice) => slice,
        Err(e) => {
            error!("Listing query failed: {}", e);
            flashes.push(FlashMessage::error(LISTING_FAILED));
            ListingSlice {
                current_page: requested,
                ..Default::default()
            }
        }
    };

    let page = render_index(
        &state.templates,
        IndexPage {
            employees: &slice.employees,
            current_page: slice.current_page,
            total_pages: slice.total_pages,
            flashes: &flashes,
            csrf_token: &csrf_token,
        },
    )?;

    Ok((jar, page))
}

async fn load_slice(state: &AppState, requested: i64) -> empdir_common::Result<ListingSlice> {
    let mut tx = state.db.begin().await?;

    let total = employees::count(&mut *tx).await?;
    let pagination = calculate_pagination(total, requested);
    let rows = employees::list_page(&mut *tx, pagination.limit(), pagination.offset).await?;

    tx.commit().await?;

    Ok(ListingSlice {
        employees: rows,
        current_page: pagination.page,
        total_pages: pagination.total_pages,
    })
}
