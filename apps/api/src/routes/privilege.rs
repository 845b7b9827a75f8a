//! Privilege REST route handlers
//!
//! Mounted under `/api/privileges`:
//! - `GET /` - List privileges (search with `q`, page with `page`/`size`,
//!   sort with `sortBy`/`sortOrder`)
//! - `GET /:id` - Fetch one privilege
//! - `POST /` - Create a privilege (id must be absent)
//! - `PUT /` - Replace a privilege (id names the target)
//! - `DELETE /:id` - Delete a privilege

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::middleware::JsonBody;
use crate::models::{Privilege, PrivilegePayload};
use crate::paging::ListParams;
use crate::repositories::PrivilegeRepository;

/// Collection path of the privilege resource
pub const PRIVILEGES_PATH: &str = "/api/privileges";

/// Total number of matching items, sent on listings
pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// Shared application state for privilege handlers
#[derive(Clone)]
pub struct PrivilegeState {
    pub repository: Arc<dyn PrivilegeRepository>,
}

impl PrivilegeState {
    pub fn new(repository: Arc<dyn PrivilegeRepository>) -> Self {
        Self { repository }
    }
}

/// Create the privilege router
pub fn privilege_router(state: PrivilegeState) -> Router {
    Router::new()
        .route(
            "/",
            get(list_privileges)
                .post(create_privilege)
                .put(update_privilege),
        )
        .route("/:id", get(get_privilege).delete(delete_privilege))
        .with_state(state)
}

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidPathParam {
            name: "id",
            value: raw.to_string(),
        })
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Get a single privilege
///
/// # Response
/// - 200 OK with the privilege
/// - 400 Bad Request if the id is not a number
/// - 404 Not Found if no privilege has that id
async fn get_privilege(
    State(state): State<PrivilegeState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Privilege>> {
    let id = parse_id(&id)?;

    state
        .repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("privilege", id.to_string()))
}

/// List privileges
///
/// # Response
/// - 200 OK with the matching privileges, `X-Total-Count` and, when
///   paged, a `Link` header
/// - 400 Bad Request for invalid search, paging or sort parameters
/// - 404 Not Found for a non-first page past the end
async fn list_privileges(
    State(state): State<PrivilegeState>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let query = params.to_query()?;
    let privileges = state.repository.find_all(&query).await?;

    let mut headers = HeaderMap::new();

    match query.page {
        Some(page) => {
            if page.page > 0 && privileges.is_empty() {
                return Err(ApiError::PageOutOfBounds { page: page.page });
            }

            let total = state.repository.count(&query.criteria).await?;
            headers.insert(X_TOTAL_COUNT, HeaderValue::from(total));
            headers.insert(
                header::LINK,
                header_value(&params.link_header(PRIVILEGES_PATH, page, total))?,
            );
        }
        None => {
            headers.insert(X_TOTAL_COUNT, HeaderValue::from(privileges.len()));
        }
    }

    Ok((headers, Json(privileges)))
}

/// Create a privilege
///
/// # Response
/// - 201 Created with the privilege and its `Location`
/// - 409 Conflict if an id is supplied, the privilege is invalid or the
///   name is taken
async fn create_privilege(
    State(state): State<PrivilegeState>,
    JsonBody(payload): JsonBody<PrivilegePayload>,
) -> ApiResult<impl IntoResponse> {
    let new = payload.into_new()?;
    let created = state.repository.create(&new).await?;

    info!(id = created.id, name = %created.name, "Privilege created");

    let location = header_value(&format!("{}/{}", PRIVILEGES_PATH, created.id))?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// Replace a privilege
///
/// # Response
/// - 200 OK with the stored privilege
/// - 404 Not Found if no privilege has that id
/// - 409 Conflict if the id is missing, the privilege is invalid or the
///   name belongs to another privilege
async fn update_privilege(
    State(state): State<PrivilegeState>,
    JsonBody(payload): JsonBody<PrivilegePayload>,
) -> ApiResult<Json<Privilege>> {
    let privilege = payload.into_existing()?;

    let updated = state
        .repository
        .update(&privilege)
        .await?
        .ok_or_else(|| ApiError::not_found("privilege", privilege.id.to_string()))?;

    info!(id = updated.id, "Privilege updated");
    Ok(Json(updated))
}

/// Delete a privilege
///
/// # Response
/// - 204 No Content
/// - 400 Bad Request if the id is not a number
/// - 404 Not Found if no privilege has that id
async fn delete_privilege(
    State(state): State<PrivilegeState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;

    if !state.repository.delete(id).await? {
        return Err(ApiError::not_found("privilege", id.to_string()));
    }

    info!(id, "Privilege deleted");
    Ok(StatusCode::NO_CONTENT)
}
