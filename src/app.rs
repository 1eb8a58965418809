// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::CourseSearchError;
use crate::models::course::Course;
use crate::models::search::{
    CourseCountResponse, SearchRequest, SearchResponse, SuggestParams, SuggestResponse,
};
use crate::models::version::VersionResponse;
use crate::services::course_index::CourseIndex;
use crate::services::search::CourseService;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SKILLSEEK_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SKILLSEEK_VERSION");

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<CourseService<CourseIndex>>,
}

impl AppState {
    pub fn new(courses: CourseService<CourseIndex>) -> Self {
        Self {
            courses: Arc::new(courses),
        }
    }
}

type ApiError = (StatusCode, String);

fn error_response(err: CourseSearchError) -> ApiError {
    if err.is_invalid_request() {
        (StatusCode::BAD_REQUEST, err.cause().to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Search error: {err}"),
        )
    }
}

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service version", body = VersionResponse)),
    tag = "meta"
)]
pub async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "skillseek".to_string(),
        version: VERSION.to_string(),
        search_backend: state.courses.index().backend().to_string(),
    })
}

/// Keyword search with filters, sorting and pagination.
#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchRequest),
    responses(
        (status = 200, description = "One page of matching courses", body = SearchResponse),
        (status = 400, description = "Invalid filter values"),
        (status = 500, description = "Search index failure"),
    ),
    tag = "search"
)]
pub async fn search_handler(
    State(state): State<AppState>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    state
        .courses
        .search(request)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Course title completions for a typed prefix.
#[utoipa::path(
    get,
    path = "/api/search/suggest",
    params(SuggestParams),
    responses(
        (status = 200, description = "Up to ten distinct titles", body = SuggestResponse),
        (status = 500, description = "Search index failure"),
    ),
    tag = "search"
)]
pub async fn suggest_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let suggestions = state
        .courses
        .suggest(&params.q)
        .await
        .map_err(error_response)?;

    Ok(Json(SuggestResponse { suggestions }))
}

#[utoipa::path(
    get,
    path = "/api/courses/count",
    responses(
        (status = 200, description = "Number of indexed courses", body = CourseCountResponse),
        (status = 500, description = "Search index failure"),
    ),
    tag = "search"
)]
pub async fn count_handler(
    State(state): State<AppState>,
) -> Result<Json<CourseCountResponse>, ApiError> {
    let total = state
        .courses
        .total_courses()
        .await
        .map_err(error_response)?;

    Ok(Json(CourseCountResponse { total }))
}

#[derive(OpenApi)]
#[openapi(
    paths(version_handler, search_handler, suggest_handler, count_handler),
    components(schemas(
        Course,
        SearchResponse,
        SuggestResponse,
        CourseCountResponse,
        VersionResponse
    )),
    tags(
        (name = "search", description = "Course search and autocomplete"),
        (name = "meta", description = "Service information")
    )
)]
pub struct SearchApiDoc;

/// Build the Axum application router, Swagger UI included.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/api/search", get(search_handler))
        .route("/api/search/suggest", get(suggest_handler))
        .route("/api/courses/count", get(count_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", SearchApiDoc::openapi()))
}
