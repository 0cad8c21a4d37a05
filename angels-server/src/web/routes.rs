//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::cache::CacheError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(opportunities_page))
        .route("/stations", get(stations_page))
        .route("/api/opportunities", get(opportunities_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Ranked opportunities as an HTML page.
async fn opportunities_page(
    State(state): State<AppState>,
    Query(query): Query<OpportunitiesQuery>,
) -> Response {
    render_opportunities(&state, &query)
        .await
        .map(|html| Html(html).into_response())
        .unwrap_or_else(AppError::into_page)
}

async fn render_opportunities(
    state: &AppState,
    query: &OpportunitiesQuery,
) -> Result<String, AppError> {
    let current = state.cache.get_current().await?;
    let at_most = query.at_most.unwrap_or(state.at_most);

    OpportunitiesTemplate::from_snapshot(&current.snapshot, at_most, Some(current.computed_at))
        .render()
        .map_err(AppError::from)
}

/// Stations sorted by points, as an HTML page.
async fn stations_page(State(state): State<AppState>) -> Response {
    render_stations(&state)
        .await
        .map(|html| Html(html).into_response())
        .unwrap_or_else(AppError::into_page)
}

async fn render_stations(state: &AppState) -> Result<String, AppError> {
    let current = state.cache.get_current().await?;
    StationsTemplate::from_snapshot(&current.snapshot)
        .render()
        .map_err(AppError::from)
}

/// Ranked opportunities as JSON.
async fn opportunities_json(
    State(state): State<AppState>,
    Query(query): Query<OpportunitiesQuery>,
) -> Result<Json<OpportunitiesResponse>, AppError> {
    let current = state.cache.get_current().await?;
    let at_most = query.at_most.unwrap_or(state.at_most);

    let opportunities = current
        .snapshot
        .top(at_most)
        .map(|(c, from, to)| OpportunityResult::new(c, from, to))
        .collect();

    Ok(Json(OpportunitiesResponse {
        computed_at: current.computed_at.to_rfc3339(),
        opportunities,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The station feed could not be fetched or decoded, and nothing is cached
    Upstream { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::Upstream { message } | AppError::Internal { message } => message,
        }
    }

    /// Render as an HTML error page, for browser-facing routes.
    fn into_page(self) -> Response {
        let status = self.status();
        error!(%status, message = self.message(), "request failed");

        let title = match self {
            AppError::Upstream { .. } => "Station data unavailable",
            AppError::Internal { .. } => "Something went wrong",
        };
        let html = ErrorTemplate {
            title: title.to_string(),
            message: self.message().to_string(),
        }
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e));

        (status, Html(html)).into_response()
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal {
            message: format!("Template error: {}", e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(%status, message = self.message(), "request failed");

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
