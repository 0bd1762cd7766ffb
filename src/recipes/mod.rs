mod dto;
pub mod handlers;
pub mod pages;
pub mod services;

use crate::state::AppState;
use axum::Router;

/// JSON API, mounted under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    handlers::api_routes()
}

/// Server-rendered page at `/`.
pub fn page_router() -> Router<AppState> {
    pages::page_routes()
}
