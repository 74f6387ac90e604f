pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ranking::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Axum's default 2 MB body cap is below the per-file upload limit; raise
    // it so oversized files reach the per-file check and get a per-file
    // rejection instead of a wholesale 400.
    let body_limit = DefaultBodyLimit::max(state.config.body_limit_bytes());
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_session_status).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/job", post(handlers::handle_set_job))
        .route("/api/v1/sessions/:id/cvs", post(handlers::handle_upload_cvs))
        .route("/api/v1/sessions/:id/rank", post(handlers::handle_rank))
        .route(
            "/api/v1/sessions/:id/ranking",
            get(handlers::handle_get_ranking),
        )
        .route(
            "/api/v1/sessions/:id/export/csv",
            get(handlers::handle_export_csv),
        )
        .route(
            "/api/v1/sessions/:id/export/json",
            get(handlers::handle_export_json),
        )
        .layer(body_limit)
        .with_state(state)
}
