use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Cache-first asset serving, the service-worker analog for the dashboard
/// front end.
#[utoipa::path(
    get,
    path = "/assets/{path}",
    params(("path" = String, Path, description = "Asset path relative to the asset dir")),
    responses(
        (status = 200, description = "Asset bytes"),
        (status = 404, description = "Unknown asset"),
    ),
    tag = "Assets"
)]
pub async fn serve_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.assets.fetch(&path) {
        Ok(Some(bytes)) => {
            ([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response()
        }
        Ok(None) => AppError::NotFound(format!("Asset not found: {path}")).into_response(),
        Err(err) => AppError::Internal(err).into_response(),
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or_default() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
