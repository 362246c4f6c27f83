//! CSV export handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::api::ApiState;
use crate::export::export_csv;

/// Write the collection to the export file and return it as a download.
///
/// Any failure, including an empty collection, is a plain-text 500 so
/// the browser shows something actionable instead of a broken download.
pub async fn download(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = state.store.read().await;

    let books = store.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load books for export");
        (StatusCode::INTERNAL_SERVER_ERROR, "Export failed".to_string())
    })?;

    export_csv(&books, &state.export_path).map_err(|e| {
        tracing::error!(error = %e, "CSV export failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Export failed".to_string())
    })?;

    let bytes = tokio::fs::read(&state.export_path).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read export file back");
        (StatusCode::INTERNAL_SERVER_ERROR, "Export failed".to_string())
    })?;

    let filename = state
        .export_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "books_export.csv".to_string());

    tracing::info!(count = books.len(), "collection exported for download");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
