use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::files::handlers::upload_files;
use crate::features::files::services::FileService;
use crate::shared::constants::{MAX_ATTACHMENTS, MAX_FILE_SIZE};

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/upload",
            // Allow a full batch plus buffer for multipart overhead
            post(upload_files)
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE * MAX_ATTACHMENTS + 1024 * 1024)),
        )
        .with_state(file_service)
}
