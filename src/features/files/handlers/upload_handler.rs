use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{PendingUpload, UploadFilesDto, UploadResponseDto};
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_ATTACHMENTS;

/// Upload proposal attachments
///
/// Accepts multipart/form-data with one or more `files` fields
/// (1 to 5 files, 10MB each). The response is the flat `{files: [...]}`
/// shape the submission form consumes.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    request_body(
        content = UploadFilesDto,
        content_type = "multipart/form-data",
        description = "Attachment upload form; repeat the `files` field for each file",
    ),
    responses(
        (status = 200, description = "Files uploaded successfully", body = UploadResponseDto),
        (status = 400, description = "Invalid file batch"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "Request body too large"),
        (status = 502, description = "Storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponseDto>, AppError> {
    let mut files: Vec<PendingUpload> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != "files" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        // Bound memory before validation gets a chance to run
        if files.len() == MAX_ATTACHMENTS {
            return Err(AppError::BadRequest(format!(
                "Máximo de {} arquivos permitidos",
                MAX_ATTACHMENTS
            )));
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        files.push(PendingUpload {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    let attachments = service.upload_batch(files, user.uid).await?;

    Ok(Json(UploadResponseDto { files: attachments }))
}
