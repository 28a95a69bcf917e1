use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{validate_batch, AttachmentRef, PendingUpload};
use crate::features::files::models::File;
use crate::modules::storage::MinIOClient;
use crate::shared::validation::sanitize_filename;

/// Service for attachment upload operations
pub struct FileService {
    pool: PgPool,
    minio_client: Arc<MinIOClient>,
}

impl FileService {
    pub fn new(pool: PgPool, minio_client: Arc<MinIOClient>) -> Self {
        Self { pool, minio_client }
    }

    /// Upload a batch of attachments for a proposal.
    ///
    /// The whole batch is validated before any file is stored. If a later
    /// upload fails, objects already written for this batch are removed so
    /// a failed request leaves nothing behind.
    pub async fn upload_batch(
        &self,
        files: Vec<PendingUpload>,
        user_id: Uuid,
    ) -> Result<Vec<AttachmentRef>> {
        validate_batch(&files).map_err(AppError::BadRequest)?;

        let timestamp = Utc::now().timestamp_millis();
        let mut stored_keys: Vec<String> = Vec::with_capacity(files.len());
        let mut attachments: Vec<AttachmentRef> = Vec::with_capacity(files.len());

        for file in files {
            let sanitized = sanitize_filename(&file.file_name);
            let path = format!("propostas/{}/{}-{}", user_id, timestamp, sanitized);
            let file_key = self.minio_client.generate_key(&path);
            let file_size = file.data.len() as i64;

            if let Err(e) = self
                .minio_client
                .upload(&file_key, file.data, &file.content_type)
                .await
            {
                self.rollback_uploads(&stored_keys).await;
                warn!("Upload failed for '{}': {}", file.file_name, e);
                return Err(AppError::ExternalServiceError(format!(
                    "Falha ao fazer upload de {}",
                    file.file_name
                )));
            }

            debug!("File uploaded to MinIO: {}", file_key);
            stored_keys.push(file_key.clone());

            let url = self.minio_client.public_url(&file_key);

            let record = sqlx::query_as::<_, File>(
                "INSERT INTO files (file_key, original_filename, content_type, file_size, url, uploaded_by) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING id, file_key, original_filename, content_type, file_size, url, \
                           uploaded_by, is_active, created_at, updated_at",
            )
            .bind(&file_key)
            .bind(&file.file_name)
            .bind(&file.content_type)
            .bind(file_size)
            .bind(&url)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save file metadata: {:?}", e);
                AppError::Database(e)
            });

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    self.rollback_uploads(&stored_keys).await;
                    return Err(e);
                }
            };

            attachments.push(AttachmentRef {
                key: record.file_key,
                name: record.original_filename,
                size: record.file_size,
                content_type: record.content_type,
                url: record.url,
                uploaded_at: record.created_at,
            });
        }

        info!(
            "Uploaded {} attachment(s) for user {}",
            attachments.len(),
            user_id
        );

        Ok(attachments)
    }

    /// Best-effort removal of objects stored before a batch failed
    async fn rollback_uploads(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.minio_client.delete(key).await {
                warn!("Failed to clean up '{}' after batch failure: {}", key, e);
            }
        }
    }
}
