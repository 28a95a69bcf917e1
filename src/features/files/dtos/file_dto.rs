use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{MAX_ATTACHMENTS, MAX_FILE_SIZE};

/// Allowed MIME types for proposal attachments
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Check if a MIME type is allowed
pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// A file read from the multipart request, pending validation and upload
#[derive(Debug)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Validate a whole upload batch before anything touches storage.
///
/// Any invalid file rejects the entire batch.
pub fn validate_batch(files: &[PendingUpload]) -> Result<(), String> {
    if files.is_empty() {
        return Err("Nenhum arquivo fornecido".to_string());
    }

    if files.len() > MAX_ATTACHMENTS {
        return Err(format!(
            "Máximo de {} arquivos permitidos",
            MAX_ATTACHMENTS
        ));
    }

    for file in files {
        if file.data.len() > MAX_FILE_SIZE {
            return Err(format!(
                "Arquivo {} excede o tamanho máximo de {}MB",
                file.file_name,
                MAX_FILE_SIZE / 1024 / 1024
            ));
        }

        if !is_mime_type_allowed(&file.content_type) {
            return Err(format!(
                "Tipo de arquivo {} não permitido",
                file.content_type
            ));
        }
    }

    Ok(())
}

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFilesDto {
    /// The files to upload (1 to 5)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub files: Vec<String>,
}

/// A stored attachment, as embedded in proposals and returned by the
/// upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentRef {
    /// Object key in the storage bucket
    pub key: String,
    /// Original filename as uploaded
    pub name: String,
    /// Size of the file in bytes
    pub size: i64,
    /// MIME type of the file
    #[serde(rename = "type")]
    pub content_type: String,
    /// Direct public URL
    pub url: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

/// Response DTO for the upload endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    pub files: Vec<AttachmentRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, content_type: &str, size: usize) -> PendingUpload {
        PendingUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn accepts_documents_and_images() {
        assert!(is_mime_type_allowed("application/pdf"));
        assert!(is_mime_type_allowed("image/png"));
        assert!(is_mime_type_allowed(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
    }

    #[test]
    fn rejects_executables_and_archives() {
        assert!(!is_mime_type_allowed("application/x-msdownload"));
        assert!(!is_mime_type_allowed("application/zip"));
        assert!(!is_mime_type_allowed("text/html"));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = validate_batch(&[]).unwrap_err();
        assert_eq!(err, "Nenhum arquivo fornecido");
    }

    #[test]
    fn batch_over_limit_is_rejected() {
        let files: Vec<_> = (0..6)
            .map(|i| upload(&format!("f{}.pdf", i), "application/pdf", 10))
            .collect();
        let err = validate_batch(&files).unwrap_err();
        assert!(err.contains("Máximo de 5"));
    }

    #[test]
    fn one_oversized_file_rejects_the_whole_batch() {
        let files = vec![
            upload("ok.pdf", "application/pdf", 10),
            upload("big.pdf", "application/pdf", MAX_FILE_SIZE + 1),
        ];
        let err = validate_batch(&files).unwrap_err();
        assert!(err.contains("big.pdf"));
    }

    #[test]
    fn one_bad_mime_rejects_the_whole_batch() {
        let files = vec![
            upload("ok.png", "image/png", 10),
            upload("script.sh", "text/x-shellscript", 10),
        ];
        let err = validate_batch(&files).unwrap_err();
        assert!(err.contains("text/x-shellscript"));
    }

    #[test]
    fn max_sized_batch_passes() {
        let files: Vec<_> = (0..5)
            .map(|i| upload(&format!("f{}.pdf", i), "application/pdf", MAX_FILE_SIZE))
            .collect();
        assert!(validate_batch(&files).is_ok());
    }

    #[test]
    fn upload_response_serializes_flat() {
        // The submission form reads `files` at the top level, no envelope
        let response = UploadResponseDto {
            files: vec![AttachmentRef {
                key: "public/propostas/x/1-laudo.pdf".to_string(),
                name: "laudo.pdf".to_string(),
                size: 42,
                content_type: "application/pdf".to_string(),
                url: "http://localhost:9000/anexos-propostas/public/propostas/x/1-laudo.pdf"
                    .to_string(),
                uploaded_at: Utc::now(),
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("files").is_some());
        assert!(json.get("data").is_none());
        assert!(json.get("success").is_none());
        assert_eq!(json["files"][0]["type"], "application/pdf");
        assert_eq!(json["files"][0]["name"], "laudo.pdf");
    }
}
