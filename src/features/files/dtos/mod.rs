mod file_dto;

pub use file_dto::{
    is_mime_type_allowed, validate_batch, AttachmentRef, PendingUpload, UploadFilesDto,
    UploadResponseDto, ALLOWED_MIME_TYPES,
};
