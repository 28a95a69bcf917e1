/// Default page size for the project listing
pub const DEFAULT_PAGE_SIZE: i64 = 6;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 24;

/// Email domain required for elevated roles (estudante, mediador, coordenador)
pub const INSTITUTIONAL_DOMAIN: &str = "@fatec.sp.gov.br";

/// Maximum number of attachments per proposal / upload batch
pub const MAX_ATTACHMENTS: usize = 5;

/// Maximum size of a single uploaded file in bytes (10 MiB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
