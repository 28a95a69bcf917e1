use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::roles::Role;

/// Database model for a user profile. The id is the auth provider uid.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub telefone_is_whats: bool,
    pub perfil: Role,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
