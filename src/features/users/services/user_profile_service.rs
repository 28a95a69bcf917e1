use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserProfileDto, UpdatePhoneDto, UpdateUserProfileDto};
use crate::features::users::models::User;
use crate::shared::types::PaginationQuery;

const USER_COLUMNS: &str =
    "id, nome, email, telefone, telefone_is_whats, perfil, ativo, created_at, updated_at";

/// Service for user profile operations
pub struct UserProfileService {
    pool: PgPool,
}

impl UserProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a profile for a freshly signed-up identity
    pub async fn create(&self, dto: &CreateUserProfileDto) -> Result<User> {
        let sql = format!(
            "INSERT INTO usuario (id, nome, email, telefone, telefone_is_whats, perfil) \
             VALUES ($1, $2, $3, $4, FALSE, $5) \
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(dto.uid)
            .bind(&dto.name)
            .bind(&dto.email)
            .bind(dto.phone.as_deref().unwrap_or(""))
            .bind(dto.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .map(|d| d.is_unique_violation())
                    .unwrap_or(false)
                {
                    AppError::Conflict("Profile already exists for this identity".to_string())
                } else {
                    tracing::error!("Failed to create user profile: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        tracing::info!("Created user profile: {} ({})", user.id, user.perfil);
        Ok(user)
    }

    /// Get profile by id, erroring when absent
    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM usuario WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Admin profile edit. Role changes go through the institutional-domain
    /// guard against the target's stored email.
    pub async fn update_profile(&self, id: Uuid, dto: &UpdateUserProfileDto) -> Result<User> {
        if let Some(new_role) = dto.role {
            let target = self.get_by_id(id).await?;
            if !crate::features::auth::roles::can_assign_role(&target.email, new_role) {
                return Err(AppError::Forbidden(format!(
                    "Apenas emails institucionais podem receber o perfil {}",
                    new_role
                )));
            }
        }

        let sql = format!(
            "UPDATE usuario SET \
                nome = COALESCE($2, nome), \
                telefone = COALESCE($3, telefone), \
                telefone_is_whats = COALESCE($4, telefone_is_whats), \
                perfil = COALESCE($5, perfil), \
                ativo = COALESCE($6, ativo), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(dto.name.as_deref())
            .bind(dto.phone.as_deref())
            .bind(dto.phone_is_whats)
            .bind(dto.role)
            .bind(dto.active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update user profile: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!("Updated user profile: {}", id);
        Ok(user)
    }

    /// Self-service phone update
    pub async fn update_phone(&self, id: Uuid, dto: &UpdatePhoneDto) -> Result<User> {
        let sql = format!(
            "UPDATE usuario SET telefone = $2, telefone_is_whats = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&dto.phone)
            .bind(dto.phone_is_whats)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update phone: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Fill in the phone opportunistically when the profile has none yet.
    /// Best-effort: callers log failures and move on.
    pub async fn set_phone_if_missing(&self, id: Uuid, phone: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE usuario SET telefone = $2, updated_at = NOW() \
             WHERE id = $1 AND telefone = ''",
        )
        .bind(id)
        .bind(phone)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Admin user listing, newest first
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuario")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM usuario \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset_for_total(total))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((users, total))
    }
}
