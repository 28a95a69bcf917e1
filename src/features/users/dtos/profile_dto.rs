use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::roles::Role;
use crate::features::users::models::User;

/// Request DTO for creating a profile right after signup.
/// The uid must match the authenticated session.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfileDto {
    #[validate(length(min = 1, max = 128, message = "Nome é obrigatório"))]
    pub name: String,

    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Telefone deve ter 10 ou 11 dígitos numéricos"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub role: Role,

    pub uid: Uuid,
}

/// Request DTO for the admin profile edit (PUT /api/user-profile/{id})
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileDto {
    #[validate(length(min = 1, max = 128, message = "Nome é obrigatório"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Telefone deve ter 10 ou 11 dígitos numéricos"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_is_whats: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Request DTO for the self-service phone update (PATCH /api/user-profile)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhoneDto {
    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Telefone deve ter 10 ou 11 dígitos numéricos"
    ))]
    pub phone: String,

    #[serde(default)]
    pub phone_is_whats: bool,
}

/// User profile as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub phone_is_whats: bool,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfileResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.nome,
            email: u.email,
            phone: u.telefone,
            phone_is_whats: u.telefone_is_whats,
            role: u.perfil,
            active: u.ativo,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_profile_rejects_empty_name() {
        let dto = CreateUserProfileDto {
            name: "".to_string(),
            email: "a@b.com".to_string(),
            phone: None,
            role: Role::Comunidade,
            uid: Uuid::new_v4(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn create_profile_rejects_bad_phone() {
        let dto = CreateUserProfileDto {
            name: "João".to_string(),
            email: "a@b.com".to_string(),
            phone: Some("(11) 99999-9999".to_string()),
            role: Role::Comunidade,
            uid: Uuid::new_v4(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn update_phone_accepts_digits_only() {
        let dto = UpdatePhoneDto {
            phone: "11999999999".to_string(),
            phone_is_whats: true,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn create_profile_accepts_generated_identities() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::Name;
        use fake::Fake;

        for _ in 0..10 {
            let dto = CreateUserProfileDto {
                name: Name().fake(),
                email: SafeEmail().fake(),
                phone: Some("11987654321".to_string()),
                role: Role::Comunidade,
                uid: Uuid::new_v4(),
            };
            assert!(dto.validate().is_ok());
        }
    }
}
