use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::roles;
use crate::features::users::dtos::{
    CreateUserProfileDto, UpdatePhoneDto, UpdateUserProfileDto, UserProfileResponseDto,
};
use crate::features::users::services::UserProfileService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/user-profile",
    request_body = CreateUserProfileDto,
    responses(
        (status = 201, description = "Profile created successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Profile does not belong to the caller"),
        (status = 409, description = "Profile already exists")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserProfileService>>,
    AppJson(dto): AppJson<CreateUserProfileDto>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if dto.uid != user.uid {
        return Err(AppError::Forbidden(
            "Cannot create a profile for another user".to_string(),
        ));
    }

    // The role check below must run against the email the token proved,
    // not whatever the body claims
    if !dto.email.eq_ignore_ascii_case(&user.email) {
        return Err(AppError::Forbidden(
            "O email do perfil deve ser o email autenticado".to_string(),
        ));
    }

    if !roles::can_assign_role(&user.email, dto.role) {
        return Err(AppError::Forbidden(format!(
            "Apenas emails institucionais podem receber o perfil {}",
            dto.role
        )));
    }

    let created = service.create(&dto).await?;
    Ok(Json(ApiResponse::success(
        Some(UserProfileResponseDto::from(created)),
        Some("Perfil criado com sucesso".to_string()),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/user-profile/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    request_body = UpdateUserProfileDto,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required or role assignment not allowed"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserProfileService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateUserProfileDto>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = service.update_profile(id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(UserProfileResponseDto::from(updated)),
        Some("Perfil atualizado com sucesso".to_string()),
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/api/user-profile",
    request_body = UpdatePhoneDto,
    responses(
        (status = 200, description = "Phone updated successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_phone(
    user: AuthenticatedUser,
    State(service): State<Arc<UserProfileService>>,
    AppJson(dto): AppJson<UpdatePhoneDto>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = service.update_phone(user.uid, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(UserProfileResponseDto::from(updated)),
        Some("Telefone atualizado com sucesso".to_string()),
        None,
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserProfileService>>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    let profile = service.get_by_id(user.uid).await?;
    Ok(Json(ApiResponse::success(
        Some(UserProfileResponseDto::from(profile)),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::roles::Role;
    use crate::features::users::routes;
    use axum::{extract::Request, middleware::from_fn, middleware::Next, Router};
    use axum_test::TestServer;
    use serde_json::json;

    // Lazy pool: requests that pass authorization fail at the connection,
    // so a 403 here proves the guard fired before any persistence.
    fn test_router(user: AuthenticatedUser) -> Router {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/fatec_conecta_test")
            .unwrap();
        let service = Arc::new(UserProfileService::new(pool));
        routes::routes(service).layer(from_fn(
            move |mut request: Request, next: Next| {
                let user = user.clone();
                async move {
                    request.extensions_mut().insert(user);
                    next.run(request).await
                }
            },
        ))
    }

    fn community_user(email: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            uid: Uuid::new_v4(),
            email: email.to_string(),
            name: Some("Visitante".to_string()),
            role: Some(Role::Comunidade),
        }
    }

    #[tokio::test]
    async fn create_profile_rejects_claimed_institutional_email() {
        let user = community_user("atacante@gmail.com");
        let uid = user.uid;
        let server = TestServer::new(test_router(user)).unwrap();

        let response = server
            .post("/api/user-profile")
            .json(&json!({
                "name": "Atacante",
                "email": "falso@fatec.sp.gov.br",
                "role": "admin",
                "uid": uid,
            }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn create_profile_rejects_email_mismatch_even_without_elevation() {
        let user = community_user("alguem@gmail.com");
        let uid = user.uid;
        let server = TestServer::new(test_router(user)).unwrap();

        let response = server
            .post("/api/user-profile")
            .json(&json!({
                "name": "Alguém",
                "email": "outra-pessoa@gmail.com",
                "role": "comunidade",
                "uid": uid,
            }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn create_profile_rejects_elevated_role_on_community_email() {
        let user = community_user("alguem@gmail.com");
        let uid = user.uid;
        let server = TestServer::new(test_router(user)).unwrap();

        let response = server
            .post("/api/user-profile")
            .json(&json!({
                "name": "Alguém",
                "email": "alguem@gmail.com",
                "role": "mediador",
                "uid": uid,
            }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn create_profile_rejects_foreign_uid() {
        let user = community_user("alguem@gmail.com");
        let server = TestServer::new(test_router(user)).unwrap();

        let response = server
            .post("/api/user-profile")
            .json(&json!({
                "name": "Alguém",
                "email": "alguem@gmail.com",
                "role": "comunidade",
                "uid": Uuid::new_v4(),
            }))
            .await;

        response.assert_status_forbidden();
    }
}
