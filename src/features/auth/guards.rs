//! Role-based authorization guards.
//!
//! Each guard extracts the authenticated user and verifies they hold at
//! least the named role. Holding a higher role always satisfies a lower
//! requirement.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::roles::Role;
use axum::{extract::FromRequestParts, http::request::Parts};

fn require_role(parts: &Parts, required: Role) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !user.has_permission(required) {
        return Err(AppError::Forbidden(format!(
            "Requires at least the {} role",
            required
        )));
    }

    Ok(user.clone())
}

/// Guard for review operations.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireMediador(user): RequireMediador) { ... }
/// ```
pub struct RequireMediador(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireMediador
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequireMediador(require_role(parts, Role::Mediador)?))
    }
}

/// Guard for assignment and project-track operations.
pub struct RequireCoordenador(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireCoordenador
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequireCoordenador(require_role(parts, Role::Coordenador)?))
    }
}

/// Guard for user administration operations.
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequireAdmin(require_role(parts, Role::Admin)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_user_with_role, with_admin_auth};
    use axum::{extract::Request, middleware::from_fn, middleware::Next, routing::get, Router};
    use axum_test::TestServer;

    async fn mediador_endpoint(RequireMediador(_user): RequireMediador) -> &'static str {
        "ok"
    }

    async fn admin_endpoint(RequireAdmin(_user): RequireAdmin) -> &'static str {
        "ok"
    }

    fn guarded_router() -> Router {
        Router::new()
            .route("/mediador", get(mediador_endpoint))
            .route("/admin", get(admin_endpoint))
    }

    fn with_role(router: Router, role: Role) -> Router {
        router.layer(from_fn(move |mut request: Request, next: Next| async move {
            request.extensions_mut().insert(create_user_with_role(role));
            next.run(request).await
        }))
    }

    #[tokio::test]
    async fn missing_user_is_unauthorized() {
        let server = TestServer::new(guarded_router()).unwrap();
        let response = server.get("/mediador").await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn lower_role_is_forbidden() {
        let server = TestServer::new(with_role(guarded_router(), Role::Estudante)).unwrap();
        let response = server.get("/mediador").await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn exact_role_passes() {
        let server = TestServer::new(with_role(guarded_router(), Role::Mediador)).unwrap();
        let response = server.get("/mediador").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn higher_role_passes() {
        let server = TestServer::new(with_role(guarded_router(), Role::Coordenador)).unwrap();
        let response = server.get("/mediador").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn admin_guard_rejects_coordenador() {
        let server = TestServer::new(with_role(guarded_router(), Role::Coordenador)).unwrap();
        let response = server.get("/admin").await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn admin_guard_accepts_admin() {
        let server = TestServer::new(with_admin_auth(guarded_router())).unwrap();
        let response = server.get("/admin").await;
        response.assert_status_ok();
    }
}
