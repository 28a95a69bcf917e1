#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::auth::roles::Role;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
#[allow(dead_code)]
pub fn create_user_with_role(role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        uid: Uuid::new_v4(),
        email: "test@fatec.sp.gov.br".to_string(),
        name: Some("Usuária de Teste".to_string()),
        role: Some(role),
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(create_user_with_role(Role::Admin));
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}
