use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::admin::handlers::admin_handler;
use crate::features::users::services::UserProfileService;

pub fn routes(service: Arc<UserProfileService>) -> Router {
    Router::new()
        .route("/api/admin/usuarios", get(admin_handler::list_users))
        .with_state(service)
}
