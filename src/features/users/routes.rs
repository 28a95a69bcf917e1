use crate::features::users::handlers::profile_handler;
use crate::features::users::services::UserProfileService;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserProfileService>) -> Router {
    Router::new()
        .route("/api/user-profile", post(profile_handler::create_profile))
        .route("/api/user-profile", patch(profile_handler::update_phone))
        .route(
            "/api/user-profile/{id}",
            put(profile_handler::update_profile),
        )
        .route("/api/users/me", get(profile_handler::get_my_profile))
        .with_state(service)
}
