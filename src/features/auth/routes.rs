use axum::{routing::get, Router};

use crate::features::auth::handler::get_me;

/// Routes that sit behind the auth middleware
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/me", get(get_me))
}
