use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::features::projects::handlers::project_handler;
use crate::features::projects::services::ProjectService;

pub fn routes(service: Arc<ProjectService>) -> Router {
    Router::new()
        .route("/api/projetos", get(project_handler::list_projects))
        .route("/api/projetos", put(project_handler::update_project))
        .with_state(service)
}
