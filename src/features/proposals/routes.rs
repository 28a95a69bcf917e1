use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::proposals::handlers::proposal_handler;
use crate::features::proposals::services::ProposalService;

pub fn routes(service: Arc<ProposalService>) -> Router {
    Router::new()
        .route("/api/ideias-simples", post(proposal_handler::create_idea))
        .route("/api/ideias-simples", get(proposal_handler::get_ideas))
        .route("/api/ideias-simples", put(proposal_handler::update_idea))
        .route(
            "/api/ideias-simples/{id}/review",
            post(proposal_handler::review_idea),
        )
        .route(
            "/api/ideias-simples/{id}/assign",
            post(proposal_handler::assign_idea),
        )
        .with_state(service)
}
