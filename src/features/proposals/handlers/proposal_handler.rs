use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireCoordenador, RequireMediador};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::proposals::dtos::{
    AssignmentDto, CreateProposalDto, ProposalResponseDto, ReviewRequestDto, ReviewResponseDto,
    UpdateProposalDto,
};
use crate::features::proposals::services::ProposalService;
use crate::shared::types::ApiResponse;

#[derive(Debug, Deserialize, IntoParams)]
pub struct IdeaQuery {
    /// When present, fetch a single proposal instead of the list
    pub id: Option<Uuid>,
}

/// Submit a new idea
#[utoipa::path(
    post,
    path = "/api/ideias-simples",
    request_body = CreateProposalDto,
    responses(
        (status = 201, description = "Idea submitted successfully", body = ApiResponse<ProposalResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Submitter profile not found")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_idea(
    user: AuthenticatedUser,
    State(service): State<Arc<ProposalService>>,
    AppJson(dto): AppJson<CreateProposalDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProposalResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = service.create(&user, &dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), None, None)),
    ))
}

/// List proposals, or fetch one by the `id` query parameter
#[utoipa::path(
    get,
    path = "/api/ideias-simples",
    params(IdeaQuery),
    responses(
        (status = 200, description = "Proposals retrieved", body = ApiResponse<Vec<ProposalResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Proposal not found")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_ideas(
    _user: AuthenticatedUser,
    State(service): State<Arc<ProposalService>>,
    Query(query): Query<IdeaQuery>,
) -> Result<Response> {
    match query.id {
        Some(id) => {
            let proposal = service.get(id).await?;
            Ok(Json(ApiResponse::success(Some(proposal), None, None)).into_response())
        }
        None => {
            let proposals = service.list().await?;
            let total = proposals.len() as i64;
            Ok(Json(ApiResponse::success(
                Some(proposals),
                None,
                Some(crate::shared::types::Meta { total }),
            ))
            .into_response())
        }
    }
}

/// Update a proposal's status and reviewer notes
#[utoipa::path(
    put,
    path = "/api/ideias-simples",
    request_body = UpdateProposalDto,
    responses(
        (status = 200, description = "Proposal updated", body = ApiResponse<ProposalResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient role for the transition"),
        (status = 404, description = "Proposal not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_idea(
    user: AuthenticatedUser,
    State(service): State<Arc<ProposalService>>,
    AppJson(dto): AppJson<UpdateProposalDto>,
) -> Result<Json<ApiResponse<ProposalResponseDto>>> {
    let updated = service.update(&user, &dto).await?;
    Ok(Json(ApiResponse::success(Some(updated), None, None)))
}

/// Review an idea (approve, reject or request information)
#[utoipa::path(
    post,
    path = "/api/ideias-simples/{id}/review",
    params(
        ("id" = Uuid, Path, description = "Proposal id")
    ),
    request_body = ReviewRequestDto,
    responses(
        (status = 200, description = "Review persisted", body = ReviewResponseDto),
        (status = 400, description = "Invalid review payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires at least the mediator role"),
        (status = 404, description = "Proposal not found"),
        (status = 409, description = "Proposal is not reviewable in its current status")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn review_idea(
    RequireMediador(user): RequireMediador,
    State(service): State<Arc<ProposalService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ReviewRequestDto>,
) -> Result<Json<ReviewResponseDto>> {
    let result = service.review(&user, id, &dto).await?;
    Ok(Json(result))
}

/// Direct an approved idea to a course/class
#[utoipa::path(
    post,
    path = "/api/ideias-simples/{id}/assign",
    params(
        ("id" = Uuid, Path, description = "Proposal id")
    ),
    request_body = AssignmentDto,
    responses(
        (status = 200, description = "Proposal assigned", body = ApiResponse<ProposalResponseDto>),
        (status = 400, description = "Missing assignment fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires at least the coordinator role"),
        (status = 404, description = "Proposal not found"),
        (status = 409, description = "Proposal is not in the approved status")
    ),
    tag = "ideas",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn assign_idea(
    RequireCoordenador(user): RequireCoordenador,
    State(service): State<Arc<ProposalService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignmentDto>,
) -> Result<Json<ApiResponse<ProposalResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let assigned = service.assign(&user, id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(assigned),
        Some("Proposta atribuída com sucesso".to_string()),
        None,
    )))
}
