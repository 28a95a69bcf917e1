use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::projects::dtos::{ProjectFilterQuery, ProjectResponseDto, UpdateProjectDto};
use crate::features::projects::services::ProjectService;
use crate::shared::types::{ApiResponse, Paginated, PaginationQuery};

/// Paginated project listing
///
/// The response body is the flat `{data, page, pageSize, total, totalPages}`
/// shape consumed by the tracking frontend.
#[utoipa::path(
    get,
    path = "/api/projetos",
    params(PaginationQuery, ProjectFilterQuery),
    responses(
        (status = 200, description = "Projects retrieved", body = Paginated<ProjectResponseDto>),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_projects(
    _user: AuthenticatedUser,
    State(service): State<Arc<ProjectService>>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<ProjectFilterQuery>,
) -> Result<Json<Paginated<ProjectResponseDto>>> {
    let page = service.list(&pagination, &filter).await?;
    Ok(Json(page))
}

/// Update a project: status transition, progress note, progress percent
#[utoipa::path(
    put,
    path = "/api/projetos",
    request_body = UpdateProjectDto,
    responses(
        (status = 200, description = "Project updated", body = ApiResponse<ProjectResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Transition not allowed or project already closed")
    ),
    tag = "projects",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_project(
    user: AuthenticatedUser,
    State(service): State<Arc<ProjectService>>,
    AppJson(dto): AppJson<UpdateProjectDto>,
) -> Result<Json<ApiResponse<ProjectResponseDto>>> {
    let updated = service.update(&user, &dto).await?;
    Ok(Json(ApiResponse::success(Some(updated), None, None)))
}
