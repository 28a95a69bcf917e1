use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::UserProfileResponseDto;
use crate::features::users::services::UserProfileService;
use crate::shared::types::{total_pages, Paginated, PaginationQuery};

/// Paginated user listing for the administration panel
#[utoipa::path(
    get,
    path = "/api/admin/usuarios",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users retrieved", body = Paginated<UserProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserProfileService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<UserProfileResponseDto>>> {
    let (users, total) = service.list(&pagination).await?;

    Ok(Json(Paginated {
        data: users.into_iter().map(Into::into).collect(),
        page: pagination.page_for_total(total),
        page_size: pagination.limit(),
        total,
        total_pages: total_pages(total, pagination.limit()),
    }))
}
