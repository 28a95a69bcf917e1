use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::handlers::admin_handler;
use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::projects::{dtos as projects_dtos, handlers::project_handler};
use crate::features::proposals::{
    dtos as proposals_dtos, handlers::proposal_handler, models as proposals_models,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler};
use crate::shared::types::{ApiResponse, Meta, Paginated};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Users
        profile_handler::create_profile,
        profile_handler::update_profile,
        profile_handler::update_phone,
        profile_handler::get_my_profile,
        // Ideas
        proposal_handler::create_idea,
        proposal_handler::get_ideas,
        proposal_handler::update_idea,
        proposal_handler::review_idea,
        proposal_handler::assign_idea,
        // Projects
        project_handler::list_projects,
        project_handler::update_project,
        // Files
        files_handlers::upload_handler::upload_files,
        // Admin
        admin_handler::list_users,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::roles::Role,
            ApiResponse<auth::dto::MeResponseDto>,
            // Users
            users_dtos::CreateUserProfileDto,
            users_dtos::UpdateUserProfileDto,
            users_dtos::UpdatePhoneDto,
            users_dtos::UserProfileResponseDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            Paginated<users_dtos::UserProfileResponseDto>,
            // Ideas
            proposals_models::ProposalStatus,
            proposals_dtos::ContactDto,
            proposals_dtos::CreateProposalDto,
            proposals_dtos::UpdateProposalDto,
            proposals_dtos::ReviewRequestDto,
            proposals_dtos::ReviewResponseDto,
            proposals_dtos::AssignmentDto,
            proposals_dtos::ProposalResponseDto,
            ApiResponse<proposals_dtos::ProposalResponseDto>,
            ApiResponse<Vec<proposals_dtos::ProposalResponseDto>>,
            // Projects
            projects_dtos::ProjectStudentDto,
            projects_dtos::ProjectUpdateDto,
            projects_dtos::ProjectResponseDto,
            projects_dtos::UpdateProjectDto,
            Paginated<projects_dtos::ProjectResponseDto>,
            ApiResponse<projects_dtos::ProjectResponseDto>,
            // Files
            files_dtos::UploadFilesDto,
            files_dtos::AttachmentRef,
            files_dtos::UploadResponseDto,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User profile management"),
        (name = "ideas", description = "Idea submission and review"),
        (name = "projects", description = "Project tracking"),
        (name = "files", description = "Attachment uploads"),
        (name = "admin", description = "Administration endpoints"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Fatec Conecta API",
        version = "0.1.0",
        description = "API documentation for Fatec Conecta",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
