use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::proposals::models::{ProposalStatus, ProposalUpdate, ProposalWithAuthor};

/// Filters for the project listing, combined with the shared pagination
/// query
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProjectFilterQuery {
    /// Exact status filter; defaults to every project-track status
    pub status: Option<String>,
    /// Case-insensitive search over title and description
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectStudentDto {
    pub name: String,
    pub course: String,
    pub semester: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectUpdateDto {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub message: String,
    pub author: String,
}

impl From<ProposalUpdate> for ProjectUpdateDto {
    fn from(row: ProposalUpdate) -> Self {
        Self {
            id: row.id,
            date: row.created_at,
            message: row.mensagem,
            author: row.autor,
        }
    }
}

/// A proposal projected onto the tracking surface
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    pub student: Option<ProjectStudentDto>,
    pub start_date: Option<DateTime<Utc>>,
    pub expected_end_date: Option<DateTime<Utc>>,
    pub progress: i32,
    pub images: Vec<String>,
    pub updates: Vec<ProjectUpdateDto>,
}

impl ProjectResponseDto {
    pub fn from_row(row: ProposalWithAuthor, updates: Vec<ProjectUpdateDto>) -> Self {
        let proposal = row.proposal;
        let student = row.autor_nome.map(|name| ProjectStudentDto {
            name,
            course: proposal
                .curso
                .clone()
                .unwrap_or_else(|| "Não informado".to_string()),
            semester: proposal
                .semestre
                .clone()
                .unwrap_or_else(|| "Não informado".to_string()),
        });

        Self {
            id: proposal.id,
            title: proposal.titulo,
            description: proposal.descricao,
            status: proposal.status,
            student,
            start_date: proposal.data_inicio.or(Some(proposal.created_at)),
            expected_end_date: proposal.data_termino_prevista,
            progress: proposal.progresso,
            images: proposal.anexos.0.into_iter().map(|a| a.url).collect(),
            updates,
        }
    }
}

/// Request DTO for the project update (PUT /api/projetos)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectDto {
    pub id: Uuid,
    pub status: Option<ProposalStatus>,
    pub update_message: Option<String>,
    pub progress: Option<i32>,
}
