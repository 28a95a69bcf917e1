use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::roles::{self, Role};
use crate::features::projects::dtos::{
    ProjectFilterQuery, ProjectResponseDto, ProjectUpdateDto, UpdateProjectDto,
};
use crate::features::proposals::lifecycle;
use crate::features::proposals::models::{
    Proposal, ProposalStatus, ProposalUpdate, ProposalWithAuthor, PROJECT_TRACK,
};
use crate::shared::types::{total_pages, Paginated, PaginationQuery};

const JOINED_COLUMNS: &str = "p.id, p.id_usuario, p.titulo, p.descricao, p.status, p.anexos, \
    p.email_contato_opcional, p.telefone_contato_opcional, \
    p.telefone_contato_opcional_is_whats, p.notas_mediador, p.notas_coordenador, p.curso, \
    p.turma, p.semestre, p.professor, p.progresso, p.data_inicio, p.data_termino_prevista, \
    p.created_at, p.updated_at, u.nome AS autor_nome";

const PROPOSAL_COLUMNS: &str = "id, id_usuario, titulo, descricao, status, anexos, \
    email_contato_opcional, telefone_contato_opcional, telefone_contato_opcional_is_whats, \
    notas_mediador, notas_coordenador, curso, turma, semestre, professor, progresso, \
    data_inicio, data_termino_prevista, created_at, updated_at";

/// Service for the project tracking surface
pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Paginated project listing.
    ///
    /// Without an explicit status filter, only proposals in the project
    /// track (assigned onwards) are shown. Search matches title and
    /// description case-insensitively.
    pub async fn list(
        &self,
        pagination: &PaginationQuery,
        filter: &ProjectFilterQuery,
    ) -> Result<Paginated<ProjectResponseDto>> {
        let statuses: Vec<ProposalStatus> = match filter.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let status = ProposalStatus::parse(raw)
                    .ok_or_else(|| AppError::Validation(format!("Status inválido: {}", raw)))?;
                vec![status]
            }
            _ => PROJECT_TRACK.to_vec(),
        };

        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM proposta p \
             WHERE p.status = ANY($1) \
               AND ($2::text IS NULL OR p.titulo ILIKE $2 OR p.descricao ILIKE $2)",
        )
        .bind(&statuses)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let page = pagination.page_for_total(total);
        let limit = pagination.limit();
        let offset = pagination.offset_for_total(total);

        let sql = format!(
            "SELECT {JOINED_COLUMNS} FROM proposta p \
             LEFT JOIN usuario u ON u.id = p.id_usuario \
             WHERE p.status = ANY($1) \
               AND ($2::text IS NULL OR p.titulo ILIKE $2 OR p.descricao ILIKE $2) \
             ORDER BY p.created_at DESC \
             LIMIT $3 OFFSET $4"
        );

        let rows = sqlx::query_as::<_, ProposalWithAuthor>(&sql)
            .bind(&statuses)
            .bind(pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list projects: {:?}", e);
                AppError::Database(e)
            })?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.proposal.id).collect();
        let mut updates = self.updates_for(&ids).await?;

        let data = rows
            .into_iter()
            .map(|row| {
                let project_updates = updates.remove(&row.proposal.id).unwrap_or_default();
                ProjectResponseDto::from_row(row, project_updates)
            })
            .collect();

        Ok(Paginated {
            data,
            page,
            page_size: limit,
            total,
            total_pages: total_pages(total, limit),
        })
    }

    /// Apply a project update: optional status transition, optional progress
    /// note, optional progress percent.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        dto: &UpdateProjectDto,
    ) -> Result<ProjectResponseDto> {
        let message = dto
            .update_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());

        // A body with nothing to apply must not touch the record
        if dto.status.is_none() && message.is_none() && dto.progress.is_none() {
            return Err(AppError::BadRequest(
                "Nenhuma alteração informada".to_string(),
            ));
        }

        let current = self.fetch(dto.id).await?;

        // Progress notes and percent come from staff or the submitter, and
        // only while the project is still moving
        if message.is_some() || dto.progress.is_some() {
            let is_submitter = user.uid == current.id_usuario;
            if !is_submitter && !roles::has_permission(user.role, Role::Mediador) {
                return Err(AppError::Forbidden(
                    "Apenas a equipe ou o autor podem registrar progresso".to_string(),
                ));
            }
            if current.status.is_terminal() {
                return Err(AppError::Conflict(
                    "Projeto encerrado não aceita atualizações".to_string(),
                ));
            }
        }

        let progress = dto.progress.map(|p| p.clamp(0, 100));

        let proposal = match dto.status {
            Some(new_status) => {
                lifecycle::validate_transition(current.status, new_status, user.role)?;

                let sql = format!(
                    "UPDATE proposta SET status = $3, \
                        progresso = COALESCE($4, progresso), \
                        updated_at = NOW() \
                     WHERE id = $1 AND status = $2 \
                     RETURNING {PROPOSAL_COLUMNS}"
                );

                sqlx::query_as::<_, Proposal>(&sql)
                    .bind(dto.id)
                    .bind(current.status)
                    .bind(new_status)
                    .bind(progress)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?
                    .ok_or_else(|| {
                        AppError::Conflict(
                            "O projeto foi modificado por outra operação".to_string(),
                        )
                    })?
            }
            None => {
                let sql = format!(
                    "UPDATE proposta SET \
                        progresso = COALESCE($2, progresso), \
                        updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING {PROPOSAL_COLUMNS}"
                );

                sqlx::query_as::<_, Proposal>(&sql)
                    .bind(dto.id)
                    .bind(progress)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Project {} not found", dto.id))
                    })?
            }
        };

        if let Some(message) = message {
            sqlx::query(
                "INSERT INTO proposta_atualizacao (id_proposta, mensagem, autor) \
                 VALUES ($1, $2, $3)",
            )
            .bind(dto.id)
            .bind(message)
            .bind(user.display_name())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

            info!("Progress note added to project {} by {}", dto.id, user.uid);
        }

        let autor_nome = sqlx::query_scalar::<_, String>("SELECT nome FROM usuario WHERE id = $1")
            .bind(proposal.id_usuario)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut updates = self.updates_for(&[proposal.id]).await?;
        let project_updates = updates.remove(&proposal.id).unwrap_or_default();

        Ok(ProjectResponseDto::from_row(
            ProposalWithAuthor {
                proposal,
                autor_nome,
            },
            project_updates,
        ))
    }

    /// Progress notes for a set of projects, newest first, grouped by id
    async fn updates_for(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<ProjectUpdateDto>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ProposalUpdate>(
            "SELECT id, id_proposta, mensagem, autor, created_at \
             FROM proposta_atualizacao \
             WHERE id_proposta = ANY($1) \
             ORDER BY created_at DESC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut grouped: HashMap<Uuid, Vec<ProjectUpdateDto>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.id_proposta)
                .or_default()
                .push(row.into());
        }
        Ok(grouped)
    }

    async fn fetch(&self, id: Uuid) -> Result<Proposal> {
        let sql = format!("SELECT {PROPOSAL_COLUMNS} FROM proposta WHERE id = $1");

        sqlx::query_as::<_, Proposal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lazy pool: nothing connects, so an error raised before the first
    // query proves the request never reached the record.
    fn service() -> ProjectService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/fatec_conecta_test")
            .unwrap();
        ProjectService::new(pool)
    }

    fn coordenador() -> AuthenticatedUser {
        AuthenticatedUser {
            uid: Uuid::new_v4(),
            email: "coord@fatec.sp.gov.br".to_string(),
            name: Some("Coordenação".to_string()),
            role: Some(Role::Coordenador),
        }
    }

    #[tokio::test]
    async fn update_with_no_actionable_field_is_rejected() {
        let dto = UpdateProjectDto {
            id: Uuid::new_v4(),
            status: None,
            update_message: None,
            progress: None,
        };
        let err = service().update(&coordenador(), &dto).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{err}");
    }

    #[tokio::test]
    async fn blank_message_alone_counts_as_no_change() {
        let dto = UpdateProjectDto {
            id: Uuid::new_v4(),
            status: None,
            update_message: Some("   ".to_string()),
            progress: None,
        };
        let err = service().update(&coordenador(), &dto).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{err}");
    }
}
