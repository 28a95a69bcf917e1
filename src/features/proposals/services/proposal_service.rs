use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::roles::Role;
use crate::features::proposals::dtos::{
    AssignmentDto, CreateProposalDto, ProposalResponseDto, ReviewRequestDto, ReviewResponseDto,
    UpdateProposalDto,
};
use crate::features::proposals::lifecycle;
use crate::features::proposals::models::{Proposal, ProposalStatus, ProposalWithAuthor};
use crate::features::users::services::UserProfileService;

const PROPOSAL_COLUMNS: &str = "id, id_usuario, titulo, descricao, status, anexos, \
    email_contato_opcional, telefone_contato_opcional, telefone_contato_opcional_is_whats, \
    notas_mediador, notas_coordenador, curso, turma, semestre, professor, progresso, \
    data_inicio, data_termino_prevista, created_at, updated_at";

const JOINED_COLUMNS: &str = "p.id, p.id_usuario, p.titulo, p.descricao, p.status, p.anexos, \
    p.email_contato_opcional, p.telefone_contato_opcional, \
    p.telefone_contato_opcional_is_whats, p.notas_mediador, p.notas_coordenador, p.curso, \
    p.turma, p.semestre, p.professor, p.progresso, p.data_inicio, p.data_termino_prevista, \
    p.created_at, p.updated_at, u.nome AS autor_nome";

/// Service for the idea review surface
pub struct ProposalService {
    pool: PgPool,
    profiles: Arc<UserProfileService>,
}

impl ProposalService {
    pub fn new(pool: PgPool, profiles: Arc<UserProfileService>) -> Self {
        Self { pool, profiles }
    }

    /// Submit a new idea. Starts at `pendente`.
    ///
    /// When the submitter's profile has no phone yet, the primary contact
    /// phone fills it in; that side effect is best-effort and never fails
    /// the submission.
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: &CreateProposalDto,
    ) -> Result<ProposalResponseDto> {
        let profile = self
            .profiles
            .find_by_id(user.uid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if profile.telefone.is_empty() {
            if let Err(e) = self
                .profiles
                .set_phone_if_missing(user.uid, &dto.contact.primary_phone)
                .await
            {
                warn!("Could not backfill phone for {}: {}", user.uid, e);
            }
        }

        let attachments = Json(dto.attachments.clone().unwrap_or_default());

        let sql = format!(
            "INSERT INTO proposta (id_usuario, titulo, descricao, anexos, \
                email_contato_opcional, telefone_contato_opcional, \
                telefone_contato_opcional_is_whats) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PROPOSAL_COLUMNS}"
        );

        let proposal = sqlx::query_as::<_, Proposal>(&sql)
            .bind(user.uid)
            .bind(&dto.title)
            .bind(dto.final_description())
            .bind(attachments)
            .bind(dto.secondary_email())
            .bind(dto.secondary_phone())
            .bind(dto.secondary_phone().is_some() && dto.contact.secondary_phone_is_whatsapp)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert proposal: {:?}", e);
                AppError::Database(e)
            })?;

        info!("Proposal {} submitted by {}", proposal.id, user.uid);
        Ok(ProposalResponseDto::from_record(
            proposal,
            Some(profile.nome),
        ))
    }

    /// Single proposal with the author resolved
    pub async fn get(&self, id: Uuid) -> Result<ProposalResponseDto> {
        let sql = format!(
            "SELECT {JOINED_COLUMNS} FROM proposta p \
             LEFT JOIN usuario u ON u.id = p.id_usuario \
             WHERE p.id = $1"
        );

        let row = sqlx::query_as::<_, ProposalWithAuthor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Proposal {} not found", id)))?;

        Ok(row.into())
    }

    /// Full proposal listing for the review surface, newest first
    pub async fn list(&self) -> Result<Vec<ProposalResponseDto>> {
        let sql = format!(
            "SELECT {JOINED_COLUMNS} FROM proposta p \
             LEFT JOIN usuario u ON u.id = p.id_usuario \
             ORDER BY p.created_at DESC"
        );

        let rows = sqlx::query_as::<_, ProposalWithAuthor>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list proposals: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Raw update: optional status change plus reviewer notes.
    ///
    /// Status changes go through the lifecycle table and are written with a
    /// compare-and-swap on the expected current status, so of two racing
    /// operators exactly one wins and the other gets a 409.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        dto: &UpdateProposalDto,
    ) -> Result<ProposalResponseDto> {
        // Reviewer notes are writable by the reviewer track only, with or
        // without an accompanying status change
        if dto.mediator_notes.is_some() && !user.has_permission(Role::Mediador) {
            return Err(AppError::Forbidden(
                "Apenas mediadores podem editar as notas do mediador".to_string(),
            ));
        }
        if dto.coordinator_notes.is_some() && !user.has_permission(Role::Coordenador) {
            return Err(AppError::Forbidden(
                "Apenas coordenadores podem editar as notas do coordenador".to_string(),
            ));
        }

        let current = self.fetch(dto.id).await?;

        let proposal = match dto.status {
            Some(new_status) => {
                lifecycle::validate_transition(current.status, new_status, user.role)?;

                let sql = format!(
                    "UPDATE proposta SET status = $3, \
                        notas_mediador = COALESCE($4, notas_mediador), \
                        notas_coordenador = COALESCE($5, notas_coordenador), \
                        updated_at = NOW() \
                     WHERE id = $1 AND status = $2 \
                     RETURNING {PROPOSAL_COLUMNS}"
                );

                sqlx::query_as::<_, Proposal>(&sql)
                    .bind(dto.id)
                    .bind(current.status)
                    .bind(new_status)
                    .bind(dto.mediator_notes.as_deref())
                    .bind(dto.coordinator_notes.as_deref())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?
                    .ok_or_else(|| {
                        AppError::Conflict(
                            "A proposta foi modificada por outra operação".to_string(),
                        )
                    })?
            }
            None => {
                let sql = format!(
                    "UPDATE proposta SET \
                        notas_mediador = COALESCE($2, notas_mediador), \
                        notas_coordenador = COALESCE($3, notas_coordenador), \
                        updated_at = NOW() \
                     WHERE id = $1 \
                     RETURNING {PROPOSAL_COLUMNS}"
                );

                sqlx::query_as::<_, Proposal>(&sql)
                    .bind(dto.id)
                    .bind(dto.mediator_notes.as_deref())
                    .bind(dto.coordinator_notes.as_deref())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Proposal {} not found", dto.id))
                    })?
            }
        };

        let autor = self.author_name(proposal.id_usuario).await?;
        Ok(ProposalResponseDto::from_record(proposal, autor))
    }

    /// Review decision by a mediator. Persists the resulting status and the
    /// message as mediator notes.
    pub async fn review(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: &ReviewRequestDto,
    ) -> Result<ReviewResponseDto> {
        dto.validate().map_err(AppError::Validation)?;

        let current = self.fetch(id).await?;
        let target = dto.target_status();
        lifecycle::validate_transition(current.status, target, user.role)?;

        let sql = format!(
            "UPDATE proposta SET status = $3, \
                notas_mediador = COALESCE($4, notas_mediador), \
                updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {PROPOSAL_COLUMNS}"
        );

        let proposal = sqlx::query_as::<_, Proposal>(&sql)
            .bind(id)
            .bind(current.status)
            .bind(target)
            .bind(dto.message())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| {
                AppError::Conflict("A proposta foi modificada por outra operação".to_string())
            })?;

        info!(
            "Proposal {} reviewed by {}: {} -> {}",
            id, user.uid, current.status, proposal.status
        );

        Ok(ReviewResponseDto {
            id: proposal.id,
            status: proposal.status,
            message: dto.message().map(str::to_string),
        })
    }

    /// Direct an approved idea to a class. Only legal from `aprovada`.
    pub async fn assign(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: &AssignmentDto,
    ) -> Result<ProposalResponseDto> {
        let current = self.fetch(id).await?;
        lifecycle::validate_transition(current.status, ProposalStatus::Atribuida, user.role)?;

        let sql = format!(
            "UPDATE proposta SET status = $3, curso = $4, turma = $5, semestre = $6, \
                professor = $7, updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {PROPOSAL_COLUMNS}"
        );

        let proposal = sqlx::query_as::<_, Proposal>(&sql)
            .bind(id)
            .bind(current.status)
            .bind(ProposalStatus::Atribuida)
            .bind(&dto.curso)
            .bind(&dto.turma)
            .bind(&dto.semestre)
            .bind(&dto.professor)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| {
                AppError::Conflict("A proposta foi modificada por outra operação".to_string())
            })?;

        info!(
            "Proposal {} assigned to {}/{} by {}",
            id, dto.curso, dto.turma, user.uid
        );

        let autor = self.author_name(proposal.id_usuario).await?;
        Ok(ProposalResponseDto::from_record(proposal, autor))
    }

    async fn fetch(&self, id: Uuid) -> Result<Proposal> {
        let sql = format!("SELECT {PROPOSAL_COLUMNS} FROM proposta WHERE id = $1");

        sqlx::query_as::<_, Proposal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Proposal {} not found", id)))
    }

    async fn author_name(&self, user_id: Uuid) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT nome FROM usuario WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lazy pool: nothing connects, so a Forbidden here proves the role
    // gate runs before any query is issued.
    fn service() -> ProposalService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/fatec_conecta_test")
            .unwrap();
        ProposalService::new(pool.clone(), Arc::new(UserProfileService::new(pool)))
    }

    fn user_with_role(role: Option<Role>) -> AuthenticatedUser {
        AuthenticatedUser {
            uid: Uuid::new_v4(),
            email: "pessoa@fatec.sp.gov.br".to_string(),
            name: Some("Pessoa".to_string()),
            role,
        }
    }

    fn notes_update(mediator: Option<&str>, coordinator: Option<&str>) -> UpdateProposalDto {
        UpdateProposalDto {
            id: Uuid::new_v4(),
            status: None,
            mediator_notes: mediator.map(str::to_string),
            coordinator_notes: coordinator.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn community_user_cannot_write_mediator_notes() {
        let err = service()
            .update(
                &user_with_role(Some(Role::Comunidade)),
                &notes_update(Some("parecer alterado"), None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)), "{err}");
    }

    #[tokio::test]
    async fn mediator_cannot_write_coordinator_notes() {
        let err = service()
            .update(
                &user_with_role(Some(Role::Mediador)),
                &notes_update(None, Some("turma alterada")),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)), "{err}");
    }

    #[tokio::test]
    async fn mediator_notes_pass_the_role_gate_for_mediators() {
        // With the gate passed the lazy pool fails at the lookup instead
        let err = service()
            .update(
                &user_with_role(Some(Role::Mediador)),
                &notes_update(Some("parecer registrado"), None),
            )
            .await
            .unwrap_err();
        assert!(!matches!(err, AppError::Forbidden(_)), "{err}");
    }
}
