use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::files::dtos::AttachmentRef;
use crate::features::proposals::models::ProposalStatus;

/// Database model for a proposal. The same record backs the idea review
/// surface and the project tracking surface.
#[derive(Debug, FromRow)]
pub struct Proposal {
    pub id: Uuid,
    pub id_usuario: Uuid,
    pub titulo: String,
    pub descricao: String,
    pub status: ProposalStatus,
    pub anexos: Json<Vec<AttachmentRef>>,
    pub email_contato_opcional: Option<String>,
    pub telefone_contato_opcional: Option<String>,
    pub telefone_contato_opcional_is_whats: bool,
    pub notas_mediador: Option<String>,
    pub notas_coordenador: Option<String>,
    pub curso: Option<String>,
    pub turma: Option<String>,
    pub semestre: Option<String>,
    pub professor: Option<String>,
    pub progresso: i32,
    pub data_inicio: Option<DateTime<Utc>>,
    pub data_termino_prevista: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Proposal row joined with the submitter's name
#[derive(Debug, FromRow)]
pub struct ProposalWithAuthor {
    #[sqlx(flatten)]
    pub proposal: Proposal,
    pub autor_nome: Option<String>,
}

/// Progress note appended to a proposal in the project track
#[derive(Debug, FromRow)]
pub struct ProposalUpdate {
    pub id: Uuid,
    pub id_proposta: Uuid,
    pub mensagem: String,
    pub autor: String,
    pub created_at: DateTime<Utc>,
}
