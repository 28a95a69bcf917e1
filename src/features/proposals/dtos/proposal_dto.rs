use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::files::dtos::AttachmentRef;
use crate::features::proposals::models::{Proposal, ProposalStatus, ProposalWithAuthor};

/// Contact block submitted with an idea
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    #[validate(email(message = "Email principal inválido"))]
    pub primary_email: String,

    #[validate(email(message = "Email opcional inválido"))]
    pub secondary_email: Option<String>,

    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Telefone deve ter 10 ou 11 dígitos numéricos"
    ))]
    pub primary_phone: String,

    #[validate(regex(
        path = *crate::shared::validation::PHONE_REGEX,
        message = "Telefone deve ter 10 ou 11 dígitos numéricos"
    ))]
    pub secondary_phone: Option<String>,

    pub details: Option<String>,

    #[serde(default)]
    pub primary_phone_is_whatsapp: bool,

    #[serde(default)]
    pub secondary_phone_is_whatsapp: bool,
}

/// Request DTO for idea submission (POST /api/ideias-simples)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalDto {
    #[validate(length(min = 1, max = 200, message = "Título é obrigatório"))]
    pub title: String,

    #[validate(length(min = 1, message = "Descrição é obrigatória"))]
    pub description: String,

    #[validate(length(max = 5, message = "Máximo de 5 anexos"))]
    pub attachments: Option<Vec<AttachmentRef>>,

    #[validate(nested)]
    pub contact: ContactDto,
}

impl CreateProposalDto {
    /// Final description with the free-form contact details appended,
    /// the way the idea is stored
    pub fn final_description(&self) -> String {
        match self.contact.details.as_deref().map(str::trim) {
            Some(details) if !details.is_empty() => {
                format!(
                    "{}\n\nInformações de contato:\n{}",
                    self.description, details
                )
            }
            _ => self.description.clone(),
        }
    }

    pub fn secondary_email(&self) -> Option<&str> {
        self.contact
            .secondary_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn secondary_phone(&self) -> Option<&str> {
        self.contact
            .secondary_phone
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Request DTO for the raw idea update (PUT /api/ideias-simples)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProposalDto {
    pub id: Uuid,
    pub status: Option<ProposalStatus>,
    pub mediator_notes: Option<String>,
    pub coordinator_notes: Option<String>,
}

/// Review decision taken by a mediator.
///
/// Tagged union on `action`; the message requirement depends on the
/// action taken.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReviewRequestDto {
    Approve { message: Option<String> },
    Reject { message: String },
    RequestInfo { message: String },
}

impl ReviewRequestDto {
    /// Per-action message rules: rejection needs a motive, an information
    /// request needs a description, approval may stay silent.
    pub fn validate(&self) -> Result<(), String> {
        let (message, min, error) = match self {
            Self::Approve { message } => match message.as_deref().map(str::trim) {
                None => return Ok(()),
                Some(m) => (m, 0, ""),
            },
            Self::Reject { message } => (
                message.trim(),
                5,
                "Explique o motivo da rejeição (mín. 5 caracteres)",
            ),
            Self::RequestInfo { message } => (
                message.trim(),
                10,
                "Descreva as informações solicitadas (mín. 10 caracteres)",
            ),
        };

        if message.len() < min {
            return Err(error.to_string());
        }
        if message.len() > 500 {
            return Err("Mensagem deve ter no máximo 500 caracteres".to_string());
        }
        Ok(())
    }

    /// Status the reviewed proposal moves to
    pub fn target_status(&self) -> ProposalStatus {
        match self {
            Self::Approve { .. } => ProposalStatus::Aprovada,
            Self::Reject { .. } => ProposalStatus::Rejeitada,
            Self::RequestInfo { .. } => ProposalStatus::AguardandoInfo,
        }
    }

    pub fn message(&self) -> Option<&str> {
        let message = match self {
            Self::Approve { message } => message.as_deref()?,
            Self::Reject { message } | Self::RequestInfo { message } => message,
        };
        let trimmed = message.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Request DTO for directing an approved idea to a class
/// (POST /api/ideias-simples/{id}/assign)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignmentDto {
    #[validate(length(min = 1, max = 128, message = "Curso é obrigatório"))]
    pub curso: String,

    #[validate(length(min = 1, max = 64, message = "Turma é obrigatória"))]
    pub turma: String,

    #[validate(length(min = 1, max = 32, message = "Semestre é obrigatório"))]
    pub semestre: String,

    #[validate(length(min = 1, max = 128, message = "Professor é obrigatório"))]
    pub professor: String,
}

/// Full proposal record plus the resolved author name
#[derive(Debug, Serialize, ToSchema)]
pub struct ProposalResponseDto {
    pub id: Uuid,
    pub id_usuario: Uuid,
    pub titulo: String,
    pub descricao: String,
    pub status: ProposalStatus,
    pub anexos: Vec<AttachmentRef>,
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
    pub autor: String,
}

impl ProposalResponseDto {
    pub fn from_record(proposal: Proposal, autor: Option<String>) -> Self {
        Self {
            id: proposal.id,
            id_usuario: proposal.id_usuario,
            titulo: proposal.titulo,
            descricao: proposal.descricao,
            status: proposal.status,
            anexos: proposal.anexos.0,
            email_contato_opcional: proposal.email_contato_opcional,
            telefone_contato_opcional: proposal.telefone_contato_opcional,
            telefone_contato_opcional_is_whats: proposal.telefone_contato_opcional_is_whats,
            notas_mediador: proposal.notas_mediador,
            notas_coordenador: proposal.notas_coordenador,
            curso: proposal.curso,
            turma: proposal.turma,
            semestre: proposal.semestre,
            professor: proposal.professor,
            progresso: proposal.progresso,
            data_inicio: proposal.data_inicio,
            data_termino_prevista: proposal.data_termino_prevista,
            created_at: proposal.created_at,
            updated_at: proposal.updated_at,
            autor: autor.unwrap_or_else(|| "Anônimo".to_string()),
        }
    }
}

impl From<ProposalWithAuthor> for ProposalResponseDto {
    fn from(row: ProposalWithAuthor) -> Self {
        Self::from_record(row.proposal, row.autor_nome)
    }
}

/// Response for the review endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub status: ProposalStatus,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactDto {
        ContactDto {
            primary_email: "maria@example.com".to_string(),
            secondary_email: None,
            primary_phone: "11987654321".to_string(),
            secondary_phone: None,
            details: None,
            primary_phone_is_whatsapp: false,
            secondary_phone_is_whatsapp: false,
        }
    }

    fn create_dto() -> CreateProposalDto {
        CreateProposalDto {
            title: "Horta comunitária".to_string(),
            description: "Projeto de educação ambiental".to_string(),
            attachments: None,
            contact: contact(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut dto = create_dto();
        dto.title = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn empty_description_is_rejected() {
        let mut dto = create_dto();
        dto.description = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut dto = create_dto();
        dto.contact.primary_phone = "123456789".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn malformed_primary_email_is_rejected() {
        let mut dto = create_dto();
        dto.contact.primary_email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn secondary_fields_only_checked_when_present() {
        let mut dto = create_dto();
        dto.contact.secondary_email = None;
        dto.contact.secondary_phone = None;
        assert!(dto.validate().is_ok());

        dto.contact.secondary_phone = Some("123".to_string());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn more_than_five_attachments_rejected() {
        let attachment = AttachmentRef {
            key: "public/propostas/u/1-a.pdf".to_string(),
            name: "a.pdf".to_string(),
            size: 100,
            content_type: "application/pdf".to_string(),
            url: "http://localhost:9000/anexos/a.pdf".to_string(),
            uploaded_at: Utc::now(),
        };
        let mut dto = create_dto();
        dto.attachments = Some(vec![attachment; 6]);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn contact_details_appended_to_description() {
        let mut dto = create_dto();
        dto.contact.details = Some("Falar com a Maria".to_string());
        let text = dto.final_description();
        assert!(text.starts_with("Projeto de educação ambiental"));
        assert!(text.contains("Informações de contato:\nFalar com a Maria"));
    }

    #[test]
    fn blank_contact_details_leave_description_alone() {
        let mut dto = create_dto();
        dto.contact.details = Some("   ".to_string());
        assert_eq!(dto.final_description(), dto.description);
    }

    #[test]
    fn approve_without_message_is_valid() {
        let dto = ReviewRequestDto::Approve { message: None };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.target_status(), ProposalStatus::Aprovada);
    }

    #[test]
    fn reject_needs_at_least_five_chars() {
        let dto = ReviewRequestDto::Reject {
            message: "ruim".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = ReviewRequestDto::Reject {
            message: "Fora do escopo".to_string(),
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.target_status(), ProposalStatus::Rejeitada);
    }

    #[test]
    fn request_info_needs_at_least_ten_chars() {
        let dto = ReviewRequestDto::RequestInfo {
            message: "detalhes?".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = ReviewRequestDto::RequestInfo {
            message: "Qual o orçamento previsto?".to_string(),
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.target_status(), ProposalStatus::AguardandoInfo);
    }

    #[test]
    fn review_message_is_length_capped() {
        let dto = ReviewRequestDto::Reject {
            message: "x".repeat(501),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn review_message_is_trimmed() {
        let dto = ReviewRequestDto::Reject {
            message: "  Fora do escopo  ".to_string(),
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.message(), Some("Fora do escopo"));
    }

    #[test]
    fn review_action_tag_deserializes() {
        let dto: ReviewRequestDto =
            serde_json::from_str(r#"{"action":"request_info","message":"Qual o local exato?"}"#)
                .unwrap();
        assert!(matches!(dto, ReviewRequestDto::RequestInfo { .. }));

        let err = serde_json::from_str::<ReviewRequestDto>(r#"{"action":"archive"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn assignment_requires_every_field() {
        let dto = AssignmentDto {
            curso: "ADS".to_string(),
            turma: "B".to_string(),
            semestre: "4".to_string(),
            professor: "Prof. Silva".to_string(),
        };
        assert!(dto.validate().is_ok());

        let dto = AssignmentDto {
            curso: String::new(),
            turma: "B".to_string(),
            semestre: "4".to_string(),
            professor: "Prof. Silva".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
