use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Lifecycle status of a proposal.
///
/// The review track (`pendente` through `aguardando_info`) belongs to
/// mediators; the project track (`atribuida` onwards) belongs to
/// coordinators. Serialized with the canonical Portuguese labels both on
/// the wire and in Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "status_proposta", rename_all = "snake_case")]
pub enum ProposalStatus {
    Pendente,
    EmAnalise,
    Aprovada,
    Rejeitada,
    AguardandoInfo,
    Atribuida,
    EmDesenvolvimento,
    Testando,
    Concluido,
    Suspenso,
}

/// Statuses shown on the project tracking surface
pub const PROJECT_TRACK: &[ProposalStatus] = &[
    ProposalStatus::Atribuida,
    ProposalStatus::EmDesenvolvimento,
    ProposalStatus::Testando,
    ProposalStatus::Concluido,
    ProposalStatus::Suspenso,
];

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::EmAnalise => "em_analise",
            Self::Aprovada => "aprovada",
            Self::Rejeitada => "rejeitada",
            Self::AguardandoInfo => "aguardando_info",
            Self::Atribuida => "atribuida",
            Self::EmDesenvolvimento => "em_desenvolvimento",
            Self::Testando => "testando",
            Self::Concluido => "concluido",
            Self::Suspenso => "suspenso",
        }
    }

    /// Parse a wire label; unknown strings yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pendente" => Some(Self::Pendente),
            "em_analise" => Some(Self::EmAnalise),
            "aprovada" => Some(Self::Aprovada),
            "rejeitada" => Some(Self::Rejeitada),
            "aguardando_info" => Some(Self::AguardandoInfo),
            "atribuida" => Some(Self::Atribuida),
            "em_desenvolvimento" => Some(Self::EmDesenvolvimento),
            "testando" => Some(Self::Testando),
            "concluido" => Some(Self::Concluido),
            "suspenso" => Some(Self::Suspenso),
            _ => None,
        }
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejeitada | Self::Concluido | Self::Suspenso)
    }

    pub fn is_project_track(&self) -> bool {
        PROJECT_TRACK.contains(self)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parse() {
        for status in [
            ProposalStatus::Pendente,
            ProposalStatus::EmAnalise,
            ProposalStatus::Aprovada,
            ProposalStatus::Rejeitada,
            ProposalStatus::AguardandoInfo,
            ProposalStatus::Atribuida,
            ProposalStatus::EmDesenvolvimento,
            ProposalStatus::Testando,
            ProposalStatus::Concluido,
            ProposalStatus::Suspenso,
        ] {
            assert_eq!(ProposalStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(ProposalStatus::parse("arquivada"), None);
        assert_eq!(ProposalStatus::parse(""), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(ProposalStatus::Rejeitada.is_terminal());
        assert!(ProposalStatus::Concluido.is_terminal());
        assert!(ProposalStatus::Suspenso.is_terminal());
        assert!(!ProposalStatus::Pendente.is_terminal());
        assert!(!ProposalStatus::Testando.is_terminal());
    }

    #[test]
    fn project_track_membership() {
        assert!(ProposalStatus::Atribuida.is_project_track());
        assert!(ProposalStatus::Concluido.is_project_track());
        assert!(!ProposalStatus::Pendente.is_project_track());
        assert!(!ProposalStatus::Aprovada.is_project_track());
    }
}
