//! Status lifecycle rules for proposals.
//!
//! Every status write in the crate goes through [`validate_transition`];
//! handlers and services never set a status directly. The edge table below
//! is the single source of truth for which transitions exist and which
//! role may take them.

use std::fmt;

use crate::core::error::AppError;
use crate::features::auth::roles::{self, Role};
use crate::features::proposals::models::ProposalStatus;

/// A status write that is not an edge of the lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: ProposalStatus,
    pub to: ProposalStatus,
    pub reason: &'static str,
}

impl TransitionError {
    fn new(from: ProposalStatus, to: ProposalStatus) -> Self {
        let reason = if from.is_terminal() {
            "status final não permite alterações"
        } else {
            "transição não permitida"
        };
        Self { from, to, reason }
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transição inválida de {} para {}: {}",
            self.from, self.to, self.reason
        )
    }
}

/// Minimum role for a transition, `None` when the edge does not exist.
///
/// Mediators own the review track; coordinators own the assignment and
/// development track. Terminal statuses have no outgoing edges, so a
/// suspended or finished project cannot be resumed.
pub fn required_role(from: ProposalStatus, to: ProposalStatus) -> Option<Role> {
    use ProposalStatus::*;

    match (from, to) {
        (Pendente, EmAnalise | Aprovada | Rejeitada | AguardandoInfo) => Some(Role::Mediador),
        (EmAnalise, Aprovada | Rejeitada | AguardandoInfo) => Some(Role::Mediador),
        (AguardandoInfo, EmAnalise) => Some(Role::Mediador),
        (Aprovada, Atribuida) => Some(Role::Coordenador),
        (Atribuida, EmDesenvolvimento) => Some(Role::Coordenador),
        (EmDesenvolvimento, Testando) => Some(Role::Coordenador),
        (Testando, Concluido | Suspenso) => Some(Role::Coordenador),
        _ => None,
    }
}

/// Check a status write against the edge table and the actor's role.
///
/// Unknown edges are a 409 (the record cannot move that way from where it
/// is); known edges taken by an under-privileged actor are a 403.
pub fn validate_transition(
    from: ProposalStatus,
    to: ProposalStatus,
    actor: Option<Role>,
) -> Result<(), AppError> {
    match required_role(from, to) {
        None => Err(AppError::Conflict(
            TransitionError::new(from, to).to_string(),
        )),
        Some(required) => {
            if roles::has_permission(actor, required) {
                Ok(())
            } else {
                Err(AppError::Forbidden(format!(
                    "Transição de {} para {} requer pelo menos o perfil {}",
                    from, to, required
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProposalStatus::*;

    const ALL: [ProposalStatus; 10] = [
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
    ];

    const EDGES: [(ProposalStatus, ProposalStatus, Role); 13] = [
        (Pendente, EmAnalise, Role::Mediador),
        (Pendente, Aprovada, Role::Mediador),
        (Pendente, Rejeitada, Role::Mediador),
        (Pendente, AguardandoInfo, Role::Mediador),
        (EmAnalise, Aprovada, Role::Mediador),
        (EmAnalise, Rejeitada, Role::Mediador),
        (EmAnalise, AguardandoInfo, Role::Mediador),
        (AguardandoInfo, EmAnalise, Role::Mediador),
        (Aprovada, Atribuida, Role::Coordenador),
        (Atribuida, EmDesenvolvimento, Role::Coordenador),
        (EmDesenvolvimento, Testando, Role::Coordenador),
        (Testando, Concluido, Role::Coordenador),
        (Testando, Suspenso, Role::Coordenador),
    ];

    /// One role level below the requirement
    fn below(role: Role) -> Role {
        match role {
            Role::Mediador => Role::Estudante,
            Role::Coordenador => Role::Mediador,
            _ => Role::Comunidade,
        }
    }

    #[test]
    fn every_edge_accepted_at_exact_required_role() {
        for (from, to, role) in EDGES {
            assert!(
                validate_transition(from, to, Some(role)).is_ok(),
                "{} -> {} should be allowed for {}",
                from,
                to,
                role
            );
        }
    }

    #[test]
    fn every_edge_accepted_for_admin() {
        for (from, to, _) in EDGES {
            assert!(validate_transition(from, to, Some(Role::Admin)).is_ok());
        }
    }

    #[test]
    fn every_edge_rejected_one_level_below() {
        for (from, to, role) in EDGES {
            let err = validate_transition(from, to, Some(below(role))).unwrap_err();
            assert!(
                matches!(err, AppError::Forbidden(_)),
                "{} -> {} below {} should be forbidden",
                from,
                to,
                role
            );
        }
    }

    #[test]
    fn edges_rejected_without_role() {
        for (from, to, _) in EDGES {
            let err = validate_transition(from, to, None).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }
    }

    #[test]
    fn every_non_edge_conflicts_even_for_admin() {
        for from in ALL {
            for to in ALL {
                if EDGES.iter().any(|&(f, t, _)| f == from && t == to) {
                    continue;
                }
                let err = validate_transition(from, to, Some(Role::Admin)).unwrap_err();
                assert!(
                    matches!(err, AppError::Conflict(_)),
                    "{} -> {} should conflict",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn assignment_requires_approved_origin() {
        let err = validate_transition(Pendente, Atribuida, Some(Role::Coordenador)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let err = validate_transition(EmAnalise, Atribuida, Some(Role::Admin)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in [Rejeitada, Concluido, Suspenso] {
            for to in ALL {
                assert!(required_role(from, to).is_none());
            }
        }
    }

    #[test]
    fn self_transition_is_not_an_edge() {
        for status in ALL {
            assert!(required_role(status, status).is_none());
        }
    }

    #[test]
    fn terminal_error_mentions_final_status() {
        let err = TransitionError::new(Concluido, EmDesenvolvimento);
        assert!(err.to_string().contains("status final"));
    }
}
