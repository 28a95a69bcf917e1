//! Role hierarchy and permission evaluation.
//!
//! Roles form a total order; a role grants every capability required at its
//! own level or below ("at-least" semantics, not "exactly-equals"):
//!
//! comunidade(0) < estudante(1) < mediador(2) < coordenador(3) < admin(4)
//!
//! Elevated roles (everything above comunidade) may only be assigned to
//! identities whose email belongs to the institutional domain.

use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

use crate::shared::constants::INSTITUTIONAL_DOMAIN;

/// User role matching the `perfil_usuario` database enum.
/// Variant order defines the permission hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "perfil_usuario", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Comunidade,
    Estudante,
    Mediador,
    Coordenador,
    Admin,
}

impl Role {
    /// Numeric level of the role in the hierarchy
    pub fn level(self) -> u8 {
        match self {
            Role::Comunidade => 0,
            Role::Estudante => 1,
            Role::Mediador => 2,
            Role::Coordenador => 3,
            Role::Admin => 4,
        }
    }

    /// Parse a stored role string. Unknown strings yield `None`, which the
    /// permission check treats as "no permission" rather than an error.
    pub fn parse(value: &str) -> Option<Role> {
        match value.to_lowercase().as_str() {
            "comunidade" => Some(Role::Comunidade),
            "estudante" => Some(Role::Estudante),
            "mediador" => Some(Role::Mediador),
            "coordenador" => Some(Role::Coordenador),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Comunidade => "comunidade",
            Role::Estudante => "estudante",
            Role::Mediador => "mediador",
            Role::Coordenador => "coordenador",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic permission check. Total over its input: an absent role never
/// grants anything.
pub fn has_permission(role: Option<Role>, required: Role) -> bool {
    match role {
        Some(role) => role.level() >= required.level(),
        None => false,
    }
}

/// Guard used when an admin changes another identity's role: `comunidade` is
/// always assignable, everything above it requires an institutional email.
pub fn can_assign_role(target_email: &str, new_role: Role) -> bool {
    if new_role == Role::Comunidade {
        return true;
    }
    target_email
        .to_lowercase()
        .ends_with(INSTITUTIONAL_DOMAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 5] = [
        Role::Comunidade,
        Role::Estudante,
        Role::Mediador,
        Role::Coordenador,
        Role::Admin,
    ];

    #[test]
    fn hierarchy_is_monotonic() {
        for held in ALL {
            for required in ALL {
                assert_eq!(
                    has_permission(Some(held), required),
                    held.level() >= required.level(),
                    "held={held} required={required}"
                );
            }
        }
    }

    #[test]
    fn absent_role_grants_nothing() {
        for required in ALL {
            assert!(!has_permission(None, required));
        }
    }

    #[test]
    fn unknown_role_string_parses_to_none() {
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Mediador"), Some(Role::Mediador));
    }

    #[test]
    fn ord_matches_level() {
        assert!(Role::Comunidade < Role::Estudante);
        assert!(Role::Mediador < Role::Coordenador);
        assert!(Role::Coordenador < Role::Admin);
    }

    #[test]
    fn comunidade_is_assignable_to_any_email() {
        assert!(can_assign_role("alguem@gmail.com", Role::Comunidade));
        assert!(can_assign_role("", Role::Comunidade));
    }

    #[test]
    fn elevated_roles_require_institutional_email() {
        for role in [Role::Estudante, Role::Mediador, Role::Coordenador, Role::Admin] {
            assert!(!can_assign_role("alguem@gmail.com", role), "{role}");
            assert!(!can_assign_role("fatec.sp.gov.br@gmail.com", role), "{role}");
            assert!(can_assign_role("maria.santos@fatec.sp.gov.br", role), "{role}");
            assert!(can_assign_role("MARIA@FATEC.SP.GOV.BR", role), "{role}");
        }
    }
}
