use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::roles::{self, Role};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Auth provider uid, also the `usuario.id` primary key
    pub uid: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` when the token carried no role or an unrecognized one;
    /// such users hold no permissions beyond authentication itself.
    pub role: Option<Role>,
}

impl AuthenticatedUser {
    /// Monotonic "at-least" permission check over the role hierarchy
    pub fn has_permission(&self, required: Role) -> bool {
        roles::has_permission(self.role, required)
    }

    pub fn is_admin(&self) -> bool {
        self.has_permission(Role::Admin)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Anônimo")
    }
}
