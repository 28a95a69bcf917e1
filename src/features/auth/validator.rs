use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use super::model::AuthenticatedUser;
use super::roles::Role;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;

/// Validates HS256 access tokens issued by the hosted auth provider.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard JWT claims (exp/aud validated by the jsonwebtoken library)
    sub: String,
    #[serde(rename = "exp")]
    _exp: u64,

    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

/// Application claims the provider stores alongside the identity
#[derive(Debug, Clone, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            audience: config.audience.clone(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        let uid = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a valid uid".to_string()))?;

        let email = claims
            .email
            .ok_or_else(|| AppError::Auth("Token has no email claim".to_string()))?;

        // Unrecognized role strings become `None`: the user stays
        // authenticated but holds no role-gated permissions.
        let role = claims
            .user_metadata
            .role
            .as_deref()
            .and_then(Role::parse);

        Ok(AuthenticatedUser {
            uid,
            email,
            name: claims.user_metadata.name,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            audience: "authenticated".to_string(),
            jwt_leeway: Duration::from_secs(60),
        }
    }

    fn sign(claims: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> u64 {
        (chrono::Utc::now().timestamp() + 3600) as u64
    }

    #[test]
    fn valid_token_yields_user_with_role() {
        let uid = Uuid::new_v4();
        let token = sign(&json!({
            "sub": uid.to_string(),
            "aud": "authenticated",
            "exp": future_exp(),
            "email": "maria@fatec.sp.gov.br",
            "user_metadata": {"name": "Maria", "role": "mediador"},
        }));

        let user = JwtValidator::new(&config()).validate_token(&token).unwrap();
        assert_eq!(user.uid, uid);
        assert_eq!(user.role, Some(Role::Mediador));
        assert_eq!(user.display_name(), "Maria");
    }

    #[test]
    fn unknown_role_maps_to_none() {
        let token = sign(&json!({
            "sub": Uuid::new_v4().to_string(),
            "aud": "authenticated",
            "exp": future_exp(),
            "email": "x@y.com",
            "user_metadata": {"role": "superuser"},
        }));

        let user = JwtValidator::new(&config()).validate_token(&token).unwrap();
        assert_eq!(user.role, None);
        assert!(!user.has_permission(Role::Comunidade));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let token = sign(&json!({
            "sub": Uuid::new_v4().to_string(),
            "aud": "anon",
            "exp": future_exp(),
            "email": "x@y.com",
        }));

        assert!(JwtValidator::new(&config()).validate_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(JwtValidator::new(&config())
            .validate_token("not-a-token")
            .is_err());
    }
}
