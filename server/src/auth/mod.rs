use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profile::Profile;
use crate::repositories::ProfileRepo;
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

pub mod permissions;

/// Access-token claims issued by the managed auth backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub aud: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::AuthError("Invalid or expired session".to_string())
            })
    }
}

/// The caller identified by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

impl AuthUser {
    /// Loads the caller's profile, refusing suspended accounts.
    pub async fn profile(&self, profiles: &ProfileRepo) -> AppResult<Profile> {
        let profile = profiles
            .get_by_id(self.id)
            .await?
            .ok_or_else(|| AppError::AuthError("No profile for this account".to_string()))?;

        if profile.is_suspended() {
            return Err(AppError::Forbidden("This account is suspended".to_string()));
        }
        Ok(profile)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::AuthError("Not authenticated".to_string()))?;
        let claims = state.jwt().verify(token)?;

        Ok(AuthUser { id: claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(aud: &str, exp_offset: i64) -> (Uuid, String) {
        let sub = Uuid::new_v4();
        let claims = Claims {
            sub,
            aud: aud.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: None,
            email: Some("pro@fairway.test".to_string()),
            role: Some("authenticated".to_string()),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        (sub, token)
    }

    #[test]
    fn test_verify_valid_token() {
        let verifier = JwtVerifier::new(SECRET, "authenticated");
        let (sub, token) = token("authenticated", 3600);
        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email.as_deref(), Some("pro@fairway.test"));
    }

    #[test]
    fn test_reject_wrong_audience_and_expired() {
        let verifier = JwtVerifier::new(SECRET, "authenticated");
        let (_, wrong_aud) = token("anon", 3600);
        assert!(matches!(verifier.verify(&wrong_aud), Err(AppError::AuthError(_))));

        let (_, expired) = token("authenticated", -3600);
        assert!(verifier.verify(&expired).is_err());
    }

    #[test]
    fn test_reject_foreign_signature() {
        let verifier = JwtVerifier::new("another-secret", "authenticated");
        let (_, token) = token("authenticated", 3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));

        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Basic Zm9vOmJhcg==")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
