//! Bearer-token verification.
//!
//! Tokens come from an external OpenID provider. The middleware verifies the
//! signature, turns the claims into a [`User`] and stores it in the request
//! extensions for handlers to pick up with `Extension<User>`.

use std::sync::Arc;
use anyhow::Context;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use crate::error::AppError;
use crate::models::user::User;

/// Claims read from the identity provider's access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub preferred_username: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub exp: i64,
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        User {
            id: claims.sub,
            username: claims.preferred_username,
            given_name: claims.given_name,
            family_name: claims.family_name,
        }
    }
}

pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Shared-secret (HS256) tokens.
    pub fn hs256(secret: &[u8]) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    /// Tokens signed by the provider's RSA key, given as PEM.
    pub fn rs256_pem(pem: &[u8]) -> anyhow::Result<Self> {
        let key = DecodingKey::from_rsa_pem(pem).context("Invalid RSA public key")?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    fn with_key(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        Self {
            decoding_key,
            validation,
        }
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    pub fn verify(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))?;
        Ok(data.claims.into())
    }
}

fn bearer_token<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_user<B>(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;
    let user = verifier.verify(token)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    const SECRET: &[u8] = b"test-secret";

    fn token(claims: &Claims) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn claims(exp_offset: i64) -> Claims {
        Claims {
            sub: "user-1".into(),
            preferred_username: Some("alice".into()),
            given_name: Some("Alice".into()),
            family_name: None,
            exp: OffsetDateTime::now_utc().unix_timestamp() + exp_offset,
        }
    }

    #[test]
    fn valid_token_becomes_user() {
        let user = TokenVerifier::hs256(SECRET).verify(&token(&claims(3600))).unwrap();

        assert_eq!(user.id, "user-1");
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.given_name.as_deref(), Some("Alice"));
        assert_eq!(user.family_name, None);
    }

    #[test]
    fn expired_or_foreign_tokens_are_unauthorized() {
        let verifier = TokenVerifier::hs256(SECRET);
        assert!(matches!(
            verifier.verify(&token(&claims(-3600))),
            Err(AppError::Unauthorized(_))
        ));

        let other = TokenVerifier::hs256(b"another-secret");
        assert!(matches!(
            other.verify(&token(&claims(3600))),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn bearer_prefix_is_required() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Basic abc")
            .body(())
            .unwrap();
        assert_eq!(bearer_token(&request), None);

        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def")
            .body(())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("abc.def"));
    }
}
