use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::dto::SessionUser;
use crate::config::AuthConfig;

const ISSUER: &str = "useradmin";

/// Payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,      // session user id
    pub username: String,
    pub email: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
}

/// HS256 keys for the "remember session" token.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self::new(&cfg.session_secret, cfg.session_ttl_minutes)
    }

    pub fn sign(&self, user: &SessionUser) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = (now + self.ttl).unix_timestamp().max(0);
        let claims = SessionClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp as usize,
            iss: ISSUER.into(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = user.id, "session token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Verifies `token` and checks it was issued for `user`.
    pub fn verify_for(&self, token: &str, user: &SessionUser) -> anyhow::Result<()> {
        let claims = self.verify(token)?;
        let issued_for = SessionUser {
            id: claims
                .sub
                .parse()
                .map_err(|_| anyhow::anyhow!("session token has a malformed subject"))?,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        };
        if &issued_for != user {
            anyhow::bail!("session token does not belong to stored user");
        }
        Ok(())
    }
}
