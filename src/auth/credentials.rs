use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

use crate::auth::dto::SessionUser;

/// Checks a username/password pair against some credential source.
///
/// `Ok(None)` is a plain mismatch; `Err` means the check itself broke.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> anyhow::Result<Option<SessionUser>>;
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Single configured account. The password is only kept as an argon2 hash.
pub struct StaticCredentials {
    user: SessionUser,
    password_hash: String,
}

impl StaticCredentials {
    pub fn new(username: &str, password: &str) -> anyhow::Result<Self> {
        Ok(Self::with_hash(username, hash_password(password)?))
    }

    pub fn with_hash(username: &str, password_hash: String) -> Self {
        Self {
            user: SessionUser {
                id: 1,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                role: "administrator".into(),
            },
            password_hash,
        }
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> anyhow::Result<Option<SessionUser>> {
        if username != self.user.username {
            debug!("unknown username");
            return Ok(None);
        }
        if !verify_password(password, &self.password_hash)? {
            debug!(username, "password mismatch");
            return Ok(None);
        }
        Ok(Some(self.user.clone()))
    }
}
