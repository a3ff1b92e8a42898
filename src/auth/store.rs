//! Client-side session: who is signed in, mirrored into a key-value
//! storage so it survives a reload.
//!
//! The stored user blob alone is not trusted. `initialize_auth` also
//! requires a signed session token issued for that same user.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::auth::credentials::CredentialVerifier;
use crate::auth::dto::{AuthState, LoginResult, SessionUser};
use crate::auth::token::SessionKeys;

pub const USER_KEY: &str = "user";
pub const AUTHENTICATED_KEY: &str = "isAuthenticated";
pub const TOKEN_KEY: &str = "sessionToken";

/// String key-value store with local-storage semantics.
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

pub struct AuthStore<S: SessionStorage> {
    state: AuthState,
    storage: S,
    verifier: Arc<dyn CredentialVerifier>,
    keys: SessionKeys,
}

impl<S: SessionStorage> AuthStore<S> {
    pub fn new(storage: S, verifier: Arc<dyn CredentialVerifier>, keys: SessionKeys) -> Self {
        Self {
            state: AuthState::default(),
            storage,
            verifier,
            keys,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// State is only touched once the session is fully persisted.
    pub fn login(&mut self, username: &str, password: &str) -> LoginResult {
        match self.try_login(username, password) {
            Ok(Some(user)) => {
                info!(user_id = user.id, "login successful");
                self.state = AuthState {
                    user: Some(user),
                    is_authenticated: true,
                };
                LoginResult::ok()
            }
            Ok(None) => {
                warn!("login rejected");
                LoginResult::invalid()
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                LoginResult::failed(&e)
            }
        }
    }

    fn try_login(&mut self, username: &str, password: &str) -> anyhow::Result<Option<SessionUser>> {
        let Some(user) = self.verifier.verify(username, password)? else {
            return Ok(None);
        };
        let blob = serde_json::to_string(&user).context("serialize session user")?;
        let token = self.keys.sign(&user)?;

        self.storage.set_item(USER_KEY, &blob)?;
        self.storage.set_item(AUTHENTICATED_KEY, "true")?;
        self.storage.set_item(TOKEN_KEY, &token)?;
        Ok(Some(user))
    }

    pub fn logout(&mut self) {
        self.state = AuthState::default();
        self.storage.remove_item(USER_KEY);
        self.storage.remove_item(AUTHENTICATED_KEY);
        self.storage.remove_item(TOKEN_KEY);
        info!("logged out");
    }

    /// Restores a persisted session. Anything short of a complete, signed,
    /// matching entry leaves the state as it is.
    pub fn initialize_auth(&mut self) {
        match self.restore() {
            Ok(Some(user)) => {
                debug!(user_id = user.id, "session restored");
                self.state = AuthState {
                    user: Some(user),
                    is_authenticated: true,
                };
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring persisted session"),
        }
    }

    fn restore(&self) -> anyhow::Result<Option<SessionUser>> {
        let (Some(blob), Some(flag)) = (
            self.storage.get_item(USER_KEY),
            self.storage.get_item(AUTHENTICATED_KEY),
        ) else {
            return Ok(None);
        };
        if blob.is_empty() || flag != "true" {
            return Ok(None);
        }

        let user: SessionUser = serde_json::from_str(&blob).context("parse stored user")?;
        let token = self
            .storage
            .get_item(TOKEN_KEY)
            .context("missing session token")?;
        self.keys.verify_for(&token, &user)?;
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::StaticCredentials;

    fn verifier() -> Arc<dyn CredentialVerifier> {
        Arc::new(StaticCredentials::new("admin", "admin").expect("hash"))
    }

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret", 60)
    }

    fn store(storage: MemoryStorage) -> AuthStore<MemoryStorage> {
        AuthStore::new(storage, verifier(), keys())
    }

    struct BrokenVerifier;

    impl CredentialVerifier for BrokenVerifier {
        fn verify(&self, _: &str, _: &str) -> anyhow::Result<Option<SessionUser>> {
            anyhow::bail!("identity backend unreachable")
        }
    }

    #[test]
    fn login_admin_sets_state_and_persists() {
        let mut auth = store(MemoryStorage::new());
        let result = auth.login("admin", "admin");

        assert_eq!(result, LoginResult::ok());
        assert!(auth.is_authenticated());
        let user = auth.user().expect("user set");
        assert_eq!(user.email, "admin@example.com");
        assert_eq!(user.role, "administrator");

        let storage = auth.storage();
        assert_eq!(storage.get_item(AUTHENTICATED_KEY).as_deref(), Some("true"));
        let stored: SessionUser =
            serde_json::from_str(&storage.get_item(USER_KEY).unwrap()).unwrap();
        assert_eq!(&stored, user);
        assert!(storage.get_item(TOKEN_KEY).is_some());
    }

    #[test]
    fn wrong_credentials_leave_state_anonymous() {
        let mut auth = store(MemoryStorage::new());
        let result = auth.login("x", "y");

        assert!(!result.success);
        assert_eq!(result.message, "Invalid username or password");
        assert_eq!(auth.state(), &AuthState::default());
        assert!(auth.storage().get_item(USER_KEY).is_none());
    }

    #[test]
    fn verifier_error_becomes_failure_result() {
        let mut auth = AuthStore::new(MemoryStorage::new(), Arc::new(BrokenVerifier), keys());
        let result = auth.login("admin", "admin");

        assert!(!result.success);
        assert_eq!(result.message, "Login failed: identity backend unreachable");
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn session_survives_reload() {
        let mut auth = store(MemoryStorage::new());
        assert!(auth.login("admin", "admin").success);
        let expected = auth.user().cloned();

        let mut reloaded = store(auth.into_storage());
        assert!(!reloaded.is_authenticated());
        reloaded.initialize_auth();

        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.user().cloned(), expected);
    }

    #[test]
    fn logout_clears_state_and_storage() {
        let mut auth = store(MemoryStorage::new());
        auth.login("admin", "admin");
        auth.logout();

        assert_eq!(auth.state(), &AuthState::default());
        for key in [USER_KEY, AUTHENTICATED_KEY, TOKEN_KEY] {
            assert!(auth.storage().get_item(key).is_none(), "{key} left behind");
        }

        let mut reloaded = store(auth.into_storage());
        reloaded.initialize_auth();
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn flag_must_be_literal_true() {
        let mut auth = store(MemoryStorage::new());
        auth.login("admin", "admin");
        let mut storage = auth.into_storage();
        storage.set_item(AUTHENTICATED_KEY, "TRUE").unwrap();

        let mut reloaded = store(storage);
        reloaded.initialize_auth();
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn forged_storage_without_token_is_ignored() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                USER_KEY,
                r#"{"id":1,"username":"admin","email":"admin@example.com","role":"administrator"}"#,
            )
            .unwrap();
        storage.set_item(AUTHENTICATED_KEY, "true").unwrap();

        let mut auth = store(storage);
        auth.initialize_auth();
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
    }

    #[test]
    fn tampered_user_blob_is_ignored() {
        let mut auth = store(MemoryStorage::new());
        auth.login("admin", "admin");
        let mut storage = auth.into_storage();
        storage
            .set_item(
                USER_KEY,
                r#"{"id":7,"username":"mallory","email":"m@example.com","role":"administrator"}"#,
            )
            .unwrap();

        let mut reloaded = store(storage);
        reloaded.initialize_auth();
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn role_escalation_in_storage_is_ignored() {
        let mut auth = store(MemoryStorage::new());
        auth.login("admin", "admin");
        let mut storage = auth.into_storage();
        storage
            .set_item(
                USER_KEY,
                r#"{"id":1,"username":"admin","email":"admin@example.com","role":"superuser"}"#,
            )
            .unwrap();

        let mut reloaded = store(storage);
        reloaded.initialize_auth();
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn garbage_user_blob_is_ignored() {
        let mut storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "{not json").unwrap();
        storage.set_item(AUTHENTICATED_KEY, "true").unwrap();

        let mut auth = store(storage);
        auth.initialize_auth();
        assert!(!auth.is_authenticated());
    }
}
