use std::sync::Arc;

use crate::auth::{CredentialVerifier, SessionKeys, StaticCredentials};
use crate::config::AppConfig;
use crate::db::Database;
use crate::users::{MySqlUserStore, UserStore};

/// Everything a handler may touch. Built once by the hosting application.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub session_keys: SessionKeys,
}

impl AppState {
    pub fn init(config: &AppConfig, db: Database) -> anyhow::Result<Self> {
        let credentials = Arc::new(StaticCredentials::new(
            &config.auth.username,
            &config.auth.password,
        )?) as Arc<dyn CredentialVerifier>;
        let users = Arc::new(MySqlUserStore::new(db)) as Arc<dyn UserStore>;

        Ok(Self {
            users,
            credentials,
            session_keys: SessionKeys::from_config(&config.auth),
        })
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        credentials: Arc<dyn CredentialVerifier>,
        session_keys: SessionKeys,
    ) -> Self {
        Self {
            users,
            credentials,
            session_keys,
        }
    }
}
