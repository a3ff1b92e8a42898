use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub session_secret: String,
    pub session_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("DB_HOST", "localhost"),
            port: env_parse_or("DB_PORT", 3306),
            user: env_or("DB_USER", "vue_user"),
            password: env_or("DB_PASSWORD", "vue_password"),
            name: env_or("DB_NAME", "vue_app"),
            max_connections: env_parse_or("DB_MAX_CONNECTIONS", 10),
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            username: env_or("AUTH_USERNAME", "admin"),
            password: env_or("AUTH_PASSWORD", "admin"),
            session_secret: env_or("SESSION_SECRET", "change-me"),
            session_ttl_minutes: env_parse_or("SESSION_TTL_MINUTES", 60 * 24),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {v:?}: {e}"))?,
            Err(_) => 8080,
        };
        let auth = AuthConfig::from_env();
        if auth.session_secret == "change-me" {
            tracing::warn!("SESSION_SECRET not set; using the built-in development secret");
        }
        Ok(Self {
            host: env_or("APP_HOST", "0.0.0.0"),
            port,
            db: DbConfig::from_env(),
            auth,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
