use serde::{Deserialize, Serialize};

/// Signed-in user as kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

/// Session state: `user` is `Some` exactly when `is_authenticated` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub is_authenticated: bool,
}

/// Outcome of a login attempt. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResult {
    pub success: bool,
    pub message: String,
}

impl LoginResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: "Login successful".into(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            success: false,
            message: "Invalid username or password".into(),
        }
    }

    pub fn failed(err: &anyhow::Error) -> Self {
        Self {
            success: false,
            message: format!("Login failed: {err}"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub result: LoginResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
