use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::{LoginRequest, LoginResponse, LoginResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Checks credentials and hands out a signed session token.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> (StatusCode, Json<LoginResponse>) {
    let failure = |status: StatusCode, result: LoginResult| {
        (
            status,
            Json(LoginResponse {
                result,
                user: None,
                token: None,
            }),
        )
    };

    let user = match state.credentials.verify(&payload.username, &payload.password) {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("login invalid credentials");
            return failure(StatusCode::UNAUTHORIZED, LoginResult::invalid());
        }
        Err(e) => {
            error!(error = %e, "credential check failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, LoginResult::failed(&e));
        }
    };

    let token = match state.session_keys.sign(&user) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "session token sign failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, LoginResult::failed(&e));
        }
    };

    info!(user_id = user.id, "user logged in");
    (
        StatusCode::OK,
        Json(LoginResponse {
            result: LoginResult::ok(),
            user: Some(user),
            token: Some(token),
        }),
    )
}
