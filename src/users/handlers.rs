use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreatedUserResponse, MessageResponse, UserRequest},
        repo_types::{NewUser, User, UserChanges},
    },
};

const USER_NOT_FOUND: ApiError = ApiError::NotFound("User not found");

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_all_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
}

/// An id that is not an integer cannot match a row.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| USER_NOT_FOUND)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[instrument(skip(state))]
pub async fn get_all_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users
        .list()
        .await
        .map_err(ApiError::storage("Failed to fetch users"))?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .find(id)
        .await
        .map_err(ApiError::storage("Failed to fetch user"))?
        .ok_or(USER_NOT_FOUND)?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    const REQUIRED: ApiError = ApiError::Validation("Name and email are required");

    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "create user: unreadable body");
        ApiError::Validation("Invalid request body")
    })?;

    let (Some(name), Some(email)) = (non_empty(payload.name), non_empty(payload.email)) else {
        warn!("create user: name or email missing");
        return Err(REQUIRED);
    };

    // falsy age is stored as NULL but echoed as sent
    let new_user = NewUser {
        name,
        email,
        age: payload.age.filter(|age| *age != 0),
    };
    let id = state
        .users
        .insert(&new_user)
        .await
        .map_err(ApiError::storage("Failed to create user"))?;

    info!(user_id = id, email = %new_user.email, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            id,
            name: new_user.name,
            email: new_user.email,
            age: payload.age,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    // Full overwrite: an unreadable body writes every column as NULL.
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(e) => {
            warn!(error = %e, user_id = id, "update user: unreadable body");
            UserRequest::default()
        }
    };

    let changes = UserChanges {
        name: payload.name,
        email: payload.email,
        age: payload.age,
        updated_at: OffsetDateTime::now_utc(),
    };
    let affected = state
        .users
        .update(id, &changes)
        .await
        .map_err(ApiError::storage("Failed to update user"))?;

    if affected == 0 {
        return Err(USER_NOT_FOUND);
    }

    info!(user_id = id, "user updated");
    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let affected = state
        .users
        .delete(id)
        .await
        .map_err(ApiError::storage("Failed to delete user"))?;

    if affected == 0 {
        return Err(USER_NOT_FOUND);
    }

    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
