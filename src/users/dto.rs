use serde::{Deserialize, Serialize};

/// Body of `POST /users` and `PUT /users/:id`. Every field may be absent;
/// the handlers decide what absence means.
#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

/// Echo of a created user. Server-side timestamps are not included.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
