use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Form body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Identity snapshot carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub full_name: String,
    pub is_admin: bool,
}

/// `{"message": ...}` body used by the JSON endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
