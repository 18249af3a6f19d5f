use serde::{Deserialize, Serialize};

/// Request body for `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userID")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
