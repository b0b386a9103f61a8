use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Ответ на `/login`. Отсутствие `token` считается неудачным входом.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Token if the backend actually issued one (empty strings don't count)
    pub fn issued_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Error body the backend returns alongside 4xx/5xx statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn describe(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}
