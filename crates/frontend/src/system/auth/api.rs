use contracts::system::auth::{LoginRequest, LoginResponse, ServerMessage};
use gloo_net::http::Request;

use crate::domain::a001_qa_chat::backend::ApiError;
use crate::shared::api_utils::api_url;
use crate::shared::config::ApiConfig;

/// Login with email and password
pub async fn login(api: &ApiConfig, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    let response = Request::post(&api_url(api, &api.login_path))
        .json(request)
        .map_err(|e| ApiError::Serialize(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        if let Ok(body) = response.json::<ServerMessage>().await {
            if let Some(reason) = body.describe() {
                log::warn!("Login rejected ({}): {}", status, reason);
            }
        }
        return Err(ApiError::Status(status));
    }

    // A 2xx without a readable token is reported as "no token", not as a failure
    let body = response.text().await.unwrap_or_default();
    Ok(parse_login_body(&body))
}

pub fn parse_login_body(body: &str) -> LoginResponse {
    let token = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("token").and_then(|t| t.as_str()).map(str::to_string));
    LoginResponse { token }
}
