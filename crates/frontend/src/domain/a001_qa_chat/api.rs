//! HTTP calls of the chat screen: document upload and questions

use contracts::domain::a001_qa_chat::aggregate::{AnswerResponse, QuestionRequest};
use contracts::system::auth::ServerMessage;
use gloo_net::http::{Request, RequestBuilder, Response};
use web_sys::FormData;

use super::backend::ApiError;
use crate::shared::api_utils::{api_url, bearer};
use crate::shared::config::ApiConfig;

fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &bearer(token)),
        None => builder,
    }
}

async fn log_rejection(what: &str, response: Response) {
    let status = response.status();
    let reason = response
        .json::<ServerMessage>()
        .await
        .ok()
        .and_then(|m| m.describe().map(str::to_string));
    match reason {
        Some(reason) => log::warn!("{} rejected ({}): {}", what, status, reason),
        None => log::warn!("{} rejected ({})", what, status),
    }
}

/// Загрузить документ (multipart, поле `file`)
pub async fn upload_document(
    api: &ApiConfig,
    token: Option<&str>,
    file: &web_sys::File,
) -> Result<u16, ApiError> {
    let form_data = FormData::new().map_err(|e| ApiError::Browser(format!("{e:?}")))?;
    form_data
        .append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| ApiError::Browser(format!("{e:?}")))?;

    log::info!("Uploading {} ({} bytes)", file.name(), file.size());

    let response = with_auth(Request::post(&api_url(api, &api.upload_path)), token)
        .body(form_data)
        .map_err(|e| ApiError::Serialize(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    if !response.ok() {
        log_rejection("Upload", response).await;
    }
    Ok(status)
}

/// Отправить вопрос
pub async fn ask_question(
    api: &ApiConfig,
    token: Option<&str>,
    request: &QuestionRequest,
) -> Result<AnswerResponse, ApiError> {
    let response = with_auth(Request::post(&api_url(api, &api.question_path)), token)
        .json(request)
        .map_err(|e| ApiError::Serialize(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        log_rejection("Question", response).await;
        return Err(ApiError::Status(status));
    }

    // Any 2xx body counts as an answer; whatever can't be read is absent
    let body = response.text().await.unwrap_or_default();
    Ok(parse_answer_body(&body))
}

/// Lenient decode of a successful question response.
///
/// A body that is not JSON, or an `answer` that is not a string, yields an
/// empty answer; a `confidence` that is not a number is dropped while the
/// answer is kept.
pub fn parse_answer_body(body: &str) -> AnswerResponse {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        log::warn!("Question response is not JSON");
        return AnswerResponse::default();
    };
    AnswerResponse {
        answer: value
            .get("answer")
            .and_then(|a| a.as_str())
            .map(str::to_string),
        confidence: value.get("confidence").and_then(|c| c.as_f64()),
    }
}
