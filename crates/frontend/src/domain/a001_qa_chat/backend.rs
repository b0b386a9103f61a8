//! Seam between the chat controller and the question-answering service

use async_trait::async_trait;
use contracts::domain::a001_qa_chat::aggregate::{AnswerResponse, QuestionRequest};
use contracts::system::auth::{LoginRequest, LoginResponse};
use thiserror::Error;

use crate::shared::config::ApiConfig;
use crate::system::auth::api as auth_api;

use super::api;

/// Ошибки обращения к бэкенду
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status code {0}")]
    Status(u16),

    #[error("Failed to serialize request: {0}")]
    Serialize(String),

    #[error("Browser API error: {0}")]
    Browser(String),
}

/// Remote question-answering service.
///
/// `token` is attached as a bearer credential when present.
#[async_trait(?Send)]
pub trait QaBackend {
    /// Whatever the host hands over as the uploaded document
    type Document;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Returns the HTTP status of the upload; `Err` only when no response arrived.
    async fn upload(&self, token: Option<&str>, document: Self::Document) -> Result<u16, ApiError>;

    async fn ask(
        &self,
        token: Option<&str>,
        request: &QuestionRequest,
    ) -> Result<AnswerResponse, ApiError>;
}

/// Backend reached over `fetch` from the browser
#[derive(Debug, Clone)]
pub struct HttpBackend {
    api: ApiConfig,
}

impl HttpBackend {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }
}

#[async_trait(?Send)]
impl QaBackend for HttpBackend {
    type Document = web_sys::File;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        auth_api::login(&self.api, request).await
    }

    async fn upload(&self, token: Option<&str>, document: web_sys::File) -> Result<u16, ApiError> {
        api::upload_document(&self.api, token, &document).await
    }

    async fn ask(
        &self,
        token: Option<&str>,
        request: &QuestionRequest,
    ) -> Result<AnswerResponse, ApiError> {
        api::ask_question(&self.api, token, request).await
    }
}
