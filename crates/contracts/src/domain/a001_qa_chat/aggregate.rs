use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Порог уверенности: ответы ниже него выделяются как ненадёжные
pub const CONFIDENCE_THRESHOLD: f64 = 70.0;

/// Автор сообщения в транскрипте
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageAuthor {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score < CONFIDENCE_THRESHOLD {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::High
        }
    }
}

/// Сообщение транскрипта. После создания не изменяется.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub author: MessageAuthor,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(author: MessageAuthor, text: String, confidence: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author,
            confidence,
            created_at: Utc::now(),
        }
    }

    /// Создать сообщение пользователя
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageAuthor::User, text.into(), None)
    }

    /// Создать ответ ассистента
    pub fn assistant(text: impl Into<String>, confidence: Option<f64>) -> Self {
        Self::new(MessageAuthor::Assistant, text.into(), confidence)
    }

    /// Status line from the client itself (upload results, errors)
    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(MessageAuthor::Assistant, text.into(), None)
    }

    pub fn is_user(&self) -> bool {
        self.author == MessageAuthor::User
    }

    pub fn confidence_level(&self) -> Option<ConfidenceLevel> {
        self.confidence.map(ConfidenceLevel::from_score)
    }
}

/// Body of the question endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// Ответ на вопрос. Без `answer` ответ считается пустым.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl AnswerResponse {
    pub fn answer_text(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }
}
