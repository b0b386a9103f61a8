//! Session & chat controller
//!
//! Owns the bearer token, the document-uploaded flag and the transcript, and
//! forwards user actions to a [`QaBackend`]. Views never mutate this state
//! directly: they call the operations below and re-render on [`ChatEvent`]s.
//!
//! Sending a question is a two-phase append:
//! 1. [`ChatController::prepare_question`] validates the input and appends the
//!    user's message immediately (local phase);
//! 2. [`ChatController::resolve_question`] performs the request and appends
//!    exactly one assistant message, whatever the outcome (remote phase).
//!
//! Nothing is cancelled: a completion that arrives after logout is still
//! appended, and concurrent questions are appended in arrival order.

use std::cell::RefCell;
use std::rc::Rc;

use contracts::domain::a001_qa_chat::aggregate::{ChatMessage, MessageAuthor, QuestionRequest};
use contracts::system::auth::LoginRequest;

use super::backend::QaBackend;
use super::events::{ChatEvent, EventBus, SubscriptionId};
use crate::system::auth::storage::SessionStore;

pub const UPLOAD_FIRST_ALERT: &str = "Please upload a PDF first.";
pub const EMPTY_MESSAGE_ALERT: &str = "Please enter a message.";
pub const NO_TOKEN_ALERT: &str = "Login failed. No token received.";
pub const BAD_CREDENTIALS_ALERT: &str = "Invalid email or password";

pub const UPLOAD_OK_NOTICE: &str = "File uploaded successfully!";
pub const UPLOAD_REJECTED_NOTICE: &str = "File upload failed.";
pub const UPLOAD_ERROR_NOTICE: &str = "Error uploading file.";
pub const NO_ANSWER_NOTICE: &str = "Failed to get answer from the backend.";

/// Session-level state, derived from the token and the upload flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    UploadPending,
    ReadyToChat,
}

/// Why a question was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    NoDocument,
    EmptyMessage,
}

impl SendRejection {
    pub fn alert_text(&self) -> &'static str {
        match self {
            SendRejection::NoDocument => UPLOAD_FIRST_ALERT,
            SendRejection::EmptyMessage => EMPTY_MESSAGE_ALERT,
        }
    }
}

/// A question whose user message is already in the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuestion {
    question: String,
    token: Option<String>,
}

impl PendingQuestion {
    pub fn question(&self) -> &str {
        &self.question
    }
}

#[derive(Debug, Default)]
struct ChatState {
    token: Option<String>,
    document_uploaded: bool,
    transcript: Vec<ChatMessage>,
}

struct Inner<B, S> {
    backend: B,
    store: S,
    state: RefCell<ChatState>,
    events: EventBus,
}

/// Cloneable handle; clones share state and listeners
pub struct ChatController<B, S> {
    inner: Rc<Inner<B, S>>,
}

impl<B, S> Clone for ChatController<B, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B, S> ChatController<B, S>
where
    B: QaBackend,
    S: SessionStore,
{
    /// Restores a persisted token without validating it
    pub fn new(backend: B, store: S) -> Self {
        store.init();
        let token = store.read();
        if token.is_some() {
            log::info!("Restored session from storage");
        }

        Self {
            inner: Rc::new(Inner {
                backend,
                store,
                state: RefCell::new(ChatState {
                    token,
                    ..ChatState::default()
                }),
                events: EventBus::new(),
            }),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ChatEvent) + 'static,
    {
        self.inner.events.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.events.unsubscribe(id);
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn document_uploaded(&self) -> bool {
        self.inner.state.borrow().document_uploaded
    }

    pub fn phase(&self) -> SessionPhase {
        let state = self.inner.state.borrow();
        match (&state.token, state.document_uploaded) {
            (None, _) => SessionPhase::LoggedOut,
            (Some(_), false) => SessionPhase::UploadPending,
            (Some(_), true) => SessionPhase::ReadyToChat,
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.inner.state.borrow().transcript.clone()
    }

    pub fn transcript_len(&self) -> usize {
        self.inner.state.borrow().transcript.len()
    }

    /// Confidence of the most recent answer that carried one
    pub fn latest_confidence(&self) -> Option<f64> {
        self.inner
            .state
            .borrow()
            .transcript
            .iter()
            .rev()
            .filter(|m| m.author == MessageAuthor::Assistant)
            .find_map(|m| m.confidence)
    }

    /// Returns `true` when a token was obtained and stored.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        log::info!("Logging in as {}", request.email);

        let result = self.inner.backend.login(&request).await;
        let token = match result {
            Ok(response) => match response.issued_token() {
                Some(token) => token.to_string(),
                None => {
                    log::warn!("Login response carried no token");
                    self.alert(NO_TOKEN_ALERT);
                    return false;
                }
            },
            Err(e) => {
                log::warn!("Login failed: {}", e);
                self.alert(BAD_CREDENTIALS_ALERT);
                return false;
            }
        };

        self.inner.store.write(&token);
        let had_transcript = {
            let mut state = self.inner.state.borrow_mut();
            let had_transcript = !state.transcript.is_empty();
            *state = ChatState {
                token: Some(token),
                ..ChatState::default()
            };
            had_transcript
        };

        log::info!("Login succeeded");
        self.inner.events.emit(ChatEvent::SessionChanged);
        if had_transcript {
            self.inner.events.emit(ChatEvent::TranscriptChanged);
        }
        true
    }

    /// Local reset only; the backend is not contacted.
    pub fn logout(&self) {
        self.inner.store.clear();
        let was_uploaded = {
            let mut state = self.inner.state.borrow_mut();
            let was_uploaded = state.document_uploaded;
            *state = ChatState::default();
            was_uploaded
        };

        log::info!("Logged out");
        self.inner.events.emit(ChatEvent::SessionChanged);
        if was_uploaded {
            self.inner.events.emit(ChatEvent::UploadChanged);
        }
        self.inner.events.emit(ChatEvent::TranscriptChanged);
    }

    /// Returns `true` on HTTP 200. A failure never clears an earlier success.
    pub async fn upload_document(&self, document: B::Document) -> bool {
        let token = self.token();
        let result = self.inner.backend.upload(token.as_deref(), document).await;

        match result {
            Ok(200) => {
                log::info!("Document uploaded");
                self.append(ChatMessage::notice(UPLOAD_OK_NOTICE));
                let changed = !std::mem::replace(
                    &mut self.inner.state.borrow_mut().document_uploaded,
                    true,
                );
                if changed {
                    self.inner.events.emit(ChatEvent::UploadChanged);
                }
                true
            }
            Ok(status) => {
                log::warn!("Upload answered with HTTP {}", status);
                self.append(ChatMessage::notice(UPLOAD_REJECTED_NOTICE));
                false
            }
            Err(e) => {
                log::warn!("Upload failed: {}", e);
                self.append(ChatMessage::notice(UPLOAD_ERROR_NOTICE));
                false
            }
        }
    }

    /// Local phase of a send: validate, then append the user's message.
    ///
    /// Preconditions are checked in order (document first, then text) and a
    /// rejection raises exactly one alert without touching the transcript.
    pub fn prepare_question(&self, text: &str) -> Result<PendingQuestion, SendRejection> {
        let rejection = if !self.document_uploaded() {
            Some(SendRejection::NoDocument)
        } else if text.trim().is_empty() {
            Some(SendRejection::EmptyMessage)
        } else {
            None
        };
        if let Some(rejection) = rejection {
            self.alert(rejection.alert_text());
            return Err(rejection);
        }

        self.append(ChatMessage::user(text));
        Ok(PendingQuestion {
            question: text.to_string(),
            token: self.token(),
        })
    }

    /// Remote phase of a send: always appends one assistant message.
    pub async fn resolve_question(&self, pending: PendingQuestion) {
        let request = QuestionRequest {
            question: pending.question,
        };
        let result = self
            .inner
            .backend
            .ask(pending.token.as_deref(), &request)
            .await;

        let reply = match result {
            Ok(response) => match response.answer_text() {
                Some(answer) => {
                    log::debug!("Confidence: {:?}", response.confidence);
                    ChatMessage::assistant(answer, response.confidence)
                }
                None => ChatMessage::notice(NO_ANSWER_NOTICE),
            },
            Err(e) => {
                log::warn!("Question failed: {}", e);
                ChatMessage::notice(format!("Backend error: {}", e))
            }
        };
        self.append(reply);
    }

    pub async fn send_message(&self, text: &str) -> Result<(), SendRejection> {
        let pending = self.prepare_question(text)?;
        self.resolve_question(pending).await;
        Ok(())
    }

    fn append(&self, message: ChatMessage) {
        self.inner.state.borrow_mut().transcript.push(message);
        self.inner.events.emit(ChatEvent::TranscriptChanged);
    }

    fn alert(&self, text: &str) {
        self.inner.events.emit(ChatEvent::Alert(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use contracts::domain::a001_qa_chat::aggregate::{AnswerResponse, ConfidenceLevel};
    use contracts::system::auth::LoginResponse;

    use super::*;
    use crate::domain::a001_qa_chat::api::parse_answer_body;
    use crate::domain::a001_qa_chat::backend::ApiError;
    use crate::system::auth::api::parse_login_body;
    use crate::system::auth::storage::MemorySessionStore;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Login(String, String),
        Upload(Option<String>, String),
        Ask(Option<String>, String),
    }

    /// Backend answering from queued responses
    #[derive(Default)]
    struct ScriptedBackend {
        logins: RefCell<VecDeque<Result<LoginResponse, ApiError>>>,
        uploads: RefCell<VecDeque<Result<u16, ApiError>>>,
        answers: RefCell<VecDeque<Result<AnswerResponse, ApiError>>>,
        calls: RefCell<Vec<Call>>,
    }

    impl ScriptedBackend {
        fn login_ok(self, token: &str) -> Self {
            self.logins.borrow_mut().push_back(Ok(LoginResponse {
                token: Some(token.to_string()),
            }));
            self
        }

        fn login_result(self, result: Result<LoginResponse, ApiError>) -> Self {
            self.logins.borrow_mut().push_back(result);
            self
        }

        fn upload_result(self, result: Result<u16, ApiError>) -> Self {
            self.uploads.borrow_mut().push_back(result);
            self
        }

        fn answer(self, result: Result<AnswerResponse, ApiError>) -> Self {
            self.answers.borrow_mut().push_back(result);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    fn unscripted() -> ApiError {
        ApiError::Network("unscripted".into())
    }

    #[async_trait(?Send)]
    impl QaBackend for ScriptedBackend {
        type Document = String;

        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
            self.calls.borrow_mut().push(Call::Login(
                request.email.clone(),
                request.password.clone(),
            ));
            self.logins
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }

        async fn upload(&self, token: Option<&str>, document: String) -> Result<u16, ApiError> {
            self.calls
                .borrow_mut()
                .push(Call::Upload(token.map(str::to_string), document));
            self.uploads
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }

        async fn ask(
            &self,
            token: Option<&str>,
            request: &QuestionRequest,
        ) -> Result<AnswerResponse, ApiError> {
            self.calls
                .borrow_mut()
                .push(Call::Ask(token.map(str::to_string), request.question.clone()));
            self.answers
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(unscripted()))
        }
    }

    type TestController = ChatController<ScriptedBackend, MemorySessionStore>;

    fn answer(text: &str, confidence: Option<f64>) -> AnswerResponse {
        AnswerResponse {
            answer: Some(text.to_string()),
            confidence,
        }
    }

    fn record_alerts(controller: &TestController) -> Rc<RefCell<Vec<String>>> {
        let alerts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&alerts);
        controller.subscribe(move |event| {
            if let ChatEvent::Alert(text) = event {
                sink.borrow_mut().push(text.clone());
            }
        });
        alerts
    }

    /// Logged in with "abc" and a document uploaded
    async fn ready_controller(backend: ScriptedBackend) -> (TestController, MemorySessionStore) {
        let store = MemorySessionStore::with_token("abc");
        let controller = ChatController::new(backend.upload_result(Ok(200)), store.clone());
        assert!(controller.upload_document("doc.pdf".to_string()).await);
        (controller, store)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let store = MemorySessionStore::new();
        let controller = ChatController::new(ScriptedBackend::default().login_ok("abc"), store.clone());
        let alerts = record_alerts(&controller);
        assert_eq!(controller.phase(), SessionPhase::LoggedOut);

        assert!(controller.login("a@b.com", "x").await);

        assert!(controller.is_authenticated());
        assert_eq!(controller.phase(), SessionPhase::UploadPending);
        assert_eq!(store.read().as_deref(), Some("abc"));
        assert!(alerts.borrow().is_empty());
        assert_eq!(
            controller.backend().calls(),
            vec![Call::Login("a@b.com".into(), "x".into())]
        );
    }

    #[tokio::test]
    async fn test_unsubscribed_listener_is_silent() {
        let controller = ChatController::new(
            ScriptedBackend::default().login_ok("abc"),
            MemorySessionStore::new(),
        );
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let id = controller.subscribe(move |_| counter.set(counter.get() + 1));
        controller.unsubscribe(id);

        assert!(controller.login("a@b.com", "x").await);
        controller.logout();

        assert_eq!(seen.get(), 0);
    }

    #[tokio::test]
    async fn test_login_without_token_alerts_once() {
        let store = MemorySessionStore::new();
        let backend = ScriptedBackend::default()
            .login_result(Ok(LoginResponse { token: None }))
            .login_result(Ok(LoginResponse {
                token: Some(String::new()),
            }));
        let controller = ChatController::new(backend, store.clone());
        let alerts = record_alerts(&controller);

        assert!(!controller.login("a@b.com", "x").await);
        assert_eq!(*alerts.borrow(), vec![NO_TOKEN_ALERT.to_string()]);

        assert!(!controller.login("a@b.com", "x").await);
        assert_eq!(alerts.borrow().len(), 2);

        assert!(!controller.is_authenticated());
        assert_eq!(store.read(), None);
    }

    #[tokio::test]
    async fn test_login_ok_with_unreadable_body_alerts_no_token() {
        let backend = ScriptedBackend::default()
            .login_result(Ok(parse_login_body("")))
            .login_result(Ok(parse_login_body(r#"{"user":"a@b.com"}"#)));
        let controller = ChatController::new(backend, MemorySessionStore::new());
        let alerts = record_alerts(&controller);

        assert!(!controller.login("a@b.com", "x").await);
        assert!(!controller.login("a@b.com", "x").await);

        assert_eq!(
            *alerts.borrow(),
            vec![NO_TOKEN_ALERT.to_string(), NO_TOKEN_ALERT.to_string()]
        );
    }

    #[tokio::test]
    async fn test_login_network_or_status_failure() {
        let backend = ScriptedBackend::default()
            .login_result(Err(ApiError::Status(401)))
            .login_result(Err(ApiError::Network("Failed to fetch".into())));
        let controller = ChatController::new(backend, MemorySessionStore::new());
        let alerts = record_alerts(&controller);

        assert!(!controller.login("a@b.com", "wrong").await);
        assert!(!controller.login("a@b.com", "x").await);

        assert!(!controller.is_authenticated());
        assert_eq!(
            *alerts.borrow(),
            vec![
                BAD_CREDENTIALS_ALERT.to_string(),
                BAD_CREDENTIALS_ALERT.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_restores_persisted_token() {
        let controller =
            ChatController::new(ScriptedBackend::default(), MemorySessionStore::with_token("abc"));
        assert!(controller.is_authenticated());
        assert_eq!(controller.token().as_deref(), Some("abc"));
        assert_eq!(controller.phase(), SessionPhase::UploadPending);
    }

    #[tokio::test]
    async fn test_send_before_upload_is_rejected() {
        let controller =
            ChatController::new(ScriptedBackend::default(), MemorySessionStore::with_token("abc"));
        let alerts = record_alerts(&controller);

        assert_eq!(
            controller.send_message("Hi").await,
            Err(SendRejection::NoDocument)
        );
        // document check comes before the empty-text check
        assert_eq!(
            controller.send_message("   ").await,
            Err(SendRejection::NoDocument)
        );

        assert_eq!(controller.transcript_len(), 0);
        assert!(controller.backend().calls().is_empty());
        assert_eq!(
            *alerts.borrow(),
            vec![UPLOAD_FIRST_ALERT.to_string(), UPLOAD_FIRST_ALERT.to_string()]
        );
    }

    #[tokio::test]
    async fn test_send_whitespace_is_rejected() {
        let (controller, _) = ready_controller(ScriptedBackend::default()).await;
        let alerts = record_alerts(&controller);
        let before = controller.transcript_len();

        assert_eq!(
            controller.send_message(" \t\n").await,
            Err(SendRejection::EmptyMessage)
        );

        assert_eq!(controller.transcript_len(), before);
        assert_eq!(*alerts.borrow(), vec![EMPTY_MESSAGE_ALERT.to_string()]);
        assert!(!controller
            .backend()
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Ask(..))));
    }

    #[tokio::test]
    async fn test_send_appends_answer_with_confidence() {
        let backend = ScriptedBackend::default().answer(Ok(answer("X is Y", Some(42.0))));
        let (controller, _) = ready_controller(backend).await;

        controller.send_message("What is X?").await.unwrap();

        let transcript = controller.transcript();
        let user = &transcript[transcript.len() - 2];
        assert!(user.is_user());
        assert_eq!(user.text, "What is X?");

        let last = transcript.last().unwrap();
        assert_eq!(last.author, MessageAuthor::Assistant);
        assert_eq!(last.text, "X is Y");
        assert_eq!(last.confidence, Some(42.0));
        assert_eq!(last.confidence_level(), Some(ConfidenceLevel::Low));
        assert_eq!(controller.latest_confidence(), Some(42.0));

        assert_eq!(
            controller.backend().calls().last(),
            Some(&Call::Ask(Some("abc".into()), "What is X?".into()))
        );
    }

    #[tokio::test]
    async fn test_user_message_is_appended_before_request_resolves() {
        let backend = ScriptedBackend::default().answer(Ok(answer("Hello", None)));
        let (controller, _) = ready_controller(backend).await;
        let before = controller.transcript_len();

        let pending = controller.prepare_question("Hi").unwrap();
        assert_eq!(pending.question(), "Hi");
        assert_eq!(controller.transcript_len(), before + 1);
        assert!(controller.transcript().last().unwrap().is_user());
        assert!(!controller
            .backend()
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Ask(..))));

        controller.resolve_question(pending).await;
        assert_eq!(controller.transcript_len(), before + 2);
    }

    #[tokio::test]
    async fn test_answer_absent_falls_back() {
        let backend = ScriptedBackend::default()
            .answer(Ok(AnswerResponse::default()))
            .answer(Ok(AnswerResponse {
                answer: Some(String::new()),
                confidence: Some(90.0),
            }));
        let (controller, _) = ready_controller(backend).await;

        controller.send_message("a").await.unwrap();
        assert_eq!(controller.transcript().last().unwrap().text, NO_ANSWER_NOTICE);

        controller.send_message("b").await.unwrap();
        let last = controller.transcript().last().cloned().unwrap();
        assert_eq!(last.text, NO_ANSWER_NOTICE);
        assert_eq!(last.confidence, None);
    }

    #[tokio::test]
    async fn test_ok_response_with_odd_body() {
        let backend = ScriptedBackend::default()
            .answer(Ok(parse_answer_body("")))
            .answer(Ok(parse_answer_body(r#"{"answer":"X is Y","confidence":"high"}"#)));
        let (controller, _) = ready_controller(backend).await;

        controller.send_message("a").await.unwrap();
        assert_eq!(controller.transcript().last().unwrap().text, NO_ANSWER_NOTICE);

        controller.send_message("b").await.unwrap();
        let last = controller.transcript().last().cloned().unwrap();
        assert_eq!(last.text, "X is Y");
        assert_eq!(last.confidence, None);
    }

    #[tokio::test]
    async fn test_backend_error_is_reported_in_transcript() {
        let backend = ScriptedBackend::default().answer(Err(ApiError::Status(500)));
        let (controller, _) = ready_controller(backend).await;
        let alerts = record_alerts(&controller);
        let before = controller.transcript_len();

        controller.send_message("Hi").await.unwrap();

        assert_eq!(controller.transcript_len(), before + 2);
        let last = controller.transcript().last().cloned().unwrap();
        assert_eq!(last.author, MessageAuthor::Assistant);
        assert_eq!(
            last.text,
            "Backend error: Request failed with status code 500"
        );
        assert!(alerts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_responses_append_in_arrival_order() {
        let backend = ScriptedBackend::default()
            .answer(Ok(answer("second", None)))
            .answer(Ok(answer("first", None)));
        let (controller, _) = ready_controller(backend).await;

        let first = controller.prepare_question("q1").unwrap();
        let second = controller.prepare_question("q2").unwrap();
        controller.resolve_question(second).await;
        controller.resolve_question(first).await;

        let texts: Vec<String> = controller
            .transcript()
            .into_iter()
            .skip(1)
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["q1", "q2", "second", "first"]);
    }

    #[tokio::test]
    async fn test_upload_success_is_idempotent() {
        let backend = ScriptedBackend::default()
            .upload_result(Ok(200))
            .upload_result(Ok(200));
        let controller = ChatController::new(backend, MemorySessionStore::with_token("abc"));
        let upload_events = Rc::new(Cell::new(0));
        let counter = Rc::clone(&upload_events);
        controller.subscribe(move |e| {
            if *e == ChatEvent::UploadChanged {
                counter.set(counter.get() + 1);
            }
        });

        assert!(controller.upload_document("a.pdf".into()).await);
        assert_eq!(controller.phase(), SessionPhase::ReadyToChat);
        assert!(controller.upload_document("b.pdf".into()).await);
        assert!(controller.document_uploaded());

        assert_eq!(upload_events.get(), 1);
        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript.iter().all(|m| m.text == UPLOAD_OK_NOTICE));
        assert_eq!(
            controller.backend().calls()[0],
            Call::Upload(Some("abc".into()), "a.pdf".into())
        );
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_flag() {
        let backend = ScriptedBackend::default()
            .upload_result(Ok(500))
            .upload_result(Err(ApiError::Network("offline".into())))
            .upload_result(Ok(200))
            .upload_result(Ok(400));
        let controller = ChatController::new(backend, MemorySessionStore::with_token("abc"));

        assert!(!controller.upload_document("a.pdf".into()).await);
        assert!(!controller.document_uploaded());
        assert!(!controller.upload_document("a.pdf".into()).await);
        assert!(!controller.document_uploaded());

        assert!(controller.upload_document("a.pdf".into()).await);
        assert!(!controller.upload_document("a.pdf".into()).await);
        assert!(controller.document_uploaded());

        let texts: Vec<String> = controller.transcript().into_iter().map(|m| m.text).collect();
        assert_eq!(
            texts,
            vec![
                UPLOAD_REJECTED_NOTICE,
                UPLOAD_ERROR_NOTICE,
                UPLOAD_OK_NOTICE,
                UPLOAD_REJECTED_NOTICE
            ]
        );
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let backend = ScriptedBackend::default().answer(Ok(answer("X", Some(80.0))));
        let (controller, store) = ready_controller(backend).await;
        controller.send_message("q").await.unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        controller.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        controller.logout();

        assert!(!controller.is_authenticated());
        assert_eq!(controller.phase(), SessionPhase::LoggedOut);
        assert!(!controller.document_uploaded());
        assert_eq!(controller.transcript_len(), 0);
        assert_eq!(store.read(), None);
        assert_eq!(
            *events.borrow(),
            vec![
                ChatEvent::SessionChanged,
                ChatEvent::UploadChanged,
                ChatEvent::TranscriptChanged
            ]
        );

        // logging out twice is harmless
        controller.logout();
        assert_eq!(controller.phase(), SessionPhase::LoggedOut);
    }

    #[tokio::test]
    async fn test_scenario_login_upload_ask() {
        let store = MemorySessionStore::new();
        let backend = ScriptedBackend::default()
            .login_ok("abc")
            .upload_result(Ok(200))
            .answer(Ok(answer("X is Y", Some(42.0))));
        let controller = ChatController::new(backend, store.clone());

        let transcript_events = Rc::new(Cell::new(0));
        let counter = Rc::clone(&transcript_events);
        controller.subscribe(move |e| {
            if *e == ChatEvent::TranscriptChanged {
                counter.set(counter.get() + 1);
            }
        });

        assert!(controller.login("a@b.com", "x").await);
        assert_eq!(store.read().as_deref(), Some("abc"));
        assert!(controller.upload_document("manual.pdf".into()).await);
        controller.send_message("What is X?").await.unwrap();

        let last = controller.transcript().last().cloned().unwrap();
        assert_eq!(last.text, "X is Y");
        assert_eq!(last.confidence, Some(42.0));
        // upload notice, user message, answer
        assert_eq!(transcript_events.get(), 3);
    }
}
