use contracts::domain::a001_qa_chat::aggregate::ChatMessage;
use leptos::prelude::*;

use super::storage::LocalStorageSessionStore;
use crate::domain::a001_qa_chat::backend::HttpBackend;
use crate::domain::a001_qa_chat::controller::ChatController;
use crate::domain::a001_qa_chat::events::{ChatEvent, SubscriptionId};
use crate::shared::config::load_config;

pub type AppController = ChatController<HttpBackend, LocalStorageSessionStore>;

/// Reactive mirror of the controller, shared through context.
///
/// Signals are refreshed from controller events only; views read them and
/// call controller operations, never write them.
#[derive(Clone, Copy)]
pub struct SessionContext {
    controller: StoredValue<AppController, LocalStorage>,
    pub authenticated: RwSignal<bool>,
    pub document_uploaded: RwSignal<bool>,
    pub messages: RwSignal<Vec<ChatMessage>>,
    pub latest_confidence: RwSignal<Option<f64>>,
    subscription: SubscriptionId,
}

impl SessionContext {
    pub fn new(controller: AppController) -> Self {
        let authenticated = RwSignal::new(controller.is_authenticated());
        let document_uploaded = RwSignal::new(controller.document_uploaded());
        let messages = RwSignal::new(controller.transcript());
        let latest_confidence = RwSignal::new(controller.latest_confidence());
        let stored = StoredValue::new_local(controller.clone());

        let subscription = controller.subscribe(move |event| {
            let controller = stored.get_value();
            match event {
                ChatEvent::SessionChanged => {
                    authenticated.set(controller.is_authenticated());
                }
                ChatEvent::UploadChanged => {
                    document_uploaded.set(controller.document_uploaded());
                }
                ChatEvent::TranscriptChanged => {
                    messages.set(controller.transcript());
                    latest_confidence.set(controller.latest_confidence());
                }
                ChatEvent::Alert(text) => show_alert(text),
            }
        });

        Self {
            controller: stored,
            authenticated,
            document_uploaded,
            messages,
            latest_confidence,
            subscription,
        }
    }

    pub fn controller(&self) -> AppController {
        self.controller.get_value()
    }

    /// Stop mirroring controller events into the signals
    pub fn unbind(&self) {
        self.controller().unsubscribe(self.subscription);
    }
}

fn show_alert(text: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(text);
    }
}

/// Session context provider component
#[component]
pub fn SessionProvider(children: ChildrenFn) -> impl IntoView {
    let config = load_config();
    let controller = ChatController::new(
        HttpBackend::new(config.api),
        LocalStorageSessionStore::new(config.session.token_key),
    );
    let ctx = SessionContext::new(controller);
    on_cleanup(move || ctx.unbind());
    provide_context(ctx);

    children()
}

/// Hook to access the session context
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionProvider not found in component tree")
}
