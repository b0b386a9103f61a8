//! Change notifications emitted by the chat controller

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// Token acquired or discarded
    SessionChanged,
    /// A message was appended or the transcript was reset
    TranscriptChanged,
    /// The document-uploaded flag flipped
    UploadChanged,
    /// Blocking user-facing notice (login failure, validation)
    Alert(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&ChatEvent)>;

/// Single-threaded listener registry
#[derive(Default)]
pub struct EventBus {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ChatEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    /// Listeners may subscribe or unsubscribe while being notified; such
    /// changes take effect from the next emission.
    pub fn emit(&self, event: ChatEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener(&event);
        }
    }
}
