//! Chat dashboard - view model

use leptos::prelude::*;

/// Local view state only; transcript and session live in the controller
#[derive(Clone, Copy)]
pub struct ChatDashboardVm {
    pub draft: RwSignal<String>,
    pub is_uploading: RwSignal<bool>,
}

impl ChatDashboardVm {
    pub fn new() -> Self {
        Self {
            draft: RwSignal::new(String::new()),
            is_uploading: RwSignal::new(false),
        }
    }
}

impl Default for ChatDashboardVm {
    fn default() -> Self {
        Self::new()
    }
}
