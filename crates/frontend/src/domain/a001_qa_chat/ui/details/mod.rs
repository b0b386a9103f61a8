//! Chat dashboard UI module (MVVM)
//!
//! Structure:
//! - view_model.rs: ChatDashboardVm with local input state
//! - view.rs: main component ChatDashboard
//! - message_bubble.rs: one transcript entry with its confidence footer

mod message_bubble;
mod view;
mod view_model;

pub use message_bubble::MessageBubble;
pub use view::ChatDashboard;
pub use view_model::ChatDashboardVm;
