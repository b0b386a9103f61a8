pub mod api;
pub mod backend;
pub mod controller;
pub mod events;
pub mod ui;
