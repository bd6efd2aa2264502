// Presentation layer - HTTP surface
pub mod app_state;
pub mod handlers;
pub mod host_guard;
pub mod page;
pub mod router;
