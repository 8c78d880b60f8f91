pub mod api;
pub mod request_guard;
pub mod ui;
