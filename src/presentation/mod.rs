// Presentation layer - HTTP handlers and request extraction
pub mod app_state;
pub mod handlers;
pub mod upload_form;
