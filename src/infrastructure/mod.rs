// Infrastructure layer - External dependencies and adapters
pub mod archive;
pub mod config;
pub mod http_response;
pub mod imagemagick;
pub mod session;
pub mod swatch_catalog;
