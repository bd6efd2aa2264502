// Infrastructure layer - Configuration, templating and HTTP adapters
pub mod config;
pub mod http_response;
pub mod template;
