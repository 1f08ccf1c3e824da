//! Middleware del sistema
//!
//! Autenticación por token compartido y CORS.

pub mod auth;
pub mod cors;

pub use auth::require_api_token;
pub use cors::cors_layer;
