//! Web API module for Droply.
//!
//! This module exposes the file tree over a JSON REST API authenticated
//! with bearer JWTs.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
