//! # shelf-api
//!
//! HTTP API layer for comic-shelf built on Axum.
//!
//! Provides the REST endpoints for collections and comics, the bearer-token
//! extractor, request DTOs with validation, and the middleware stack
//! (request logging, CORS, compression, timeouts).

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
