//! HTTP surface of the like service.
//!
//! ## Structure
//!
//! - [`handler`] - `/like` entry point (`LikeService`).
//! - [`router`] - wires the handlers, CORS and request tracing together.

pub mod handler;

use crate::server::{credentials::CredentialSource, dispatch::Executor};
use axum::{Router, http::Method, routing::get};
use handler::{LikeService, like_handler};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the application router around `service`.
pub fn router<S, E>(service: LikeService<S, E>) -> Router
where
    S: CredentialSource,
    E: Executor,
{
    Router::new()
        .route("/like", get(like_handler::<S, E>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        )
        .with_state(Arc::new(service))
}

async fn health() -> &'static str {
    "ok"
}
