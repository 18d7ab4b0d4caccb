// src/routes/mod.rs
pub mod chat;
pub mod docs;

use crate::config::Environment;
use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::trace::TraceLayer;

pub fn create_router(environment: Environment) -> Router<SharedState> {
    let router = Router::new()
        .route("/", get(|| async { "YOU ARE CONNECTED" }))
        .route("/chat", post(chat_handler))
        .route("/health", get(|| async { "OK" }));

    // API description is only published while developing.
    let router = match environment {
        Environment::Development => router.merge(docs::swagger_ui()),
        Environment::Production => router,
    };

    router.layer(TraceLayer::new_for_http())
}
