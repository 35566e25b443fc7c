pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{compose, export, gateways, layout, markup, shortcuts};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Markup pipeline
        .route(
            "/api/v1/markup/normalize",
            post(markup::handlers::handle_normalize),
        )
        // Layout
        .route(
            "/api/v1/layout/paginate",
            post(layout::handlers::handle_paginate),
        )
        .route("/api/v1/layout/options", get(layout::handlers::handle_options))
        // Compose (chat-driven)
        .route(
            "/api/v1/compose/typeset",
            post(compose::handlers::handle_typeset),
        )
        .route("/api/v1/compose/cover", post(compose::handlers::handle_cover))
        // Upstream gateways
        .route("/api/v1/scrape", post(gateways::handlers::handle_scrape))
        .route("/api/v1/chat", post(gateways::handlers::handle_chat))
        .route(
            "/api/v1/publish/wechat",
            post(gateways::handlers::handle_publish_wechat),
        )
        .route(
            "/api/v1/publish/xiaohongshu",
            post(gateways::handlers::handle_publish_note),
        )
        // Export
        .route(
            "/api/v1/export/archive",
            post(export::handlers::handle_archive),
        )
        // Shortcuts
        .route(
            "/api/v1/shortcuts",
            get(shortcuts::handlers::handle_list).post(shortcuts::handlers::handle_upsert),
        )
        .route(
            "/api/v1/shortcuts/:id",
            delete(shortcuts::handlers::handle_delete),
        )
        .with_state(state)
}
