use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::notifier::Notifier;
use crate::prometheus::{track_metrics, with_metrics_route};
use crate::webhook;

#[derive(Clone)]
pub struct State {
    pub notifier: Arc<dyn Notifier + Send + Sync>,
    pub thumbnail_dir: Option<Arc<Path>>,
}

async fn index() -> &'static str {
    "plexhook api"
}

pub fn router<N: Notifier + Send + Sync + 'static>(
    notifier: N,
    thumbnail_dir: Option<PathBuf>,
    max_body_size: usize,
    metrics: bool,
) -> Router {
    let state = State {
        notifier: Arc::new(notifier),
        thumbnail_dir: thumbnail_dir.map(Arc::from),
    };

    // Plex posts from the server itself, but the webhook has always answered any origin.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    let router = Router::new()
        .route("/", get(index))
        .route("/_readiness", get(index))
        .route("/_liveness", get(index)) // No async loop to check, just axum health
        .route("/webhook", post(webhook::post))
        .route("/webhook/", post(webhook::post))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state);

    // Installing a global recorder when used as a library (during tests etc)
    // does not work well.
    if metrics {
        with_metrics_route(router)
    } else {
        router
    }
}
