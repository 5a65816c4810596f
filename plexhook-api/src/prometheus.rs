use std::future::ready;
use std::time::Instant;

use axum::{
    body::Body, extract::MatchedPath, http::Request, middleware::Next, response::IntoResponse,
    routing::get, Router,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

const REQUEST_SECONDS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

// Slack usually answers within a second; the tail is capped by REQUEST_TIMEOUT_MS.
const NOTIFICATION_SECONDS: &[f64] = &[0.05, 0.1, 0.2, 0.35, 0.5, 0.75, 1.0, 2.0, 5.0, 10.0];

pub fn setup_metrics_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .set_buckets(REQUEST_SECONDS)
        .and_then(|builder| {
            builder.set_buckets_for_metric(
                Matcher::Full("plexhook_notification_duration_seconds".to_owned()),
                NOTIFICATION_SECONDS,
            )
        })
        .expect("invalid histogram buckets")
        .install_recorder()
        .expect("failed to install prometheus recorder")
}

/// Install the global recorder and expose it on `/metrics`.
pub fn with_metrics_route(router: Router) -> Router {
    let handle = setup_metrics_recorder();
    router.route("/metrics", get(move || ready(handle.render())))
}

/// Route template of a matched request, the raw path otherwise.
fn route_label(req: &Request<Body>) -> String {
    match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    }
}

/// Count and time every request by method, route and status.
pub async fn track_metrics(req: Request<Body>, next: Next) -> impl IntoResponse {
    let start = Instant::now();
    let path = route_label(&req);
    let method = req.method().to_string();

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("path", path),
        ("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_requests_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());

    response
}
