use std::future::Future;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::notifier::print::PrintNotifier;
use crate::notifier::slack::SlackNotifier;
use crate::router;

pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = if config.print_notifier {
        tracing::warn!("print notifier enabled, notifications will only be logged");
        router::router(
            PrintNotifier {},
            config.thumbnail_dir,
            config.max_body_size,
            config.export_prometheus,
        )
    } else {
        let notifier = SlackNotifier::new(config.slack_webhook_url, config.request_timeout_ms.0)
            .expect("failed to construct reqwest client for slack notifier");
        router::router(
            notifier,
            config.thumbnail_dir,
            config.max_body_size,
            config.export_prometheus,
        )
    };

    tracing::info!("listening on {:?}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
