//! Receive Plex webhooks and announce new library items in Slack.
use envconfig::Envconfig;
use eyre::Result;
use tokio::signal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use plexhook_api::config::Config;
use plexhook_api::server::serve;

async fn shutdown() {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");

    let mut interrupt = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .expect("failed to register SIGINT handler");

    tokio::select! {
        _ = term.recv() => {},
        _ = interrupt.recv() => {},
    };

    tracing::info!("shutting down");
}

async fn listen(config: Config) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind()).await?;

    serve(config, listener, shutdown()).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::init_from_env().expect("Invalid configuration:");

    match listen(config).await {
        Ok(_) => {}
        Err(e) => tracing::error!("failed to start plexhook http server, {}", e),
    }
}
