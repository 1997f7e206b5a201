use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tactix::config::ServiceConfig;
use tactix::llm::{ImageProvider, LlmProvider, OpenAiClient};
use tactix::marketing::{self, MarketingService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(config.log_dir.as_deref());

    eprintln!("🚀 Tactix v{}", env!("CARGO_PKG_VERSION"));
    let image_model = if config.images_enabled {
        config.image_model.as_str()
    } else {
        "disabled"
    };
    eprintln!("   Model: {} (images: {})", config.model, image_model);
    eprintln!("   API: http://0.0.0.0:{}/functions/v1/", config.port);

    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; every generation request will fail with 500");
    }

    let client = Arc::new(OpenAiClient::new(&config));
    let llm: Arc<dyn LlmProvider> = client.clone();
    let images: Option<Arc<dyn ImageProvider>> = if config.images_enabled {
        Some(client as Arc<dyn ImageProvider>)
    } else {
        None
    };

    let service = Arc::new(MarketingService::new(llm, images));
    let app = marketing::app(service, Arc::new(config.origins.clone()));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Tactix server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Tactix server stopped");
    Ok(())
}

/// Stderr logging, plus a daily rolling file when `log_dir` is set.
fn init_tracing(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tactix.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
