use std::sync::Arc;

use anyhow::Context;

use inbox_triage::api::{AppState, router};
use inbox_triage::config::AppConfig;
use inbox_triage::llm::create_provider;
use inbox_triage::pipeline::EmailAnalyzer;
use inbox_triage::reply::{ReplyComposer, SystemEntropy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Remote generation is optional; a broken provider means template-only
    let llm = match &config.llm {
        Some(llm_config) => match create_provider(llm_config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!(error = %e, "LLM provider unavailable, using templates only");
                None
            }
        },
        None => {
            tracing::info!("No LLM credentials configured, using templates only");
            None
        }
    };

    let composer = ReplyComposer::new(llm, config.remote.clone(), Box::new(SystemEntropy));

    eprintln!("📬 Inbox Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Replies: {}", composer.backend_name());
    eprintln!("   API: http://0.0.0.0:{}/api", config.port);

    let state = AppState {
        analyzer: Arc::new(EmailAnalyzer::new(composer)),
        limits: config.limits,
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "HTTP server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
