use std::sync::Arc;

use brainbot::assistant::ChatAssistant;
use brainbot::channels::CliChannel;
use brainbot::config::AssistantConfig;
use brainbot::error::Result;
use brainbot::llm::create_provider;
use brainbot::routes::chat_routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with the chat on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AssistantConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("  export GEMINI_API_KEY=...");
        std::process::exit(1);
    });

    let llm = create_provider(&config.llm)?;
    let assistant = Arc::new(ChatAssistant::new(llm, config.generation));

    eprintln!("🧠 BrainBot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", assistant.model_name());

    // ── HTTP API ─────────────────────────────────────────────────────────
    if let Some(port) = config.http_port {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
        let app = chat_routes(Arc::clone(&assistant));
        eprintln!("   Chat API: http://0.0.0.0:{}/api/chat", port);
        tokio::spawn(async move {
            tracing::info!(port, "Chat API server started");
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Chat API server stopped");
            }
        });
    }

    eprintln!("   Type a message and press Enter. /quit to exit.\n");

    // ── Terminal chat ────────────────────────────────────────────────────
    CliChannel::new().run(&assistant).await?;

    if config.http_port.is_some() {
        eprintln!("   Terminal chat closed; Chat API still serving. Ctrl-C to stop.");
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}
