//! capital-agent HTTP Server
//!
//! Wires the country/temperature tools into an agent and serves it over
//! a small REST API.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::GeminiProvider;
use capital_agent::{
    WorldFacts,
    weather::{OpenMeteoClient, WeatherClient},
};

use crate::config::{ProviderKind, ServerConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Reference data and weather client shared by all tools
    let facts = Arc::new(WorldFacts::builtin());
    let weather = OpenMeteoClient::from_env().context("invalid weather client configuration")?;
    tracing::info!(
        endpoint = %weather.config().endpoint,
        timeout = ?weather.config().timeout,
        retries = weather.config().max_retries,
        "Weather client: {}",
        weather.name()
    );
    let weather: Arc<dyn WeatherClient> = Arc::new(weather);

    let tools = capital_agent::build_registry(facts, weather)
        .context("tool registry is misconfigured")?;

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let (provider, default_model) = build_provider(config.provider)?;

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Model provider reachable"),
        Ok(false) | Err(_) => tracing::warn!("⚠ Model provider not reachable - chat requests will fail"),
    }

    let mut agent = capital_agent::agent_config();
    agent.generation.model = config.model.clone().unwrap_or(default_model);
    agent.tool_timeout = config.tool_timeout;
    tracing::info!(agent = %agent.name, model = %agent.generation.model, "{}", agent.description);

    let state = AppState {
        provider,
        tools: Arc::new(tools),
        agent: Arc::new(agent),
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;

    tracing::info!("capital-agent running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  GET  /api/tools         - Tool descriptors");
    tracing::info!("  POST /api/tools/{{name}}  - Call a tool directly");
    tracing::info!("  POST /api/chat          - Ask the agent");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Construct the configured model provider and its default model
fn build_provider(kind: ProviderKind) -> anyhow::Result<(Arc<dyn LlmProvider>, String)> {
    match kind {
        ProviderKind::Gemini => {
            let provider = GeminiProvider::from_env().context("cannot create Gemini provider")?;
            let model = provider.default_model().to_string();
            Ok((Arc::new(provider), model))
        }
        #[cfg(feature = "ollama")]
        ProviderKind::Ollama => Ok((
            Arc::new(agent_runtime::OllamaProvider::from_env()),
            "llama3.2".into(),
        )),
        #[cfg(not(feature = "ollama"))]
        ProviderKind::Ollama => {
            anyhow::bail!("MODEL_PROVIDER=ollama requires building with the `ollama` feature")
        }
    }
}
