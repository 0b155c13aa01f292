use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use dilse::analytics::insights_from_store;
use dilse::{
    create_router, AppState, Config, JsonFileSessionStore, NatsClient, NatsGenerationService,
    NatsNarrator, NatsRecognitionBackend, SessionEngine, SessionStore, StaticProfileProvider,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dilse")]
#[command(about = "Conversational support session engine")]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/dilse")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the session HTTP API
    Serve,
    /// Print insights for the stored session history as JSON
    Insights,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config).context("Failed to load config")?;

    info!("Loaded config: {}", cfg.service.name);

    let sessions_path = shellexpand::tilde(&cfg.storage.sessions_path).to_string();
    let store: Arc<dyn SessionStore> = Arc::new(
        JsonFileSessionStore::open(&sessions_path)
            .await
            .context("Failed to open session store")?,
    );

    match cli.command {
        Command::Insights => {
            let report = insights_from_store(store.as_ref(), &Local::now()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve => serve(cfg, store).await?,
    }

    Ok(())
}

async fn serve(cfg: Config, store: Arc<dyn SessionStore>) -> Result<()> {
    if !cfg.nats.enabled {
        anyhow::bail!("serve needs a generation service: set nats.enabled = true");
    }

    let client = NatsClient::connect(&cfg.nats.url, format!("session-{}", uuid::Uuid::new_v4()))
        .await
        .context("Failed to connect to NATS")?;

    let profiles = Arc::new(StaticProfileProvider::new(cfg.profile.clone()));

    let engine = SessionEngine::builder(
        Arc::new(NatsGenerationService::new(client.clone())),
        Arc::clone(&store),
        profiles.clone(),
    )
    .config(cfg.session.clone())
    .recognizer(Arc::new(NatsRecognitionBackend::new(client.clone())))
    .narrator(Arc::new(NatsNarrator::new(client)))
    .build();

    let app = create_router(AppState::new(engine, store, profiles));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
