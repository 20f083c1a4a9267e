use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

mod domain;
mod application;
mod infrastructure;

use application::errors::{AppError, ConfigError};
use application::services::{PartyParrots, SessionManager, SyncService};
use domain::entities::SlashCommand;
use infrastructure::adapters::console::ConsoleProgress;
use infrastructure::adapters::webhook::{self, WebhookState};
use infrastructure::catalog::GitHubCatalog;
use infrastructure::config::Config;
use infrastructure::mattermost::{MattermostAuthenticator, MattermostClient};

type App = PartyParrots<MattermostAuthenticator, GitHubCatalog>;

#[derive(Parser)]
#[command(name = "partyparrots-sync")]
#[command(about = "Sync Party Parrot emojis into Mattermost", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Mattermost access token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the slash command and serve its callback
    Run,
    /// Run one sync now, printing progress
    Sync,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => load_config(&cli).and_then(|config| block_on(run_server(config))),
        Commands::Sync => load_config(&cli).and_then(|config| block_on(run_sync(config))),
        Commands::Version => {
            println!("partyparrots-sync v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(token) = &cli.token {
        config.mattermost.access_token = Some(token.clone());
    }
    config.validate()?;
    Ok(config)
}

fn block_on<F: std::future::Future<Output = Result<(), AppError>>>(future: F) -> Result<(), AppError> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::Server(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(future)
}

fn build_app(config: &Config) -> App {
    PartyParrots::new(
        SessionManager::new(MattermostAuthenticator::from_config(config)),
        SyncService::new(GitHubCatalog::new(config.catalog.base_url.clone())),
    )
}

/// Everything needed to manage the slash command on the server
struct Registration {
    client: MattermostClient,
    team_id: String,
    callback_url: String,
}

impl Registration {
    fn from_config(config: &Config) -> Result<Option<Self>, AppError> {
        let (Some(token), Some(team_id), Some(callback_url)) = (
            config.access_token(),
            config.mattermost.team_id.clone(),
            config.command.callback_url.clone(),
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            client: MattermostClient::login(&config.mattermost.site_url, token)?,
            team_id,
            callback_url,
        }))
    }
}

async fn run_server(config: Config) -> Result<(), AppError> {
    tracing::info!("Activating...");
    let app: Arc<App> = Arc::new(build_app(&config));
    let command = SlashCommand::new(config.command.trigger.clone())
        .with_description(config.command.description.clone());
    let state = WebhookState::new(app.clone(), command.clone());
    state.set_token(config.command.token.clone()).await;

    // Bind before registering so the command never points at a dead URL
    let listener = TcpListener::bind(&config.server.listen)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", config.server.listen, e)))?;

    let registration = Registration::from_config(&config)?;
    match &registration {
        Some(reg) => {
            tracing::info!(site_url = %reg.client.site_url(), "Registering slash command...");
            // Drop leftovers from an unclean shutdown first
            reg.client.unregister_command(&reg.team_id, &command.trigger).await?;
            let registered = reg.client
                .register_command(&reg.team_id, &command, &reg.callback_url)
                .await?;
            tracing::debug!(command_id = %registered.id, callback_url = %reg.callback_url, "Slash command ready");
            if config.command.token.is_none() {
                state.set_token(Some(registered.token)).await;
            }
        }
        None => tracing::warn!(
            "access-token, team-id or callback-url not set; register /{} manually",
            command.trigger
        ),
    }

    // Errors are logged; the next command retries
    app.connect().await;
    if !app.sessions().is_connected().await {
        tracing::warn!("Not connected yet; the first command retries");
    }
    tracing::info!("Done.");

    webhook::serve(listener, state.clone(), shutdown_signal()).await?;

    tracing::info!("Deactivating...");
    state.abort_pending().await;
    if let Some(reg) = registration {
        tracing::info!("Unregistering slash command...");
        reg.client.unregister_command(&reg.team_id, &command.trigger).await?;
    }
    tracing::info!("Done.");
    Ok(())
}

async fn run_sync(config: Config) -> Result<(), AppError> {
    let app = build_app(&config);
    let Some(session) = app.sessions().ensure_connected().await? else {
        println!("Not configured: set mattermost.access-token in the config or MATTERMOST_TOKEN.");
        return Ok(());
    };

    let summary = app.sync().run(&session, &ConsoleProgress).await;
    println!(
        "Created {}, skipped {}, failed {} ({} categories unavailable)",
        summary.created, summary.skipped, summary.failed, summary.categories_failed
    );
    Ok(())
}

fn init_config(path: &str) -> Result<(), AppError> {
    if Path::new(path).exists() {
        return Err(ConfigError::InvalidValue(format!("{} already exists", path)).into());
    }
    std::fs::write(path, Config::default().to_yaml()?).map_err(ConfigError::from)?;
    println!("Wrote default config to {}", path);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
