use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use groq_relay::connector::api::controller::ModelsController;
use groq_relay::connector::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use groq_relay::{
    serve, Commands, Container, ContainerConfig, EnvMode, GenerationParams, ServeArgs,
    DEFAULT_MODEL,
};

#[derive(Parser)]
#[command(name = "groq-relay")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// `development` turns on debug logging
    #[arg(long, global = true, env = "APP_ENV", value_enum, default_value = "production")]
    env_mode: EnvMode,

    #[arg(long, global = true, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, global = true, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, global = true, env = "GROQ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, global = true, env = "GROQ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Answer with a local echo instead of calling the upstream API
    #[arg(long, global = true)]
    mock_upstream: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose || cli.env_mode == EnvMode::Development {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {e}"),
    }

    let command = cli.command.unwrap_or(Commands::Serve(cli.serve));
    let serve_args = match &command {
        Commands::Serve(args) => Some(args.clone()),
        Commands::Models => None,
    };

    let mut config = ContainerConfig {
        api_key: cli.api_key,
        model: cli.model,
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs,
        mock_upstream: cli.mock_upstream,
        ..Default::default()
    };
    if let Some(args) = &serve_args {
        config.generation = if args.omit_generation_params {
            GenerationParams::upstream_defaults()
        } else {
            GenerationParams::new(Some(args.temperature), Some(args.max_tokens))
        };
        config.max_turns = args.max_turns;
        config.history_enabled = !args.no_history;
    }

    let container = Container::new(config)?;

    match command {
        Commands::Serve(args) => {
            if container.api_key_configured() {
                info!("GROQ_API_KEY: configured");
            } else {
                warn!("GROQ_API_KEY: not set; chat requests will fail until it is configured");
            }
            info!(
                "Relaying to model {} (history: {})",
                container.model(),
                if args.no_history { "off" } else { "on" }
            );

            let host = if args.public { "0.0.0.0" } else { "127.0.0.1" };
            let bind_addr = format!("{host}:{}", args.port);
            serve(Arc::new(container), &bind_addr).await?;
        }

        Commands::Models => {
            let output = ModelsController::new(&container).list().await?;
            println!("{output}");
        }
    }

    Ok(())
}
