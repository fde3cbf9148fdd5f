use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardia::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; JSON lines so the log collector can scrape fields
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardia=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            model_dir,
            port,
            host,
            config,
            require_model,
        } => {
            cardia::cli::serve(model_dir, port, host, config, require_model).await?;
        }
        Commands::Info { model_dir } => {
            cardia::cli::info(model_dir).await?;
        }
    }

    Ok(())
}
