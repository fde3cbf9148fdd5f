//! CLI commands

mod info;
mod serve;

pub use info::info;
pub use serve::serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Cardia - inference server for the exported heart disease classifier
#[derive(Parser)]
#[command(name = "cardia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the inference server
    Serve {
        /// Artifact directory (overrides CARDIA_MODEL_DIR and the config file)
        #[arg(long, short)]
        model_dir: Option<PathBuf>,

        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Optional YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Treat a failed artifact load at startup as fatal.
        /// By default the server starts anyway and serves 503 on /predict.
        #[arg(long)]
        require_model: bool,
    },

    /// Show artifact information
    Info {
        /// Artifact directory (overrides CARDIA_MODEL_DIR)
        #[arg(long, short)]
        model_dir: Option<PathBuf>,
    },
}
