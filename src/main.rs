//! Kitlog CLI - Command-line interface for the device checkout tracker

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use kitlog::config::{self, KitlogConfig};
use kitlog::storage::SqliteStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kitlog")]
#[command(version = "0.1.0")]
#[command(about = "Device checkout/check-in tracker - HTTP/JSON record store")]
#[command(long_about = r#"
Kitlog tracks devices, staff and wards and keeps an audit trail of every
checkout and check-in.

Example usage:
  kitlog init
  kitlog serve --port 4150 --data-dir ./data
  kitlog seed --data-dir ./data
  kitlog stats --data-dir ./data
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default kitlog.toml
    Init {
        /// Path to write the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listening port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the database file (overrides config)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Insert sample records into empty tables before serving
        #[arg(long)]
        seed: bool,

        /// Delete and recreate the database file before serving (destructive)
        #[arg(long)]
        reset: bool,
    },

    /// Insert sample records into empty tables
    Seed {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the database file (overrides config)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Show row counts for the four tables
    Stats {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding the database file (overrides config)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { config, force } => {
            let path = config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &KitlogConfig::default(), force)?;
            println!("📝 Wrote default config to {:?}", path);
        }

        Commands::Serve { config, port, data_dir, seed, reset } => {
            let mut cfg = config::load_config(config.as_deref())?;
            if let Some(port) = port {
                cfg.port = port;
            }
            if let Some(data_dir) = data_dir {
                cfg.data_dir = data_dir;
            }
            if seed {
                cfg.seed_on_start = true;
            }
            if reset {
                cfg.reset_on_start = true;
            }

            if cfg.reset_on_start {
                config::reset_database(&cfg.database_path())?;
            }

            let store = open_store(&cfg)?;
            if cfg.seed_on_start && store.seed_sample_data()? {
                println!("🌱 Seeded sample records");
            }

            println!("🗄️  Database: {:?}", cfg.database_path());
            kitlog::server::start_server(cfg.port, store).await?;
        }

        Commands::Seed { config, data_dir } => {
            let mut cfg = config::load_config(config.as_deref())?;
            if let Some(data_dir) = data_dir {
                cfg.data_dir = data_dir;
            }

            let store = open_store(&cfg)?;
            if store.seed_sample_data()? {
                println!("🌱 Seeded sample records into {:?}", cfg.database_path());
            } else {
                println!("✅ Tables already populated, nothing to seed.");
            }
        }

        Commands::Stats { config, data_dir } => {
            let mut cfg = config::load_config(config.as_deref())?;
            if let Some(data_dir) = data_dir {
                cfg.data_dir = data_dir;
            }

            let store = open_store(&cfg)?;
            let stats = store.stats()?;

            println!("📊 Kitlog Statistics ({:?})", cfg.database_path());
            println!("------------------------------------");
            println!("{}", stats);
        }
    }

    Ok(())
}

fn open_store(cfg: &KitlogConfig) -> anyhow::Result<SqliteStore> {
    let db_path = cfg.database_path();
    config::ensure_data_dir(&db_path)?;
    Ok(SqliteStore::open_with_mode(&db_path, cfg.journal_mode)?)
}
