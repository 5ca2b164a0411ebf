mod cli;

use bannerhub::banners::{start_sweep_task, BannerStorage};
use bannerhub::{config, server};
use bannerhub_db::pool::init_pool;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(host: String, port: u16, config_path: Option<&std::path::Path>) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting bannerhub server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    // Initialize database; migrations must land before the listener binds,
    // and a failure here aborts the process.
    let db_path = config.database.path.to_string_lossy().to_string();
    tracing::info!("Initializing database at {}", db_path);
    let db_pool = init_pool(&db_path).context("Database initialization failed")?;

    // Ensure the upload directory exists
    std::fs::create_dir_all(&config.storage.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory: {:?}",
            config.storage.upload_dir
        )
    })?;

    // Start the orphan sweep
    let storage = BannerStorage::new(config.storage.upload_dir.clone());
    let sweep_handle = start_sweep_task(
        db_pool.clone(),
        storage,
        config.storage.sweep_interval_secs,
        config.storage.sweep_grace_secs,
    );

    // Start HTTP server
    let server_result = server::start_server(config, db_pool).await;

    // Cleanup
    tracing::info!("Shutting down...");
    sweep_handle.abort();

    server_result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "bannerhub=trace,bannerhub_db=debug,bannerhub_common=debug,tower_http=debug".to_string()
        } else {
            "bannerhub=debug,bannerhub_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("bannerhub {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upload dir: {:?}", config.storage.upload_dir);
            println!("  Database: {:?}", config.database.path);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
