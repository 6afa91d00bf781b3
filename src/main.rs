use std::process::ExitCode;

use tracing::{error, info};

use noteboard::auth::ensure_admin;
use noteboard::{Config, Database, UserRepository, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = noteboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        noteboard::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("noteboard - notes and news");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            return ExitCode::FAILURE;
        }
    };

    match ensure_admin(&UserRepository::new(db.pool()), &config.admin).await {
        Ok(Some(admin)) => info!("Administrator account: {}", admin.username),
        Ok(None) => {}
        Err(e) => {
            error!("Failed to set up administrator: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server stopped: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
