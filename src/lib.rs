//! Astra Phoenix host: configuration, tracing, wiring and the text console.

pub mod bootstrap;
pub mod console;

use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info, warn};

use ap_app::usecases::check_backend_config;
use ap_core::config::AppConfig;

use bootstrap::tracing::init_tracing_subscriber;
use bootstrap::{load_config, resolve_config_path, run_app};

/// A missing file is an empty configuration; the readiness check reports it.
fn load_or_empty(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found");
        return Ok(AppConfig::empty());
    }
    load_config(path.to_path_buf())
}

pub fn run() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    if let Err(err) = init_tracing_subscriber() {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let config = match resolve_config_path().and_then(|path| load_or_empty(&path)) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %format!("{err:#}"), "failed to load configuration");
            eprintln!("Failed to load configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = check_backend_config(&config.backend) {
        warn!(reason = %err, "backend is not configured");
        eprintln!("{}", err.instructions());
        return ExitCode::from(2);
    }

    info!("starting Astra Phoenix");
    match run_app(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "application error");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
