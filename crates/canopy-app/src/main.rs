mod cli;
mod documents;
mod inspect;

use std::path::Path;
use std::process::ExitCode;

use canopy_common::{CanopyError, ConfigError};
use canopy_config::CanopyConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

fn load_config(path: Option<&Path>) -> Result<CanopyConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = canopy_config::toml_loader::load_from_path(path)?;
            canopy_config::validation::validate(&config)?;
            Ok(config)
        }
        None => canopy_config::load_config(),
    }
}

fn init_logging(args: &Args, config: Option<&CanopyConfig>) {
    let directive = args
        .log_level
        .as_deref()
        .map(|level| format!("canopy={level}"))
        .or_else(|| config.map(|c| c.logging.level.directive().to_string()))
        .unwrap_or_else(|| "canopy=info".to_string());
    let filter = match directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn validate(file: &Path) -> Result<bool, CanopyError> {
    let checked = documents::check(documents::read(file).await?);
    let mut valid = true;
    for document in &checked {
        let name = document.name.as_deref().unwrap_or("<unnamed>");
        match &document.result {
            Ok(layout) => {
                let windows: usize = layout
                    .state()
                    .map(|state| state.to_definitions().iter().map(|d| d.window_count()).sum())
                    .unwrap_or_default();
                println!("ok      #{} {name} ({windows} windows)", document.index);
            }
            Err(err) => {
                valid = false;
                println!("invalid #{} {name}: {err}", document.index);
            }
        }
    }
    tracing::info!(documents = checked.len(), valid, "validation finished");
    Ok(valid)
}

async fn inspect(config: &CanopyConfig, file: &Path, locks: bool) -> Result<bool, CanopyError> {
    let mut layouts = Vec::new();
    for document in documents::check(documents::read(file).await?) {
        layouts.push(document.result?);
    }
    for tree in inspect::inspect(config, layouts, locks).await? {
        print!("{tree}");
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    let config = load_config(args.config.as_deref());
    init_logging(&args, config.as_ref().ok());

    tracing::debug!("canopy v{} starting", env!("CARGO_PKG_VERSION"));
    let config = config.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        CanopyConfig::default()
    });

    let outcome = match &args.command {
        Command::Validate { file } => validate(file).await,
        Command::Inspect { file, locks } => inspect(&config, file, *locks).await,
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
