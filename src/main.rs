use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use futures_util::future::join_all;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use metadims::application::ResolveDimensionsUseCase;
use metadims::infrastructure::{
    AppConfig, CliArgs, ConfigError, ConfigLoader, ProbeCache, UrlImageProbe,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

/// Loads the configuration file and applies CLI overrides.
///
/// A missing config directory or an unparsable file falls back to defaults;
/// the reason is returned so it can be logged once logging is up.
fn load_config(args: &CliArgs) -> Result<(AppConfig, Option<ConfigError>)> {
    let loaded = ConfigLoader::new().and_then(|loader| loader.load_config(args.config.as_deref()));
    let (mut config, fallback) = match loaded {
        Ok(config) => (config, None),
        Err(e @ (ConfigError::ConfigDirNotFound | ConfigError::TomlDe(_))) => {
            (AppConfig::default(), Some(e))
        }
        Err(e) => return Err(e).wrap_err("failed to load configuration"),
    };
    config.merge_with_args(args);
    Ok((config, fallback))
}

async fn read_document(path: &Path) -> Result<(String, Value)> {
    let (label, content) = if path.as_os_str() == "-" {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .wrap_err("failed to read stdin")?;
        ("<stdin>".to_string(), content)
    } else {
        let content = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        (path.display().to_string(), content)
    };

    let value = serde_json::from_str(&content)
        .wrap_err_with(|| format!("{label} is not valid JSON"))?;
    Ok((label, value))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let (config, fallback) = load_config(&args)?;
    init_logging(&config)?;

    info!(version = metadims::VERSION, "Starting {}", metadims::NAME);
    if let Some(e) = fallback {
        warn!(error = %e, "Using default configuration");
    }

    let probe = Arc::new(UrlImageProbe::new(config.probe.clone())?);
    let cache = Arc::new(ProbeCache::new(probe));
    let use_case = ResolveDimensionsUseCase::new(cache.clone(), config.logo);

    let inputs: Vec<&Path> = if args.inputs.is_empty() {
        vec![Path::new("-")]
    } else {
        args.inputs.iter().map(|p| p.as_path()).collect()
    };
    let total = inputs.len();

    let mut failed = 0usize;
    let mut labels = Vec::with_capacity(total);
    let mut values = Vec::with_capacity(total);
    for document in join_all(inputs.into_iter().map(read_document)).await {
        match document {
            Ok((label, value)) => {
                labels.push(label);
                values.push(value);
            }
            Err(e) => {
                failed += 1;
                error!(error = %format!("{e:#}"), "Skipping unreadable input");
            }
        }
    }

    let resolved = use_case.resolve_json_all(values).await;
    for (label, result) in labels.iter().zip(resolved) {
        match result {
            Ok(document) => {
                let output = if args.compact {
                    serde_json::to_string(&document)?
                } else {
                    serde_json::to_string_pretty(&document)?
                };
                println!("{output}");
            }
            Err(e) => {
                failed += 1;
                error!(input = %label, error = %e, "Failed to resolve input");
            }
        }
    }

    info!(stats = %cache.stats(), "Finished");

    if failed > 0 {
        bail!("{failed} of {total} inputs could not be resolved");
    }
    Ok(())
}
