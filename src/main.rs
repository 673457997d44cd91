//! Pulsecheck CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pulsecheck::cli::{commands, Cli, Commands};
use pulsecheck::domain::models::LoggingConfig;
use pulsecheck::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            std::process::exit(2);
        }
    };

    // Guard must outlive the run so buffered file logs are flushed.
    let _guard = init_tracing(&config.logging);

    let result = match cli.command {
        Commands::Run => commands::run(config).await,
        Commands::Schedule => commands::schedule(config).await,
        Commands::Validate => commands::validate(config).await,
    };

    if let Err(err) = result {
        tracing::error!(error = format!("{err:#}"), "command failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Stderr logging per the configured format, plus JSON daily-rotated files
/// when a log directory is configured. `RUST_LOG` overrides the level.
fn init_tracing(config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    let file = config.directory.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "pulsecheck.log");
        tracing_appender::non_blocking(appender)
    });

    match (config.format.as_str(), file) {
        ("json", Some((writer, guard))) => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
            Some(guard)
        }
        ("json", None) => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
            None
        }
        (_, Some((writer, guard))) => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Some(guard)
        }
        (_, None) => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}
