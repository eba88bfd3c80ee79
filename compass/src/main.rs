//! Compass - Main Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use compass::service::EnrichmentService;
use compass::{config::CompassConfig, loader, server};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "compass")]
#[command(version)]
#[command(about = "Compliance enrichment service", long_about = None)]
struct Cli {
    /// Port for the HTTP server
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Path to the control catalog
    #[arg(long, default_value = "./config/catalog.yaml")]
    catalog: PathBuf,

    /// Path to the compass config file
    #[arg(long, default_value = "./config/compass.yaml")]
    config: PathBuf,

    /// Run without TLS
    #[arg(long)]
    skip_tls: bool,

    /// Log level: debug|info|warn|error
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        port = cli.port,
        catalog = %cli.catalog.display(),
        config = %cli.config.display(),
        skip_tls = cli.skip_tls,
        "starting compass service"
    );

    let scope = match loader::load_scope(&cli.catalog) {
        Ok(scope) => scope,
        Err(e) => {
            error!(path = %cli.catalog.display(), err = %e, "failed to load catalog");
            std::process::exit(1);
        }
    };

    let config = match CompassConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %cli.config.display(), err = %e, "failed to load config file");
            std::process::exit(1);
        }
    };

    let set = match loader::build_mapper_set(&config) {
        Ok(set) => set,
        Err(e) => {
            error!(err = %e, "failed to initialize plugin mappers");
            std::process::exit(1);
        }
    };

    let service = Arc::new(EnrichmentService::new(set, scope));
    let router = server::build_router(service);

    let result = if cli.skip_tls {
        warn!("insecure connections permitted; TLS is highly recommended for production");
        server::serve(router, cli.port).await
    } else {
        if config.certificate.cert.is_empty() {
            error!("invalid certificate configuration: certConfig.cert is required");
            std::process::exit(1);
        }
        if config.certificate.key.is_empty() {
            error!("invalid certificate configuration: certConfig.key is required");
            std::process::exit(1);
        }
        server::serve_tls(router, cli.port, &config.certificate).await
    };

    if let Err(e) = result {
        error!(err = %e, "server error");
        std::process::exit(1);
    }
}
