use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use weather_core::{Aggregator, ConfigError, Credentials, provider_set_from_credentials};

use crate::routes;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-server",
    version,
    about = "Temperature of a city from several providers"
)]
pub struct Cli {
    /// JSON file mapping provider credential keys to access tokens.
    #[arg(long, env = "WEATHER_CREDENTIALS", default_value = ".apiConfig")]
    pub credentials: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "WEATHER_LISTEN", default_value = "0.0.0.0:8081")]
    pub listen: SocketAddr,

    /// Fail a provider that takes longer than this many milliseconds.
    /// Without it, a hung provider hangs the request.
    #[arg(long, env = "WEATHER_PROVIDER_TIMEOUT_MS")]
    pub provider_timeout_ms: Option<u64>,
}

impl Cli {
    /// Load credentials and build the provider set. Runs before anything is bound.
    pub fn build_aggregator(&self) -> Result<Aggregator, ConfigError> {
        let credentials = Credentials::load(&self.credentials)?;
        let providers = provider_set_from_credentials(&credentials)?;

        Ok(match self.provider_timeout_ms {
            Some(ms) => Aggregator::with_timeout(providers, Duration::from_millis(ms)),
            None => Aggregator::new(providers),
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let aggregator = self.build_aggregator()?;

        let listener = TcpListener::bind(self.listen)
            .await
            .with_context(|| format!("Failed to bind {}", self.listen))?;

        info!(
            addr = %listener.local_addr()?,
            providers = aggregator.providers().len(),
            "weather server listening"
        );

        axum::serve(listener, routes::router(aggregator))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        info!("weather server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}
