//! Concurrent fan-out of one city query to every provider, and fan-in of
//! their answers.
//!
//! Each call spawns one task per provider and collects outcomes over a
//! channel created for that call alone. The first failure ends the call:
//! readings already received are discarded and providers still running are
//! aborted. The returned readings are in completion order, which is not
//! stable between calls.

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    error::{AggregateError, ProviderError, ProviderErrorKind},
    model::Reading,
    provider::{ProviderSet, WeatherProvider},
};

#[derive(Debug, Clone)]
pub struct Aggregator {
    providers: Arc<[Arc<dyn WeatherProvider>]>,
    timeout: Option<Duration>,
}

impl Aggregator {
    /// Aggregator without a per-provider timeout: a hung provider hangs the
    /// call unless another one fails first.
    pub fn new(providers: ProviderSet) -> Self {
        Self {
            providers: providers.into(),
            timeout: None,
        }
    }

    /// Aggregator that fails any provider taking longer than `timeout`.
    pub fn with_timeout(providers: ProviderSet, timeout: Duration) -> Self {
        Self {
            providers: providers.into(),
            timeout: Some(timeout),
        }
    }

    pub fn providers(&self) -> &[Arc<dyn WeatherProvider>] {
        &self.providers
    }

    /// Query every provider for `city` concurrently.
    ///
    /// Returns one reading per provider, or the first provider failure
    /// observed.
    pub async fn temperature(&self, city: &str) -> Result<Vec<Reading>, AggregateError> {
        if city.trim().is_empty() {
            return Err(AggregateError::EmptyCity);
        }

        let expected = self.providers.len();
        if expected == 0 {
            return Ok(Vec::new());
        }

        let (tx, mut rx) = mpsc::channel(expected);
        let mut in_flight = InFlight(Vec::with_capacity(expected));

        for provider in self.providers.iter() {
            let provider = Arc::clone(provider);
            let tx = tx.clone();
            let city = city.to_owned();
            let timeout = self.timeout;

            in_flight.0.push(tokio::spawn(async move {
                let outcome = query_provider(provider.as_ref(), &city, timeout).await;
                // Never waits: capacity equals the number of senders. Fails
                // only once the receiving call has already returned.
                let _ = tx.send(outcome).await;
            }));
        }
        drop(tx);

        debug!(city, providers = expected, "dispatched provider queries");

        let mut readings = Vec::with_capacity(expected);
        while readings.len() < expected {
            match rx.recv().await {
                Some(Ok(reading)) => readings.push(reading),
                Some(Err(err)) => {
                    warn!(
                        city,
                        provider = %err.provider,
                        kind = %err.kind,
                        error = %err.message,
                        "provider failed, abandoning request"
                    );
                    return Err(err.into());
                }
                None => {
                    let missing = expected - readings.len();
                    warn!(city, missing, "provider tasks ended without reporting");
                    return Err(AggregateError::Abandoned { missing });
                }
            }
        }

        Ok(readings)
    }
}

async fn query_provider(
    provider: &dyn WeatherProvider,
    city: &str,
    timeout: Option<Duration>,
) -> Result<Reading, ProviderError> {
    let Some(limit) = timeout else {
        return provider.query(city).await;
    };

    match tokio::time::timeout(limit, provider.query(city)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProviderError::new(
            ProviderErrorKind::TimedOut,
            provider.name(),
            format!("no answer within {} ms", limit.as_millis()),
        )),
    }
}

/// Provider tasks of one call; aborted when the call returns or is dropped.
struct InFlight(Vec<JoinHandle<()>>);

impl Drop for InFlight {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}
