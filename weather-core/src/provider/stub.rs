//! Provider that answers from a fixed, pre-configured outcome.
//!
//! Used as the placeholder for backends with no available access, and as a
//! deterministic test double for the aggregator.

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::{ProviderError, ProviderErrorKind},
    model::{Kelvin, Reading},
};

use super::{ProviderId, WeatherProvider};

/// 60 °F, the fixed reading reported for Weather Underground.
pub const WEATHER_UNDERGROUND_KELVIN: Kelvin = Kelvin(288.706);

#[derive(Debug, Clone)]
pub struct StubProvider {
    name: String,
    response: StubResponse,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Temperature(Kelvin),
    Error { kind: ProviderErrorKind, message: String },
}

impl StubProvider {
    /// A provider that always reports `temperature`.
    pub fn new(name: impl Into<String>, temperature: Kelvin) -> Self {
        Self {
            name: name.into(),
            response: StubResponse::Temperature(temperature),
            delay: None,
        }
    }

    /// A provider that always fails with `kind`.
    pub fn failing(
        name: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            response: StubResponse::Error {
                kind,
                message: message.into(),
            },
            delay: None,
        }
    }

    pub fn weather_underground() -> Self {
        Self::new(ProviderId::WeatherUnderground.as_str(), WEATHER_UNDERGROUND_KELVIN)
    }

    /// Wait this long before answering, to simulate a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, city: &str) -> Result<Reading, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if city.trim().is_empty() {
            return Err(ProviderError::invalid_input(&self.name, "city must not be empty"));
        }

        match &self.response {
            StubResponse::Temperature(kelvin) => Ok(Reading::new(&self.name, city, *kelvin)),
            StubResponse::Error { kind, message } => {
                Err(ProviderError::new(*kind, &self.name, message.clone()))
            }
        }
    }
}
