use crate::{
    Credentials, Reading,
    error::{ConfigError, ProviderError},
    provider::{openweathermap::OpenWeatherMapProvider, stub::StubProvider},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::{info, warn};

pub mod openweathermap;
pub mod stub;

/// The backends this service knows how to build from credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeatherMap,
    WeatherUnderground,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeatherMap => "openweathermap",
            ProviderId::WeatherUnderground => "weatherunderground",
        }
    }

    /// Key under which the provider's token is stored in the credentials file.
    pub fn credential_key(&self) -> &'static str {
        match self {
            ProviderId::OpenWeatherMap => "OpenWeatherMapApiKey",
            ProviderId::WeatherUnderground => "WundergroundApiKey",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeatherMap, ProviderId::WeatherUnderground]
    }

    pub fn from_credential_key(key: &str) -> Option<ProviderId> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.credential_key() == key)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownProvider {
                name: value.to_string(),
                supported: supported_list(ProviderId::as_str),
            })
    }
}

fn supported_list(field: fn(&ProviderId) -> &'static str) -> String {
    ProviderId::all()
        .iter()
        .map(field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A source of temperature readings.
///
/// Implementations convert whatever their backend reports into Kelvin and
/// stamp the returned [`Reading`] with their own name and the queried city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn query(&self, city: &str) -> Result<Reading, ProviderError>;
}

/// Providers owned by an aggregator; fixed once built.
pub type ProviderSet = Vec<Arc<dyn WeatherProvider>>;

/// Construct one provider per known backend that has a token configured.
pub fn provider_set_from_credentials(
    credentials: &Credentials,
) -> Result<ProviderSet, ConfigError> {
    for key in credentials.keys() {
        if ProviderId::from_credential_key(key).is_none() {
            warn!(key, "ignoring credentials entry for unknown provider");
        }
    }

    let mut providers: ProviderSet = Vec::new();

    for &id in ProviderId::all() {
        let Some(token) = credentials.token(id) else {
            continue;
        };

        let provider: Arc<dyn WeatherProvider> = match id {
            ProviderId::OpenWeatherMap => Arc::new(OpenWeatherMapProvider::new(token.to_owned())),
            // No free access to this backend; the token is accepted but unused.
            ProviderId::WeatherUnderground => Arc::new(StubProvider::weather_underground()),
        };

        info!(provider = %id, "provider configured");
        providers.push(provider);
    }

    if providers.is_empty() {
        return Err(ConfigError::NoProviders {
            keys: supported_list(ProviderId::credential_key),
        });
    }

    Ok(providers)
}
