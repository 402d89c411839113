use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::ProviderError,
    model::{Kelvin, Reading},
};

use super::{ProviderId, WeatherProvider};

const DEFAULT_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Live provider backed by the OpenWeatherMap "current weather" API.
///
/// The API reports Kelvin unless asked otherwise, so no conversion is needed.
#[derive(Debug, Clone)]
pub struct OpenWeatherMapProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherMapProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Self {
        Self {
            api_key,
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    fn name_str(&self) -> &'static str {
        ProviderId::OpenWeatherMap.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    fn name(&self) -> &str {
        self.name_str()
    }

    async fn query(&self, city: &str) -> Result<Reading, ProviderError> {
        let name = self.name_str();

        if city.trim().is_empty() {
            return Err(ProviderError::invalid_input(name, "city must not be empty"));
        }

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("APPID", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|err| {
                ProviderError::unreachable(name, format!("failed to send request: {err}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            ProviderError::unreachable(name, format!("failed to read response body: {err}"))
        })?;

        if !status.is_success() {
            let message = format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body)
            );
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                    ProviderError::invalid_input(name, message)
                }
                _ => ProviderError::bad_response(name, message),
            });
        }

        let parsed: OwmCurrentResponse = serde_json::from_str(&body).map_err(|err| {
            ProviderError::bad_response(name, format!("failed to parse JSON: {err}"))
        })?;

        let kelvin = Kelvin(parsed.main.temp);
        if !kelvin.is_physical() {
            return Err(ProviderError::bad_response(
                name,
                format!(
                    "reported temperature {} is not a valid Kelvin value",
                    parsed.main.temp
                ),
            ));
        }

        info!(
            provider = name,
            city,
            kelvin = kelvin.value(),
            "temperature reading"
        );
        Ok(Reading::new(name, city, kelvin))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
