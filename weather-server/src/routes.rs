//! HTTP boundary: maps requests onto [`Aggregator::temperature`].

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;
use weather_core::{AggregateError, Aggregator, Reading};

pub fn router(aggregator: Aggregator) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/weather", get(missing_city))
        .route("/weather/", get(missing_city))
        .route("/weather/{city}", get(weather))
        .layer(TraceLayer::new_for_http())
        .with_state(aggregator)
}

async fn hello() -> &'static str {
    "Hello from Rust!\n"
}

async fn weather(
    State(aggregator): State<Aggregator>,
    Path(city): Path<String>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    if city.trim().is_empty() {
        return Err(RequestError::MissingCity.into());
    }

    let readings = aggregator.temperature(&city).await?;
    Ok(Json(readings))
}

async fn missing_city() -> RequestError {
    RequestError::MissingCity
}

/// Malformed inbound request; rejected before the aggregator is called.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing city: expected GET /weather/{{city}}")]
    MissingCity,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Request(err) => err.into_response(),
            ApiError::Aggregate(AggregateError::EmptyCity) => {
                RequestError::MissingCity.into_response()
            }
            ApiError::Aggregate(err) => {
                error!(error = %err, "weather query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use std::{
        collections::BTreeMap,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };
    use tower::ServiceExt;
    use weather_core::{
        Kelvin, ProviderError, ProviderErrorKind, WeatherProvider, provider::stub::StubProvider,
    };

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn query(&self, city: &str) -> Result<Reading, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Reading::new("counting", city, Kelvin(290.0)))
        }
    }

    fn stub(name: &str, kelvin: f64) -> Arc<dyn WeatherProvider> {
        Arc::new(StubProvider::new(name, Kelvin(kelvin)))
    }

    fn stub_aggregator() -> Aggregator {
        Aggregator::new(vec![stub("A", 300.0), stub("B", 310.0)])
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn hello_is_static() {
        let (status, _, body) = send_get(router(Aggregator::new(Vec::new())), "/hello").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello from Rust!\n");
    }

    #[tokio::test]
    async fn weather_returns_one_object_per_provider() {
        let (status, content_type, body) =
            send_get(router(stub_aggregator()), "/weather/phoenix").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let json: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        let temps: BTreeMap<String, f64> = json
            .iter()
            .map(|entry| {
                assert_eq!(entry["name"], "phoenix");
                (
                    entry["main"]["providerName"].as_str().unwrap().to_owned(),
                    entry["main"]["temp"].as_f64().unwrap(),
                )
            })
            .collect();

        let expected = BTreeMap::from([("A".to_owned(), 300.0), ("B".to_owned(), 310.0)]);
        assert_eq!(temps, expected);
    }

    #[tokio::test]
    async fn city_segment_is_url_decoded() {
        let (status, _, body) =
            send_get(router(stub_aggregator()), "/weather/San%20Francisco").await;

        assert_eq!(status, StatusCode::OK);
        let json: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert!(json.iter().all(|entry| entry["name"] == "San Francisco"));
    }

    #[tokio::test]
    async fn provider_failure_is_server_error_with_message() {
        let failing: Arc<dyn WeatherProvider> = Arc::new(StubProvider::failing(
            "B",
            ProviderErrorKind::Unreachable,
            "connection refused",
        ));
        let aggregator = Aggregator::new(vec![stub("A", 300.0), failing]);

        let (status, content_type, body) = send_get(router(aggregator), "/weather/phoenix").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert_eq!(body, "B: backend unreachable: connection refused");
    }

    #[tokio::test]
    async fn missing_city_is_rejected_before_aggregation() {
        let counting = Arc::new(CountingProvider::default());
        let provider: Arc<dyn WeatherProvider> = counting.clone();
        let app = router(Aggregator::new(vec![provider]));

        for uri in ["/weather", "/weather/", "/weather/%20"] {
            let (status, _, body) = send_get(app.clone(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert!(body.contains("missing city"));
        }

        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }
}
