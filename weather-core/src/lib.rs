//! Core library for the `weather` server.
//!
//! This crate defines:
//! - Credentials loading
//! - Abstraction over weather providers, with a live and a stub backend
//! - The aggregator that queries every provider concurrently
//! - Shared domain models and the error taxonomy
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use aggregator::Aggregator;
pub use config::Credentials;
pub use error::{AggregateError, ConfigError, ProviderError, ProviderErrorKind};
pub use model::{Kelvin, Reading};
pub use provider::{ProviderId, ProviderSet, WeatherProvider, provider_set_from_credentials};
