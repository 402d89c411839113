//! Error taxonomy shared by providers, the aggregator and startup code.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// Why a single provider could not produce a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Network or transport failure talking to the backend.
    Unreachable,
    /// The backend answered, but not with something we can read a temperature from.
    BadResponse,
    /// The city was rejected, either locally or by the backend.
    InvalidInput,
    /// The provider did not answer within the aggregator's per-provider timeout.
    TimedOut,
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Unreachable => "backend unreachable",
            ProviderErrorKind::BadResponse => "bad response",
            ProviderErrorKind::InvalidInput => "invalid input",
            ProviderErrorKind::TimedOut => "timed out",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one provider for one request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider}: {kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub provider: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(
        kind: ProviderErrorKind,
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn unreachable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unreachable, provider, message)
    }

    pub fn bad_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::BadResponse, provider, message)
    }

    pub fn invalid_input(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidInput, provider, message)
    }
}

/// Terminal failure of one aggregate city query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// The first provider failure observed; it fails the whole request.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("city must not be empty")]
    EmptyCity,

    /// Provider tasks that ended (e.g. panicked) without reporting an outcome.
    #[error("{missing} provider task(s) ended without reporting a result")]
    Abandoned { missing: usize },
}

impl AggregateError {
    /// Kind of the underlying provider failure, if this error came from one.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            AggregateError::Provider(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// Startup-fatal configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read credentials file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "no provider credentials configured.\n\
         Hint: add at least one of the supported keys ({keys}) to the credentials file."
    )]
    NoProviders { keys: String },

    #[error("Unknown provider '{name}'. Supported providers: {supported}.")]
    UnknownProvider { name: String, supported: String },
}
