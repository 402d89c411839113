use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, fs, path::Path};

use crate::{error::ConfigError, provider::ProviderId};

/// Provider access tokens, keyed by each provider's credential key.
///
/// Example file:
/// ```json
/// { "OpenWeatherMapApiKey": "...", "WundergroundApiKey": "..." }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials {
    tokens: BTreeMap<String, String>,
}

impl Credentials {
    /// Read and parse the credentials file. Called once at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Token for a provider, if present.
    pub fn token(&self, id: ProviderId) -> Option<&str> {
        self.tokens.get(id.credential_key()).map(String::as_str)
    }

    /// Set or replace the token for a provider.
    pub fn insert(&mut self, id: ProviderId, token: impl Into<String>) {
        self.tokens.insert(id.credential_key().to_string(), token.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.tokens.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn load_reads_token_mapping() {
        let file = write_temp(r#"{ "OpenWeatherMapApiKey": "OWM_KEY", "Other": "x" }"#);

        let creds = Credentials::load(file.path()).expect("valid credentials");

        assert_eq!(creds.token(ProviderId::OpenWeatherMap), Some("OWM_KEY"));
        assert_eq!(creds.token(ProviderId::WeatherUnderground), None);
        assert_eq!(creds.keys().collect::<Vec<_>>(), vec!["OpenWeatherMapApiKey", "Other"]);
    }

    #[test]
    fn load_errors_when_file_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = Credentials::load(dir.path().join("absent.json")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("failed to read credentials file"));
    }

    #[test]
    fn load_errors_when_file_malformed() {
        let file = write_temp("{ not json");
        let err = Credentials::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_rejects_non_string_tokens() {
        let file = write_temp(r#"{ "OpenWeatherMapApiKey": 42 }"#);
        assert!(matches!(Credentials::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn insert_replaces_existing_token() {
        let mut creds = Credentials::default();
        creds.insert(ProviderId::OpenWeatherMap, "first");
        creds.insert(ProviderId::OpenWeatherMap, "second");

        assert_eq!(creds.token(ProviderId::OpenWeatherMap), Some("second"));
    }

    #[test]
    fn debug_hides_tokens() {
        let creds = Credentials::from_json_str(r#"{ "OpenWeatherMapApiKey": "SECRET" }"#).unwrap();
        let shown = format!("{creds:?}");

        assert!(shown.contains("OpenWeatherMapApiKey"));
        assert!(!shown.contains("SECRET"));
    }
}
