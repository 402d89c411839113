use std::fmt;

use serde::{Deserialize, Serialize};

const CELSIUS_OFFSET: f64 = 273.15;

/// Absolute temperature in degrees Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(pub f64);

impl Kelvin {
    /// For providers whose backend reports Celsius.
    pub fn from_celsius(celsius: f64) -> Self {
        Kelvin(celsius + CELSIUS_OFFSET)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Finite and not below absolute zero.
    pub fn is_physical(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}K", self.0)
    }
}

/// One provider's answer for one city.
///
/// Serializes as `{"name": <city>, "main": {"providerName": ..., "temp": ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "name")]
    city: String,
    #[serde(rename = "main")]
    measurement: Measurement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Measurement {
    #[serde(rename = "providerName")]
    provider_name: String,
    #[serde(rename = "temp")]
    temperature: Kelvin,
}

impl Reading {
    pub fn new(
        provider_name: impl Into<String>,
        city: impl Into<String>,
        temperature: Kelvin,
    ) -> Self {
        Self {
            city: city.into(),
            measurement: Measurement {
                provider_name: provider_name.into(),
                temperature,
            },
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn provider_name(&self) -> &str {
        &self.measurement.provider_name
    }

    pub fn temperature(&self) -> Kelvin {
        self.measurement.temperature
    }
}
