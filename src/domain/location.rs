use crate::fix_deserializer::RawFix;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The source that produced a location. `None` is rendered as an empty label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LocationMethod {
    Native,
    Gps,
    Network,
    Wifi,
    #[default]
    None,
}

impl LocationMethod {
    pub fn from_providers(gps_enabled: bool, network_enabled: bool) -> Self {
        match (gps_enabled, network_enabled) {
            (true, true) => LocationMethod::Native,
            (true, false) => LocationMethod::Gps,
            (false, true) => LocationMethod::Network,
            (false, false) => LocationMethod::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationMethod::Native => "native",
            LocationMethod::Gps => "gps",
            LocationMethod::Network => "network",
            LocationMethod::Wifi => "wifi",
            LocationMethod::None => "",
        }
    }
}

impl fmt::Display for LocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown location method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for LocationMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(LocationMethod::Native),
            "gps" => Ok(LocationMethod::Gps),
            "network" => Ok(LocationMethod::Network),
            "wifi" => Ok(LocationMethod::Wifi),
            "" => Ok(LocationMethod::None),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// A raw position as reported by a location-service client.
#[derive(Clone, Copy, Default, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawFix")]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f32, // In meters
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f32,
    pub method: LocationMethod,
    pub valid: bool,
}

impl LocationCandidate {
    pub fn new(latitude: f64, longitude: f64, accuracy: f32) -> Self {
        LocationCandidate {
            latitude,
            longitude,
            accuracy,
            method: LocationMethod::None,
            valid: true,
        }
    }

    pub fn from_fix(fix: Fix, method: LocationMethod) -> Self {
        LocationCandidate::new(fix.latitude, fix.longitude, fix.accuracy).with_method(method)
    }

    /// A placeholder for stores that have not received a position yet.
    pub fn invalid() -> Self {
        LocationCandidate {
            latitude: 0.0,
            longitude: 0.0,
            accuracy: 0.0,
            method: LocationMethod::None,
            valid: false,
        }
    }

    pub fn with_method(mut self, method: LocationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
