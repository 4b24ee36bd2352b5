use crate::domain::Fix;
use serde::Deserialize;
use thiserror::Error;

/// A fix as written in configuration, before its coordinates are checked.
#[derive(Debug, Deserialize)]
pub struct RawFix {
    latitude: f64,
    longitude: f64,
    accuracy_m: f32,
}

#[derive(Error, Debug, PartialEq)]
pub enum FixError {
    #[error("fix {field} {value} is outside [{min}, {max}]")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
    #[error("fix accuracy {0}m is negative")]
    NegativeAccuracy(f32),
}

fn bounded(field: &'static str, value: f64, limit: f64) -> Result<f64, FixError> {
    if (-limit..=limit).contains(&value) {
        Ok(value)
    } else {
        Err(FixError::OutOfRange {
            field,
            value,
            min: -limit,
            max: limit,
        })
    }
}

impl TryFrom<RawFix> for Fix {
    type Error = FixError;

    fn try_from(raw: RawFix) -> Result<Self, Self::Error> {
        if raw.accuracy_m < 0.0 || raw.accuracy_m.is_nan() {
            return Err(FixError::NegativeAccuracy(raw.accuracy_m));
        }

        Ok(Fix {
            latitude: bounded("latitude", raw.latitude, 90.0)?,
            longitude: bounded("longitude", raw.longitude, 180.0)?,
            accuracy: raw.accuracy_m,
        })
    }
}
