use crate::domain::{LocationCandidate, LocationMethod, UnknownMethod};
use serde::Serialize;
use thiserror::Error;

pub const LAT: &str = "lat";
pub const LNG: &str = "lng";
pub const ACCURACY: &str = "accuracy";
pub const METHOD: &str = "method";

/// A location flattened to decimal strings, ready for upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    lat: String,
    lng: String,
    accuracy: String,
    method: String,
}

impl UploadRecord {
    /// Name of the data service the record is uploaded under.
    pub const NAME: &'static str = "location";

    /// Builds a record from loose fields, all four keys are required.
    #[cfg(test)]
    pub(crate) fn from_fields(fields: &std::collections::HashMap<String, String>) -> Result<Self, RecordError> {
        let field = |key: &'static str| fields.get(key).cloned().ok_or(RecordError::MissingKey(key));

        Ok(UploadRecord {
            lat: field(LAT)?,
            lng: field(LNG)?,
            accuracy: field(ACCURACY)?,
            method: field(METHOD)?,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            LAT => Some(&self.lat),
            LNG => Some(&self.lng),
            ACCURACY => Some(&self.accuracy),
            METHOD => Some(&self.method),
            _ => None,
        }
    }

    /// Fields in upload order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [(LAT, &self.lat), (LNG, &self.lng), (ACCURACY, &self.accuracy), (METHOD, &self.method)]
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("record is missing key '{0}'")]
    MissingKey(&'static str),
    #[error("record key '{key}' holds an invalid number '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethod),
}

pub fn to_record(candidate: Option<&LocationCandidate>) -> Option<UploadRecord> {
    let candidate = candidate?;

    Some(UploadRecord {
        lat: format!("{:?}", candidate.latitude),
        lng: format!("{:?}", candidate.longitude),
        accuracy: format!("{:?}", candidate.accuracy),
        method: candidate.method.label().to_string(),
    })
}

pub fn from_record(record: &UploadRecord) -> Result<LocationCandidate, RecordError> {
    let latitude = parse_number::<f64>(LAT, &record.lat)?;
    let longitude = parse_number::<f64>(LNG, &record.lng)?;
    let accuracy = parse_number::<f32>(ACCURACY, &record.accuracy)?;
    let method = record.method.parse::<LocationMethod>()?;

    Ok(LocationCandidate::new(latitude, longitude, accuracy).with_method(method))
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, RecordError> {
    value.parse::<T>().map_err(|_| RecordError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}
