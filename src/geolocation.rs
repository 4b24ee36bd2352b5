use crate::domain::{AccessPoint, LocationCandidate};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Resolves coordinates from a set of observed wireless access points.
#[async_trait]
pub trait GeolocationResolver: Debug + Send + Sync {
    async fn resolve(&self, access_points: &[AccessPoint]) -> Result<LocationCandidate, ResolverError>;
}

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("resolver returned an unusable location: {0}")]
    InvalidLocation(String),
}

#[derive(Debug)]
pub struct HttpGeolocationResolver {
    client: Client,
    url: String,
}

impl HttpGeolocationResolver {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        HttpGeolocationResolver { client, url: url.into() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeolocationRequest<'a> {
    consider_ip: bool,
    wifi_access_points: Vec<WifiAccessPoint<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WifiAccessPoint<'a> {
    mac_address: &'a str,
    signal_strength: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeolocationResponse {
    location: LatLng,
    accuracy: f32,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl GeolocationResolver for HttpGeolocationResolver {
    #[instrument(skip_all, fields(access_points = access_points.len()))]
    async fn resolve(&self, access_points: &[AccessPoint]) -> Result<LocationCandidate, ResolverError> {
        info!("🛰️ Resolving location from {} access point(s)...", access_points.len());

        let request = GeolocationRequest {
            consider_ip: false,
            wifi_access_points: access_points
                .iter()
                .map(|access_point| WifiAccessPoint {
                    mac_address: &access_point.mac_address,
                    signal_strength: access_point.signal_strength,
                    channel: access_point.channel,
                })
                .collect(),
        };

        let response = self.client.post(&self.url).json(&request).send().await?.error_for_status()?;
        let body = response.json::<GeolocationResponse>().await?;
        debug!(?body, "Resolver response");

        let LatLng { lat, lng } = body.location;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) || body.accuracy < 0.0 {
            return Err(ResolverError::InvalidLocation(format!("({}, {}) ±{}", lat, lng, body.accuracy)));
        }

        info!("🛰️ Resolving location from {} access point(s)... OK", access_points.len());
        Ok(LocationCandidate::new(lat, lng, body.accuracy))
    }
}
