use crate::domain::LocationCandidate;
use crate::geolocation::{GeolocationResolver, ResolverError};
use crate::platform::WifiScanner;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum WirelessError {
    #[error("no wireless access points observed")]
    NoScanData,
    #[error("resolving the access points failed: {0}")]
    Resolver(#[from] ResolverError),
}

/// Locates the device by resolving nearby access points through a remote service.
#[derive(Debug)]
pub struct WirelessLocator {
    scanner: Arc<dyn WifiScanner>,
    resolver: Arc<dyn GeolocationResolver>,
}

impl WirelessLocator {
    pub fn new(scanner: Arc<dyn WifiScanner>, resolver: Arc<dyn GeolocationResolver>) -> Self {
        WirelessLocator { scanner, resolver }
    }

    #[instrument(skip_all)]
    pub async fn locate(&self) -> Result<LocationCandidate, WirelessError> {
        info!("📶 Locating via wireless access points...");

        let access_points = match self.scanner.scan_results() {
            Some(access_points) if !access_points.is_empty() => access_points,
            _ => {
                warn!("📶 Locating via wireless access points... failed, no access points observed");
                return Err(WirelessError::NoScanData);
            }
        };

        let candidate = self.resolver.resolve(&access_points).await?;
        info!("📶 Locating via wireless access points... OK");
        Ok(candidate)
    }
}
