use crate::app_config::Acquisition;
use crate::domain::{LocationCandidate, LocationMethod};
use crate::geolocation::GeolocationResolver;
use crate::locator::{BackgroundLocator, ManagedLocator, WirelessLocator};
use crate::notifier::{FailureNotifier, FailureReporter, STATUS_FAILED};
use crate::platform::{BackgroundService, CapabilityProvider, LocationServiceClient, WifiScanner};
use crate::probe::probe;
use crate::record::{UploadRecord, from_record, to_record};
use crate::retry::Sleeper;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub const FAILURE_REASON: &str = "Error";

/// Everything the acquirer talks to outside of its own decision logic.
#[derive(Clone, Debug)]
pub struct Collaborators {
    pub capabilities: Arc<dyn CapabilityProvider>,
    pub location_client: Arc<dyn LocationServiceClient>,
    pub background_service: Arc<dyn BackgroundService>,
    pub scanner: Arc<dyn WifiScanner>,
    pub resolver: Arc<dyn GeolocationResolver>,
    pub reporter: Arc<dyn FailureReporter>,
    pub sleeper: Arc<dyn Sleeper>,
}

/// Determines the device location using the best source that is available right now.
///
/// Sources are tried in a fixed order: the managed location service (which falls back
/// to the background service and wireless positioning on its own), then wireless
/// positioning. When nothing yields a valid location the failure is reported and
/// `None` is returned; acquisition never fails loudly.
#[derive(Debug)]
pub struct LocationAcquirer {
    capabilities: Arc<dyn CapabilityProvider>,
    managed: ManagedLocator,
    wireless: Arc<WirelessLocator>,
    notifier: FailureNotifier,
}

impl LocationAcquirer {
    pub fn new(collaborators: Collaborators, acquisition: &Acquisition) -> Self {
        let notifier = FailureNotifier::new(collaborators.reporter);
        let wireless = Arc::new(WirelessLocator::new(collaborators.scanner, collaborators.resolver));
        let background = BackgroundLocator::new(
            collaborators.background_service,
            collaborators.sleeper.clone(),
            acquisition.background_policy(),
            notifier.clone(),
        );
        let managed = ManagedLocator::new(
            collaborators.location_client,
            collaborators.sleeper,
            acquisition.managed_policy(),
            background,
            wireless.clone(),
        );

        LocationAcquirer {
            capabilities: collaborators.capabilities,
            managed,
            wireless,
            notifier,
        }
    }

    #[instrument(skip_all)]
    pub async fn acquire_location(&self) -> Option<LocationCandidate> {
        info!("📡 Acquiring location...");

        match AssertUnwindSafe(self.locate()).catch_unwind().await {
            Ok(Some(candidate)) => {
                info!(
                    method = %candidate.method,
                    "📡 Acquiring location... OK, {} {} ±{}m",
                    candidate.latitude,
                    candidate.longitude,
                    candidate.accuracy
                );
                return Some(candidate);
            }
            Ok(None) => warn!("📡 Acquiring location... failed, no source produced a location"),
            Err(_) => error!("💥 Acquiring location... failed unexpectedly"),
        }

        self.notifier.notify(FAILURE_REASON, STATUS_FAILED).await;
        None
    }

    /// Acquires a location and normalizes it for upload.
    pub async fn acquire_record(&self) -> Option<UploadRecord> {
        to_record(self.acquire_location().await.as_ref())
    }

    /// Acquires a location as it would be uploaded, parsed back into a candidate.
    pub async fn acquire_reported_location(&self) -> Option<LocationCandidate> {
        let record = self.acquire_record().await?;
        from_record(&record)
            .inspect_err(|e| warn!("⚠️ Could not read back the upload record: {}", e))
            .ok()
    }

    async fn locate(&self) -> Option<LocationCandidate> {
        let availability = probe(self.capabilities.as_ref());
        let method = LocationMethod::from_providers(availability.gps_enabled, availability.network_enabled);

        let mut candidate = None;
        if !availability.location_permitted() {
            info!("🔒 Location permission not granted, skipping location providers");
        } else if !availability.any_provider_enabled() {
            debug!("No location provider enabled");
        } else if !availability.location_client_reachable {
            debug!("Location service client unreachable");
        } else {
            candidate = self.managed.locate(method, availability.wifi_enabled).await.filter(LocationCandidate::is_valid);
        }

        if candidate.is_none() && availability.wifi_enabled {
            candidate = match self.wireless.locate().await {
                Ok(candidate) => Some(candidate).filter(LocationCandidate::is_valid),
                Err(e) => {
                    warn!("⚠️ Wireless positioning failed: {}", e);
                    None
                }
            };
        }

        candidate
    }
}
