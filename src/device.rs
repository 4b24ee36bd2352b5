use crate::app_config::DeviceProfile;
use crate::domain::{AccessPoint, Fix, LocationCandidate};
use crate::last_known_location::LastKnownLocation;
use crate::platform::{BackgroundService, CapabilityProvider, LocationServiceClient, Permission, Provider, WifiScanner};
use async_trait::async_trait;
use tracing::debug;

/// A device whose capabilities and surroundings come from configuration.
///
/// The location client publishes the configured fix once initialized and the background
/// service publishes it while running, so the whole fallback chain can be exercised
/// without platform sensors.
#[derive(Debug)]
pub struct StaticDevice {
    profile: DeviceProfile,
    client_location: LastKnownLocation<Fix>,
    service_location: LastKnownLocation<LocationCandidate>,
}

impl StaticDevice {
    pub fn new(profile: DeviceProfile) -> Self {
        StaticDevice {
            profile,
            client_location: LastKnownLocation::new(),
            service_location: LastKnownLocation::new(),
        }
    }
}

impl CapabilityProvider for StaticDevice {
    fn is_provider_enabled(&self, provider: Provider) -> bool {
        match provider {
            Provider::Gps => self.profile.gps_enabled,
            Provider::Network => self.profile.network_enabled,
        }
    }

    fn is_wifi_enabled(&self) -> bool {
        self.profile.wifi_enabled
    }

    fn has_permission(&self, permission: Permission) -> bool {
        match permission {
            Permission::FineLocation => self.profile.fine_location_granted,
            Permission::CoarseLocation => self.profile.coarse_location_granted,
        }
    }

    fn is_location_client_reachable(&self) -> bool {
        self.profile.location_client_reachable
    }

    fn requires_runtime_permissions(&self) -> bool {
        self.profile.runtime_permission_gating
    }
}

#[async_trait]
impl LocationServiceClient for StaticDevice {
    async fn init(&self) {
        if let Some(fix) = self.profile.fix {
            debug!(?fix, "Publishing configured fix");
            self.client_location.set(fix);
        }
    }

    fn last_location(&self) -> Option<Fix> {
        self.client_location.get()
    }
}

impl BackgroundService for StaticDevice {
    fn start(&self) {
        if let Some(fix) = self.profile.fix {
            self.service_location.set(LocationCandidate::new(fix.latitude, fix.longitude, fix.accuracy));
        }
    }

    fn stop(&self) {
        self.service_location.clear();
    }

    fn last_location(&self) -> LocationCandidate {
        self.service_location.get().unwrap_or_else(LocationCandidate::invalid)
    }
}

impl WifiScanner for StaticDevice {
    fn scan_results(&self) -> Option<Vec<AccessPoint>> {
        self.profile.wifi_enabled.then(|| self.profile.access_points.clone())
    }
}
