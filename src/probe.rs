use crate::domain::ProviderAvailability;
use crate::platform::{CapabilityProvider, Permission, Provider};
use tracing::debug;

pub fn probe(capabilities: &dyn CapabilityProvider) -> ProviderAvailability {
    let availability = ProviderAvailability {
        gps_enabled: capabilities.is_provider_enabled(Provider::Gps),
        network_enabled: capabilities.is_provider_enabled(Provider::Network),
        wifi_enabled: capabilities.is_wifi_enabled(),
        fine_location_granted: capabilities.has_permission(Permission::FineLocation),
        coarse_location_granted: capabilities.has_permission(Permission::CoarseLocation),
        location_client_reachable: capabilities.is_location_client_reachable(),
        runtime_permission_gating: capabilities.requires_runtime_permissions(),
    };

    debug!(
        gps = availability.gps_enabled,
        network = availability.network_enabled,
        wifi = availability.wifi_enabled,
        "🔎 Probed location providers"
    );

    availability
}
