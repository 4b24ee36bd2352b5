/// Snapshot of the location capabilities of the device at the time of a probe.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ProviderAvailability {
    pub gps_enabled: bool,
    pub network_enabled: bool,
    pub wifi_enabled: bool,
    pub fine_location_granted: bool,
    pub coarse_location_granted: bool,
    pub location_client_reachable: bool,
    /// Whether the platform requires location permissions to be granted at runtime.
    pub runtime_permission_gating: bool,
}

impl ProviderAvailability {
    pub fn location_permitted(&self) -> bool {
        !self.runtime_permission_gating || self.fine_location_granted || self.coarse_location_granted
    }

    pub fn any_provider_enabled(&self) -> bool {
        self.gps_enabled || self.network_enabled
    }
}
