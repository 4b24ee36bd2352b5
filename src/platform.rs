//! Seams to the operating system. Implementations live outside the acquisition logic.

use crate::domain::{AccessPoint, Fix, LocationCandidate};
use async_trait::async_trait;
use std::fmt::Debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    Gps,
    Network,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    FineLocation,
    CoarseLocation,
}

pub trait CapabilityProvider: Debug + Send + Sync {
    fn is_provider_enabled(&self, provider: Provider) -> bool;

    fn is_wifi_enabled(&self) -> bool;

    fn has_permission(&self, permission: Permission) -> bool;

    fn is_location_client_reachable(&self) -> bool;

    fn requires_runtime_permissions(&self) -> bool;
}

/// A managed location service that fuses several sensors on its own.
#[async_trait]
pub trait LocationServiceClient: Debug + Send + Sync {
    /// Connects to the service. May take arbitrarily long or never finish.
    async fn init(&self);

    fn last_location(&self) -> Option<Fix>;
}

/// A service that runs independently and publishes its result to a shared store.
pub trait BackgroundService: Debug + Send + Sync {
    fn start(&self);

    fn stop(&self);

    fn last_location(&self) -> LocationCandidate;
}

pub trait WifiScanner: Debug + Send + Sync {
    /// `None` when no scan could be performed at all.
    fn scan_results(&self) -> Option<Vec<AccessPoint>>;
}
