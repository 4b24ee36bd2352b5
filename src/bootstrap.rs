use crate::acquirer::{Collaborators, LocationAcquirer};
use crate::app_config::AppConfig;
use crate::device::StaticDevice;
use crate::geolocation::HttpGeolocationResolver;
use crate::http_client::{HttpClientError, new_client};
use crate::notifier::HttpFailureReporter;
use crate::retry::TokioSleeper;
use std::sync::Arc;
use tokio::sync::watch::Receiver as WatchReceiver;
use tracing::info;

/// Wires the configured device and HTTP endpoints into a ready-to-use acquirer.
pub fn acquirer(config: &AppConfig, shutdown: WatchReceiver<bool>) -> Result<LocationAcquirer, HttpClientError> {
    let device = Arc::new(StaticDevice::new(config.device().clone()));

    let resolver_client = new_client(config.resolver())?;
    let reporter_client = new_client(config.reporter())?;
    info!("✅  Initialized HTTP clients");

    let collaborators = Collaborators {
        capabilities: device.clone(),
        location_client: device.clone(),
        background_service: device.clone(),
        scanner: device,
        resolver: Arc::new(HttpGeolocationResolver::new(resolver_client, config.resolver().url())),
        reporter: Arc::new(HttpFailureReporter::new(reporter_client, config.reporter().url())),
        sleeper: Arc::new(TokioSleeper::with_shutdown(shutdown)),
    };

    let managed = config.acquisition().managed_policy();
    let background = config.acquisition().background_policy();
    info!(
        managed_attempts = managed.max_attempts(),
        managed_interval = ?managed.interval(),
        background_attempts = background.max_attempts(),
        background_interval = ?background.interval(),
        "✅  Configured acquisition retries"
    );

    Ok(LocationAcquirer::new(collaborators, config.acquisition()))
}
