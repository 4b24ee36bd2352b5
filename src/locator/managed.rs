use crate::domain::{LocationCandidate, LocationMethod};
use crate::locator::background::BackgroundLocator;
use crate::locator::wireless::WirelessLocator;
use crate::platform::LocationServiceClient;
use crate::retry::{PollOutcome, RetryPolicy, Sleeper, poll_until};
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, instrument, warn};

/// Handle to the detached client initialization. Dropping it leaves the task running.
#[derive(Debug)]
pub struct InitTask {
    handle: JoinHandle<()>,
}

impl InitTask {
    pub fn spawn(client: Arc<dyn LocationServiceClient>) -> Self {
        let handle = tokio::spawn(async move {
            client.init().await;
            debug!("🧭 Location service client initialized");
        });

        InitTask { handle }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Locates the device through a managed location service, falling back to the
/// background service and then to wireless positioning.
#[derive(Debug)]
pub struct ManagedLocator {
    client: Arc<dyn LocationServiceClient>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    background: BackgroundLocator,
    wireless: Arc<WirelessLocator>,
}

impl ManagedLocator {
    pub fn new(
        client: Arc<dyn LocationServiceClient>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
        background: BackgroundLocator,
        wireless: Arc<WirelessLocator>,
    ) -> Self {
        ManagedLocator {
            client,
            sleeper,
            policy,
            background,
            wireless,
        }
    }

    /// Wireless positioning is only attempted as the last fallback when `wifi_enabled` is set.
    #[instrument(skip(self), fields(method = %method))]
    pub async fn locate(&self, method: LocationMethod, wifi_enabled: bool) -> Option<LocationCandidate> {
        info!("🧭 Locating via managed location service...");
        let _init = InitTask::spawn(self.client.clone());

        let outcome = poll_until(&self.policy, self.sleeper.as_ref(), |_| self.client.last_location()).await;
        match outcome {
            PollOutcome::Ready { value, attempts } => {
                info!(attempts, "🧭 Locating via managed location service... OK");
                return Some(LocationCandidate::from_fix(value, method));
            }
            PollOutcome::Exhausted { attempts } => {
                warn!(attempts, "🧭 Locating via managed location service... failed, no location, falling back");
            }
            PollOutcome::Interrupted { attempts } => {
                warn!(attempts, "🧭 Locating via managed location service... interrupted");
                return None;
            }
        }

        if let Some(candidate) = self.background.locate(method).await {
            return Some(candidate);
        }

        if !wifi_enabled {
            debug!("Wifi disabled, skipping wireless fallback");
            return None;
        }

        match self.wireless.locate().await {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!("⚠️ Wireless fallback failed: {}", e);
                None
            }
        }
    }
}
