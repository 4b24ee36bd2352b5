use crate::domain::{LocationCandidate, LocationMethod};
use crate::notifier::{FailureNotifier, STATUS_FAILED};
use crate::platform::BackgroundService;
use crate::retry::{PollOutcome, RetryPolicy, Sleeper, poll_until};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Locates the device through a background service that publishes to a shared store.
#[derive(Debug)]
pub struct BackgroundLocator {
    service: Arc<dyn BackgroundService>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    notifier: FailureNotifier,
}

/// Stops the service when dropped, whichever way the locator exits.
struct RunningService<'a>(&'a dyn BackgroundService);

impl Drop for RunningService<'_> {
    fn drop(&mut self) {
        self.0.stop();
        debug!("🛠️ Stopped background location service");
    }
}

impl BackgroundLocator {
    pub fn new(service: Arc<dyn BackgroundService>, sleeper: Arc<dyn Sleeper>, policy: RetryPolicy, notifier: FailureNotifier) -> Self {
        BackgroundLocator {
            service,
            sleeper,
            policy,
            notifier,
        }
    }

    #[instrument(skip(self), fields(method = %method))]
    pub async fn locate(&self, method: LocationMethod) -> Option<LocationCandidate> {
        info!("🛠️ Locating via background service...");
        self.service.start();
        let _running = RunningService(self.service.as_ref());

        let outcome = poll_until(&self.policy, self.sleeper.as_ref(), |_| {
            let candidate = self.service.last_location();
            candidate.is_valid().then_some(candidate)
        })
        .await;

        match outcome {
            PollOutcome::Ready { value, attempts } => {
                info!(attempts, "🛠️ Locating via background service... OK");
                Some(value.with_method(method))
            }
            PollOutcome::Exhausted { attempts } => {
                warn!(attempts, "🛠️ Locating via background service... failed, no valid location");
                None
            }
            PollOutcome::Interrupted { attempts } => {
                warn!(attempts, "🛠️ Locating via background service... interrupted");
                self.notifier.notify("Waiting for the background location service was interrupted", STATUS_FAILED).await;
                None
            }
        }
    }
}
