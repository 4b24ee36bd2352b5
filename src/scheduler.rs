use crate::acquirer::LocationAcquirer;
use crate::app_config::Schedule;
use crate::record::UploadRecord;
use chrono::Utc;
use std::future::Future;
use std::io;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("invalid cron expression '{expression}': {source}")]
    InvalidCron {
        expression: String,
        #[source]
        source: cron::error::Error,
    },
}

/// Acquires the location once, or on every tick of the configured cron schedule until shutdown.
#[instrument(skip_all)]
pub async fn run(acquirer: &LocationAcquirer, schedule: &Schedule, mut shutdown: WatchReceiver<bool>) -> Result<(), SchedulerError> {
    let Some(expression) = schedule.cron() else {
        report_location(acquirer).await;
        return Ok(());
    };

    debug!("🕗 Scheduling location acquisition...");
    let cron = cron::Schedule::from_str(expression).map_err(|source| SchedulerError::InvalidCron {
        expression: expression.to_string(),
        source,
    })?;
    info!(schedule = expression, "🕗 Scheduling location acquisition... OK");

    for datetime in cron.upcoming(Utc) {
        let duration = datetime.signed_duration_since(Utc::now());
        if duration.num_milliseconds() < 0 {
            continue; // Already passed
        }

        let scheduled_instant = Instant::now() + Duration::from_millis(duration.num_milliseconds() as u64);
        tokio::select! {
            _ = sleep_until(scheduled_instant) => {}
            Ok(_) = shutdown.wait_for(|stop| *stop) => {
                info!("🛑 Stopping scheduled location acquisition");
                return Ok(());
            }
        }

        debug!("🕗 Running scheduled location acquisition...");
        report_location(acquirer).await;
    }

    Ok(())
}

/// Flips `shutdown` once `signal` fires. When the signal cannot be listened for, the sender is held
/// forever and shutdown is never requested.
pub async fn forward_shutdown(signal: impl Future<Output = io::Result<()>>, shutdown: WatchSender<bool>) {
    match signal.await {
        Ok(()) => {
            info!("🛑 Received shutdown signal");
            shutdown.send_replace(true);
        }
        Err(e) => {
            warn!("⚠️ Could not listen for the shutdown signal, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn report_location(acquirer: &LocationAcquirer) {
    let Some(record) = acquirer.acquire_record().await else {
        warn!("📦 No location available this cycle");
        return;
    };

    match serde_json::to_string(&record) {
        Ok(json) => info!(data = UploadRecord::NAME, "📦 Ready for upload: {}", json),
        Err(e) => warn!("⚠️ Could not serialize the upload record: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquirer::Collaborators;
    use crate::app_config::Acquisition;
    use crate::domain::{LocationCandidate, ProviderAvailability};
    use crate::test_support::{
        FakeCapabilities, FakeResolver, FakeScanner, RecordingReporter, RecordingSleeper, ScriptedBackgroundService, ScriptedLocationClient,
        access_point,
    };
    use config::{Config, FileFormat};
    use std::sync::Arc;
    use test_log::test;
    use tokio::sync::watch;

    fn acquirer(resolver: Arc<FakeResolver>) -> LocationAcquirer {
        let collaborators = Collaborators {
            capabilities: Arc::new(FakeCapabilities::new(ProviderAvailability {
                wifi_enabled: true,
                ..Default::default()
            })),
            location_client: Arc::new(ScriptedLocationClient::never_resolving()),
            background_service: Arc::new(ScriptedBackgroundService::never_valid()),
            scanner: Arc::new(FakeScanner::new(Some(vec![access_point("00:11:22:33:44:55")]))),
            resolver,
            reporter: Arc::new(RecordingReporter::new()),
            sleeper: Arc::new(RecordingSleeper::new()),
        };

        LocationAcquirer::new(collaborators, &Acquisition::default())
    }

    fn schedule(toml: &str) -> Schedule {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test(tokio::test)]
    async fn acquires_once_without_a_cron_expression() {
        let resolver = Arc::new(FakeResolver::resolving(LocationCandidate::new(40.0, -3.7, 15.0)));
        let (_tx, rx) = watch::channel(false);

        run(&acquirer(resolver.clone()), &Schedule::default(), rx).await.unwrap();

        assert_eq!(resolver.calls(), 1);
    }

    #[test(tokio::test)]
    async fn rejects_an_invalid_cron_expression() {
        let resolver = Arc::new(FakeResolver::failing());
        let (_tx, rx) = watch::channel(false);

        let result = run(&acquirer(resolver.clone()), &schedule(r#"cron = "every tuesday""#), rx).await;

        assert!(matches!(result, Err(SchedulerError::InvalidCron { .. })));
        assert_eq!(resolver.calls(), 0);
    }

    #[test(tokio::test)]
    async fn forwards_a_received_signal() {
        let (tx, rx) = watch::channel(false);

        forward_shutdown(async { Ok(()) }, tx).await;

        assert!(*rx.borrow());
    }

    #[test(tokio::test)]
    async fn keeps_running_when_the_signal_is_unavailable() {
        let (tx, mut rx) = watch::channel(false);

        let handle = tokio::spawn(forward_shutdown(async { Err(io::Error::other("signals unsupported")) }, tx));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(!*rx.borrow_and_update());
        assert_eq!(rx.has_changed().ok(), Some(false));
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[test(tokio::test)]
    async fn stops_when_shutdown_was_requested() {
        let resolver = Arc::new(FakeResolver::failing());
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = run(&acquirer(resolver.clone()), &schedule(r#"cron = "0 0 0 1 1 * 2099""#), rx).await;

        assert!(result.is_ok());
        assert_eq!(resolver.calls(), 0);
    }
}
