use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio_retry::strategy::FixedInterval;
use tracing::trace;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("wait was interrupted")]
pub struct Interrupted;

#[async_trait]
pub trait Sleeper: Debug + Send + Sync {
    async fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

/// Sleeps on the tokio timer, optionally cut short by a shutdown signal.
#[derive(Clone, Debug, Default)]
pub struct TokioSleeper {
    shutdown: Option<watch::Receiver<bool>>,
}

impl TokioSleeper {
    pub fn new() -> Self {
        TokioSleeper { shutdown: None }
    }

    pub fn with_shutdown(shutdown: watch::Receiver<bool>) -> Self {
        TokioSleeper { shutdown: Some(shutdown) }
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let Some(shutdown) = &self.shutdown else {
            tokio::time::sleep(duration).await;
            return Ok(());
        };

        let mut shutdown = shutdown.clone();
        if *shutdown.borrow() {
            return Err(Interrupted);
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            Ok(_) = shutdown.wait_for(|stop| *stop) => Err(Interrupted),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOrder {
    /// Wait one interval before every poll.
    WaitFirst,
    /// Poll immediately, wait one interval after every miss.
    PollFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    interval: Duration,
    order: PollOrder,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, interval: Duration, order: PollOrder) -> Self {
        RetryPolicy {
            max_attempts,
            interval,
            order,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn delays(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.interval).take(self.max_attempts)
    }
}

/// Progress of a polling loop, handed to the poll function on every attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollState {
    pub attempt: usize,
    pub max_attempts: usize,
    pub interval: Duration,
}

#[derive(Debug, PartialEq)]
pub enum PollOutcome<T> {
    Ready { value: T, attempts: usize },
    Exhausted { attempts: usize },
    Interrupted { attempts: usize },
}

/// Polls until `poll` yields a value or the policy runs out of attempts. The first value wins.
pub async fn poll_until<T, F>(policy: &RetryPolicy, sleeper: &dyn Sleeper, mut poll: F) -> PollOutcome<T>
where
    F: FnMut(&PollState) -> Option<T>,
{
    let mut attempts = 0;
    for delay in policy.delays() {
        if policy.order == PollOrder::WaitFirst && sleeper.sleep(delay).await.is_err() {
            return PollOutcome::Interrupted { attempts };
        }

        attempts += 1;
        let state = PollState {
            attempt: attempts,
            max_attempts: policy.max_attempts,
            interval: policy.interval,
        };
        if let Some(value) = poll(&state) {
            return PollOutcome::Ready { value, attempts };
        }
        trace!(attempt = state.attempt, max_attempts = state.max_attempts, "Nothing yet");

        if policy.order == PollOrder::PollFirst && sleeper.sleep(delay).await.is_err() {
            return PollOutcome::Interrupted { attempts };
        }
    }

    PollOutcome::Exhausted { attempts }
}
