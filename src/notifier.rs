use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const STATUS_FAILED: &str = "failed";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub operation: String,
    pub resource: String,
    pub status: String,
    pub message: String,
}

impl FailureReport {
    pub fn location(status: impl Into<String>, message: impl Into<String>) -> Self {
        FailureReport {
            operation: "get".to_string(),
            resource: "location".to_string(),
            status: status.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait FailureReporter: Debug + Send + Sync {
    async fn report(&self, report: &FailureReport) -> Result<(), ReportError>;
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("report was rejected with status {0}")]
    Rejected(StatusCode),
}

#[derive(Debug)]
pub struct HttpFailureReporter {
    client: Client,
    url: String,
}

impl HttpFailureReporter {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        HttpFailureReporter { client, url: url.into() }
    }
}

#[async_trait]
impl FailureReporter for HttpFailureReporter {
    async fn report(&self, report: &FailureReport) -> Result<(), ReportError> {
        let response = self.client.post(&self.url).json(report).send().await?;
        if !response.status().is_success() {
            return Err(ReportError::Rejected(response.status()));
        }

        Ok(())
    }
}

/// Reports acquisition failures. Delivery problems are logged and never surface to the caller.
#[derive(Clone, Debug)]
pub struct FailureNotifier {
    reporter: Arc<dyn FailureReporter>,
}

impl FailureNotifier {
    pub fn new(reporter: Arc<dyn FailureReporter>) -> Self {
        FailureNotifier { reporter }
    }

    #[instrument(skip(self, reason))]
    pub async fn notify(&self, reason: impl Into<String>, status: &str) {
        let report = FailureReport::location(status, reason);
        info!(reason = %report.message, "📣 Reporting location failure...");

        match self.reporter.report(&report).await {
            Ok(()) => info!("📣 Reporting location failure... OK"),
            Err(e) => warn!("⚠️ Reporting location failure... failed, {}", e),
        }
    }
}
