use crate::domain::{AccessPoint, Fix};
use crate::retry::{PollOrder, RetryPolicy};
use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    acquisition: Acquisition,
    resolver: Endpoint,
    reporter: Endpoint,
    #[serde(default)]
    schedule: Schedule,
    #[serde(default)]
    device: DeviceProfile,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("BEACON").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn acquisition(&self) -> &Acquisition {
        &self.acquisition
    }

    pub fn resolver(&self) -> &Endpoint {
        &self.resolver
    }

    pub fn reporter(&self) -> &Endpoint {
        &self.reporter
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Acquisition {
    managed_poll_attempts: usize,
    #[serde(with = "humantime_serde")]
    managed_poll_interval: Duration,
    background_max_retries: usize,
    #[serde(with = "humantime_serde")]
    background_poll_interval: Duration,
}

impl Acquisition {
    pub fn managed_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.managed_poll_attempts, self.managed_poll_interval, PollOrder::WaitFirst)
    }

    pub fn background_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.background_max_retries, self.background_poll_interval, PollOrder::PollFirst)
    }
}

impl Default for Acquisition {
    fn default() -> Self {
        Acquisition {
            managed_poll_attempts: 6,
            managed_poll_interval: Duration::from_secs(2),
            background_max_retries: 3,
            background_poll_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Endpoint {
    url: String,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Endpoint {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Schedule {
    cron: Option<String>,
}

impl Schedule {
    pub fn cron(&self) -> Option<&str> {
        self.cron.as_deref()
    }
}

/// Capabilities of a device that is described in configuration instead of queried from the OS.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub gps_enabled: bool,
    pub network_enabled: bool,
    pub wifi_enabled: bool,
    pub fine_location_granted: bool,
    pub coarse_location_granted: bool,
    pub location_client_reachable: bool,
    pub runtime_permission_gating: bool,
    pub fix: Option<Fix>,
    pub access_points: Vec<AccessPoint>,
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                acquisition: Acquisition::default(),
                resolver: Endpoint {
                    url: "https://resolver.url/".to_string(),
                    api_key: Some("key".to_string()),
                    timeout: Duration::from_secs(1),
                },
                reporter: Endpoint {
                    url: "https://reporter.url/".to_string(),
                    api_key: Some("key".to_string()),
                    timeout: Duration::from_secs(1),
                },
                schedule: Schedule::default(),
                device: DeviceProfile::default(),
            },
        }
    }

    pub fn resolver_url(mut self, url: String) -> Self {
        self.config.resolver.url = url;
        self
    }

    pub fn reporter_url(mut self, url: String) -> Self {
        self.config.reporter.url = url;
        self
    }

    pub fn device(mut self, device: DeviceProfile) -> Self {
        self.config.device = device;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
