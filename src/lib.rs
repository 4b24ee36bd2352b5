pub mod acquirer;
pub mod app_config;
pub mod bootstrap;
pub mod device;
pub mod domain;
mod fix_deserializer;
pub mod geolocation;
pub mod http_client;
pub mod last_known_location;
pub mod locator;
pub mod notifier;
pub mod platform;
pub mod probe;
pub mod record;
pub mod retry;
pub mod scheduler;

#[cfg(test)]
mod test_support;
