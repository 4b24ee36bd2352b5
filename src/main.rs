use beacon::app_config::AppConfig;
use beacon::{bootstrap, scheduler};
use tokio::sync::watch;
use tokio::task;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    task::spawn(scheduler::forward_shutdown(tokio::signal::ctrl_c(), shutdown_tx));

    let acquirer = bootstrap::acquirer(&config, shutdown_rx.clone())?;
    info!("✅  Initialized location acquirer");
    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    scheduler::run(&acquirer, config.schedule(), shutdown_rx).await?;

    Ok(())
}
