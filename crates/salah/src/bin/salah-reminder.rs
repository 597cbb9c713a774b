//! Runs the reminder loop for one location and logs every reminder.
//!
//! Usage: `salah-reminder [LOCATION_ID]`, e.g. `salah-reminder "Muscat, Oman"`.
//! Without an argument the location comes from `SALAH_LOCATION`, then from
//! IP geolocation.

use anyhow::Context;
use salah::{
    detect_location_id, LogSink, Location, NotificationSink, ReminderConfig, ReminderService,
    Source, SystemClock,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ReminderConfig::from_env().context("invalid SALAH_* environment")?;
    if let Some(id) = std::env::args().nth(1) {
        config = config.location(id);
    }
    config.validate()?;

    let sink = LogSink;
    let location = match config.resolved_location()? {
        Some(location) => location,
        None => detected_location(&config, &sink).await,
    };
    let source = Source::for_location(location, &config.sources).context("could not build source")?;
    info!(%location, "starting salah reminders");

    let handle = ReminderService::spawn(source, sink, SystemClock, &config);
    tokio::signal::ctrl_c().await.context("could not listen for Ctrl-C")?;
    info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

/// Falls back to the default location, with a notice, when detection fails
/// or finds an unsupported place.
async fn detected_location(config: &ReminderConfig, sink: &impl NotificationSink) -> Location {
    let fallback = Location::default();
    let id = match detect_location_id(&config.sources).await {
        Ok(id) => id,
        Err(err) => {
            warn!(error = %err, "location detection failed");
            sink.notify(
                "Location unknown",
                &format!("Could not detect your location. Showing times for {}.", fallback),
            );
            return fallback;
        }
    };

    match Location::from_id(&id) {
        Ok(location) => location,
        Err(_) => {
            warn!(detected = %id, "detected location is not supported");
            sink.notify(
                "Location not supported",
                &format!("{} is not supported yet. Showing times for {}.", id, fallback),
            );
            fallback
        }
    }
}
