//! Latch Services Layer
//!
//! Host-side plumbing for grid users: settings files and logging setup.

pub mod settings;

pub use settings::{LoggingSettings, Settings, SettingsError};

/// Install the global `tracing` subscriber at the configured level.
///
/// Returns an error if the level string is not a valid `tracing::Level`.
/// Calling this twice keeps the first subscriber.
pub fn init_services(settings: &Settings) -> Result<(), SettingsError> {
    let level = settings.logging.level()?;
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .is_ok();
    tracing::debug!(%level, installed, "logging initialized");
    Ok(())
}
