//! Reminder engine settings.

use chrono::Duration;
use salah_network::{Location, SourceConfig};
use salah_types::SalahError;
use serde::{Deserialize, Serialize};

use crate::scheduler::ReminderFilter;

pub const DEFAULT_RETRY_BACKOFF_SECONDS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Location id such as `"Muscat, Oman"`. `None` means detect it.
    pub location_id: Option<String>,
    /// Wait between failed refreshes.
    pub retry_backoff_seconds: u64,
    pub remind_sunrise: bool,
    pub remind_iqamah: bool,
    pub sources: SourceConfig,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            location_id: None,
            retry_backoff_seconds: DEFAULT_RETRY_BACKOFF_SECONDS,
            remind_sunrise: true,
            remind_iqamah: true,
            sources: SourceConfig::default(),
        }
    }
}

impl ReminderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, id: impl Into<String>) -> Self {
        self.location_id = Some(id.into());
        self
    }

    pub fn retry_backoff_seconds(mut self, seconds: u64) -> Self {
        self.retry_backoff_seconds = seconds;
        self
    }

    pub fn remind_sunrise(mut self, enabled: bool) -> Self {
        self.remind_sunrise = enabled;
        self
    }

    pub fn remind_iqamah(mut self, enabled: bool) -> Self {
        self.remind_iqamah = enabled;
        self
    }

    pub fn sources(mut self, sources: SourceConfig) -> Self {
        self.sources = sources;
        self
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::seconds(self.retry_backoff_seconds.min(86_400) as i64)
    }

    pub fn filter(&self) -> ReminderFilter {
        ReminderFilter {
            sunrise: self.remind_sunrise,
            iqamah: self.remind_iqamah,
        }
    }

    /// Resolves the configured location, if any.
    pub fn resolved_location(&self) -> Result<Option<Location>, SalahError> {
        self.location_id.as_deref().map(Location::from_id).transpose()
    }

    pub fn validate(&self) -> Result<(), SalahError> {
        if self.retry_backoff_seconds == 0 {
            return Err(SalahError::invalid_config("retry_backoff_seconds must be greater than 0"));
        }
        // About a day; longer waits would skip a whole rollover.
        if self.retry_backoff_seconds > 86_400 {
            return Err(SalahError::invalid_config("retry_backoff_seconds must not exceed 86400"));
        }
        self.sources.validate()?;
        self.resolved_location()?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, SalahError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| SalahError::invalid_config(format!("malformed config: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `SALAH_*` variables over the defaults.
    pub fn from_env() -> Result<Self, SalahError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SalahError> {
        let mut config = Self::default();
        if let Some(id) = lookup("SALAH_LOCATION") {
            let id = id.trim();
            if !id.is_empty() {
                config.location_id = Some(id.to_string());
            }
        }
        if let Some(value) = lookup("SALAH_RETRY_SECS") {
            config.retry_backoff_seconds = parse_var("SALAH_RETRY_SECS", &value)?;
        }
        if let Some(value) = lookup("SALAH_REMIND_SUNRISE") {
            config.remind_sunrise = parse_flag("SALAH_REMIND_SUNRISE", &value)?;
        }
        if let Some(value) = lookup("SALAH_REMIND_IQAMAH") {
            config.remind_iqamah = parse_flag("SALAH_REMIND_IQAMAH", &value)?;
        }
        if let Some(value) = lookup("SALAH_TIMEOUT_SECS") {
            config.sources.timeout_seconds = parse_var("SALAH_TIMEOUT_SECS", &value)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_var(key: &str, value: &str) -> Result<u64, SalahError> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            SalahError::invalid_config(format!("{} must be a whole number, got {:?}", key, value))
        })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SalahError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SalahError::invalid_config(format!(
            "{} must be true or false, got {:?}",
            key, value
        ))),
    }
}
