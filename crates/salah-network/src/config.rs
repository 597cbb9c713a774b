//! Endpoints and HTTP behaviour for the prayer-table sources.

use salah_types::SalahError;
use serde::{Deserialize, Serialize};

pub const KELOWNA_URL: &str = "https://org.thebcma.com/kelowna";
pub const MUSCAT_URL: &str =
    "https://prayer-times.muslimpro.com/en/Prayer-times-adhan-Muscat-Oman-287286";
pub const LOCATOR_URL: &str = "https://ipapi.co/json/";

/// Configuration shared by every source adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Page publishing today's BCMA Kelowna table.
    pub kelowna_url: String,
    /// MuslimPro monthly table for Muscat, without the `date` query.
    pub muscat_url: String,
    /// IP geolocation endpoint returning `city` and `country_name`.
    pub locator_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Defaults to `salah-reminder/<version>`.
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kelowna_url: KELOWNA_URL.to_string(),
            muscat_url: MUSCAT_URL.to_string(),
            locator_url: LOCATOR_URL.to_string(),
            timeout_seconds: 10,
            user_agent: None,
        }
    }
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), SalahError> {
        if self.timeout_seconds == 0 {
            return Err(SalahError::invalid_config("timeout_seconds must be greater than 0"));
        }
        for (field, url) in [
            ("kelowna_url", &self.kelowna_url),
            ("muscat_url", &self.muscat_url),
            ("locator_url", &self.locator_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(SalahError::invalid_config(format!(
                    "{} must be an http(s) URL, got {:?}",
                    field, url
                )));
            }
        }
        Ok(())
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("salah-reminder/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SourceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.user_agent().starts_with("salah-reminder/"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SourceConfig { timeout_seconds: 0, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let config = SourceConfig { muscat_url: "ftp://example.com".into(), ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("muscat_url"));
    }

    #[test]
    fn test_custom_user_agent() {
        let config =
            SourceConfig { user_agent: Some("TestAgent/1.0".into()), ..Default::default() };
        assert_eq!(config.user_agent(), "TestAgent/1.0");
    }
}
