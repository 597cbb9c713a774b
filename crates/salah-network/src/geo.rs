//! IP-based location detection.
//!
//! The result is a `City, Country` identifier; whether it is supported is
//! for the caller to decide (see [`crate::Location::from_id`]).

use crate::config::SourceConfig;
use crate::http;
use salah_types::SalahError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    country_name: Option<String>,
}

/// Looks up the caller's public IP and returns e.g. `"Muscat, Oman"`.
///
/// # Errors
///
/// [`SalahError::Transport`] if the endpoint cannot be reached or answers
/// with an error, [`SalahError::Parse`] if the answer lacks a country.
pub async fn detect_location_id(config: &SourceConfig) -> Result<String, SalahError> {
    let client = http::build_client(config)?;
    let url = config.locator_url.as_str();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SalahError::transport(format!("location lookup failed: {e}")))?
        .error_for_status()
        .map_err(|e| SalahError::transport(format!("location lookup failed: {e}")))?;

    let data: IpApiResponse = response
        .json()
        .await
        .map_err(|e| SalahError::parse(format!("unreadable location response: {e}")))?;

    let country = data
        .country_name
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| SalahError::parse("location response has no country"))?;

    let id = match data.city.filter(|c| !c.trim().is_empty()) {
        Some(city) => format!("{}, {}", city.trim(), country.trim()),
        None => country.trim().to_string(),
    };
    tracing::debug!(location = id.as_str(), "detected location");
    Ok(id)
}
