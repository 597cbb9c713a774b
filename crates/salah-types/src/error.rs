use thiserror::Error;

/// Errors from salah-reminder operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SalahError {
    /// Malformed source markup, date or time text.
    #[error("Failed to parse prayer table: {0}")]
    Parse(String),

    /// Network or fetch failure.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// A schedule that violates the ordering or same-day invariants.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Location identifier not bound to any source.
    #[error("Unsupported location: {id}")]
    UnsupportedLocation { id: String },

    /// The three-day payload could not be assembled.
    #[error("Salah times unavailable: {reason}")]
    PayloadUnavailable { reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl SalahError {
    /// Creates a `Parse` error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse(reason.into())
    }

    /// Creates a `Transport` error.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport(reason.into())
    }

    /// Creates an `UnsupportedLocation` error.
    pub fn unsupported_location(id: impl Into<String>) -> Self {
        Self::UnsupportedLocation { id: id.into() }
    }

    /// Creates a `PayloadUnavailable` error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::PayloadUnavailable { reason: reason.into() }
    }

    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SalahError::unsupported_location("Paris, France").to_string(),
            "Unsupported location: Paris, France"
        );
        assert_eq!(
            SalahError::unavailable("tomorrow missing").to_string(),
            "Salah times unavailable: tomorrow missing"
        );
        assert_eq!(
            SalahError::parse("no date header").to_string(),
            "Failed to parse prayer table: no date header"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SalahError>();
    }
}
