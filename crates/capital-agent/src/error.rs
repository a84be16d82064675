//! Error Types for the capital agent tools

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Failures of the outbound weather lookup.
///
/// The Display strings are what the temperature tool hands to the model.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Failed to call weather API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Weather API returned status: {0}")]
    Status(StatusCode),

    #[error("Failed to read API response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Failed to parse weather JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid weather configuration: {0}")]
    Config(String),
}

impl WeatherError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Body(_) | Self::Decode(_) | Self::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_embeds_status_text() {
        let err = WeatherError::Status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            err.to_string(),
            "Weather API returned status: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(WeatherError::Status(StatusCode::BAD_GATEWAY).is_transient());
        assert!(WeatherError::Status(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(!WeatherError::Status(StatusCode::NOT_FOUND).is_transient());

        let decode = serde_json::from_str::<u8>("nope").unwrap_err();
        assert!(!WeatherError::Decode(decode).is_transient());
    }
}
