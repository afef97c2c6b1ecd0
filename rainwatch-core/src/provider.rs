use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{Coordinates, Forecast};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Why a forecast could not be obtained for a location.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a readable response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response arrived but is not a usable forecast.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The provider answered with an error status.
    #[error("provider returned {code}: {message}")]
    Provider { code: String, message: String },
}

impl FetchError {
    /// Short label for the failure category.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "network error",
            FetchError::InvalidPayload(_) => "invalid response",
            FetchError::Provider { .. } => "provider error",
        }
    }

    /// One-line description without any response body text.
    pub fn summary(&self) -> String {
        match self {
            FetchError::Transport(_) => "forecast service unreachable".to_string(),
            FetchError::InvalidPayload(_) => "forecast data could not be read".to_string(),
            FetchError::Provider { code, .. } => format!("status {code}"),
        }
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, coordinates: &Coordinates) -> Result<Forecast, FetchError>;
}
