//! Error types and handling for the `wxbrief` library

use thiserror::Error;

/// Main error type for the `wxbrief` library
#[derive(Error, Debug)]
pub enum WxBriefError {
    /// The feed answered with something other than the expected record sequence
    #[error("Invalid response from weather feed: {message}")]
    InvalidResponse { message: String },

    /// A station lookup matched no record
    #[error("Station not found: {station}")]
    StationNotFound { station: String },

    /// The METAR decoder was given unusable input
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP transport errors from the fetch client
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// API communication errors that are not transport failures
    #[error("API error: {message}")]
    Api { message: String },
}

impl WxBriefError {
    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new station-not-found error
    pub fn station_not_found<S: Into<String>>(station: S) -> Self {
        Self::StationNotFound {
            station: station.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}
