//! `wxbrief` - aviation weather report normalization and classification
//!
//! This library turns heterogeneous, loosely-typed aviation weather feed
//! data (JSON with historically unstable field names, or raw fixed-format
//! text) into canonical strongly-typed reports, derives the VFR/MVFR/IFR/
//! LIFR flight category from ceiling and visibility, and decodes raw METAR
//! strings into human-readable prose.

pub mod category;
pub mod client;
pub mod clouds;
pub mod config;
pub mod decoder;
pub mod error;
pub mod mapper;
pub mod models;
pub mod normalize;
pub mod segment;

// Re-export core types for the public API
pub use category::classify_flight_category;
pub use client::FeedClient;
pub use config::WxBriefConfig;
pub use decoder::decode_raw_metar;
pub use error::WxBriefError;
pub use mapper::{
    lookup_station, parse_area_hazards, parse_forecasts, parse_observations, parse_pilot_reports,
};
pub use models::{
    AreaHazard, CloudCover, CloudLayer, FlightCategory, PilotReport, StationInfo,
    StationObservation, TerminalForecast,
};
pub use segment::{segment_raw_forecast_text, segment_raw_observation_text};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WxBriefError>;
