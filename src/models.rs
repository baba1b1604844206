//! Canonical data models for aviation weather reports
//!
//! All entities here are plain value objects produced fresh per parse call.
//! Nothing owns anything else and there is no store behind them; the caller
//! owns each parsed record's lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ceiling/visibility flight category, ordered best to worst.
///
/// The derived `Ord` follows declaration order, so `Vfr < Mvfr < Ifr < Lifr`
/// and "worse" compares greater. `classify` relies on this when ceiling and
/// visibility fall in different buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
}

impl std::fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
        };
        write!(f, "{s}")
    }
}

/// Cloud cover amount codes from surface observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudCover {
    Few,
    Sct,
    Bkn,
    Ovc,
    Clr,
    Skc,
}

impl CloudCover {
    /// Whether this cover amount can form a ceiling
    #[must_use]
    pub fn is_ceiling(self) -> bool {
        matches!(self, CloudCover::Bkn | CloudCover::Ovc)
    }
}

/// A single reported cloud layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudLayer {
    /// Cover amount
    pub cover: CloudCover,
    /// Layer base in feet AGL; `CLR`/`SKC` layers never carry one
    pub base_ft_agl: Option<f64>,
}

/// A surface observation (METAR) in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationObservation {
    /// Raw report text as received
    pub raw: String,
    /// ICAO station identifier
    pub station: String,
    /// Observation time
    pub time: Option<DateTime<Utc>>,
    /// Temperature in degrees Celsius
    pub temperature_c: Option<f64>,
    /// Dewpoint in degrees Celsius
    pub dewpoint_c: Option<f64>,
    /// Wind direction in degrees true
    pub wind_dir_deg: Option<f64>,
    /// Wind speed in knots
    pub wind_speed_kt: Option<f64>,
    /// Wind gust in knots
    pub wind_gust_kt: Option<f64>,
    /// Visibility in statute miles (fractional allowed)
    pub visibility_sm: Option<f64>,
    /// Altimeter setting in inHg
    pub altimeter_in_hg: Option<f64>,
    /// Cloud layers in reported order
    pub cloud_layers: Vec<CloudLayer>,
    /// Present-weather phenomenon codes
    pub weather: Vec<String>,
    /// Remarks section, verbatim
    pub remarks: Option<String>,
    /// Derived ceiling/visibility category; equals what
    /// `classify_flight_category` returns for this record's ceiling and
    /// visibility whenever present
    pub flight_category: Option<FlightCategory>,
}

impl StationObservation {
    /// A raw-text-only record as produced by the text segmenter
    #[must_use]
    pub fn from_raw(station: String, raw: String) -> Self {
        Self {
            raw,
            station,
            time: None,
            temperature_c: None,
            dewpoint_c: None,
            wind_dir_deg: None,
            wind_speed_kt: None,
            wind_gust_kt: None,
            visibility_sm: None,
            altimeter_in_hg: None,
            cloud_layers: Vec::new(),
            weather: Vec::new(),
            remarks: None,
            flight_category: None,
        }
    }

    /// Ceiling in feet AGL: base of the lowest broken or overcast layer
    #[must_use]
    pub fn ceiling_ft(&self) -> Option<f64> {
        ceiling_from_layers(&self.cloud_layers)
    }
}

/// Base of the lowest layer whose cover contributes to a ceiling
#[must_use]
pub fn ceiling_from_layers(layers: &[CloudLayer]) -> Option<f64> {
    layers
        .iter()
        .filter(|layer| layer.cover.is_ceiling())
        .filter_map(|layer| layer.base_ft_agl)
        .fold(None, |lowest, base| match lowest {
            Some(current) if current <= base => Some(current),
            _ => Some(base),
        })
}

/// Change indicator for a forecast period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ForecastChange {
    Fm,
    Tempo,
    Becmg,
    Prob,
}

/// One period within a terminal forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    /// Period start
    pub time_from: Option<DateTime<Utc>>,
    /// Period end
    pub time_to: Option<DateTime<Utc>>,
    /// Change indicator, absent for the base period
    pub change: Option<ForecastChange>,
    /// Probability in percent for PROB groups
    pub probability: Option<f64>,
    /// Wind direction in degrees true
    pub wind_dir_deg: Option<f64>,
    /// Wind speed in knots
    pub wind_speed_kt: Option<f64>,
    /// Wind gust in knots
    pub wind_gust_kt: Option<f64>,
    /// Visibility in statute miles
    pub visibility_sm: Option<f64>,
    /// Forecast weather phenomenon codes
    pub weather: Vec<String>,
    /// Forecast cloud layers in reported order
    pub cloud_layers: Vec<CloudLayer>,
}

/// A terminal aerodrome forecast (TAF) in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalForecast {
    /// Raw forecast text as received
    pub raw: String,
    /// ICAO station identifier
    pub station: String,
    /// Issue time
    pub issue_time: Option<DateTime<Utc>>,
    /// Start of the validity window
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window
    pub valid_to: Option<DateTime<Utc>>,
    /// Forecast periods in reported order
    pub periods: Vec<ForecastPeriod>,
}

impl TerminalForecast {
    /// A raw-text-only record as produced by the text segmenter
    #[must_use]
    pub fn from_raw(station: String, raw: String) -> Self {
        Self {
            raw,
            station,
            issue_time: None,
            valid_from: None,
            valid_to: None,
            periods: Vec::new(),
        }
    }
}

/// Urgency of a pilot report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportUrgency {
    Routine,
    Urgent,
}

/// Turbulence intensity, worst first so a table walk is safety-biased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TurbulenceIntensity {
    Extreme,
    Severe,
    Moderate,
    Light,
}

/// Icing intensity, worst first so a table walk is safety-biased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IcingIntensity {
    Severe,
    Moderate,
    Light,
    Trace,
}

/// Reported turbulence conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceReport {
    pub intensity: TurbulenceIntensity,
    /// Turbulence type (CHOP, CAT, ...)
    pub turbulence_type: Option<String>,
}

/// Reported icing conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcingReport {
    pub intensity: IcingIntensity,
    /// Icing type (RIME, CLR, MXD, ...)
    pub icing_type: Option<String>,
}

/// A pilot report (PIREP) in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotReport {
    /// Raw report text as received
    pub raw: String,
    /// Observation time
    pub time: Option<DateTime<Utc>>,
    /// Report urgency; UUA reports are urgent
    pub urgency: ReportUrgency,
    /// Reporting aircraft type
    pub aircraft_type: Option<String>,
    /// Location as reported (fix/bearing/distance string)
    pub location: String,
    /// Altitude in feet MSL
    pub altitude_ft: Option<f64>,
    /// Turbulence conditions, if reported
    pub turbulence: Option<TurbulenceReport>,
    /// Icing conditions, if reported
    pub icing: Option<IcingReport>,
    /// Weather phenomenon codes, if reported
    pub weather: Vec<String>,
    /// Remarks, verbatim
    pub remarks: Option<String>,
}

/// AIRMET hazard classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardType {
    Ifr,
    MountainObscuration,
    Turbulence,
    Icing,
    LowLevelWindShear,
    StrongSurfaceWinds,
}

/// Kind of area advisory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HazardKind {
    /// AIRMET hazards come from a closed enumeration
    Airmet(HazardType),
    /// SIGMET hazards are open strings with an optional severity
    Sigmet {
        hazard: String,
        severity: Option<String>,
    },
}

/// An area advisory (AIRMET or SIGMET) in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaHazard {
    /// Raw advisory text as received
    pub raw: String,
    /// Hazard classification
    pub kind: HazardKind,
    /// Start of the validity window
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window
    pub valid_to: Option<DateTime<Utc>>,
    /// Advisory area identifier
    pub area: Option<String>,
    /// Free-text hazard description
    pub description: Option<String>,
}

/// Station metadata returned by station lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    /// ICAO station identifier
    pub station: String,
    /// Station name
    pub name: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
    /// Field elevation in meters
    pub elevation_m: Option<f64>,
}
