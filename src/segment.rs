//! Raw fixed-format text segmentation
//!
//! The geographic-bounds query path can answer with plain newline-delimited
//! report text instead of structured records. This module splits such a blob
//! into per-station raw records. Only the station identifier and the raw
//! text are recoverable here; every other field stays absent.

use tracing::debug;

use crate::models::{StationObservation, TerminalForecast};

/// Four uppercase ASCII letters, the ICAO station identifier shape
fn is_station_id(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_uppercase())
}

/// `DDHHMMZ` observation/issue time token shape
fn is_time_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 7 && bytes[..6].iter().all(u8::is_ascii_digit) && bytes[6] == b'Z'
}

/// Whether a line opens a new forecast record: `(TAF )?XXXX DDHHMMZ`
fn is_forecast_start(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("TAF ").unwrap_or(line);
    let mut tokens = rest.split_whitespace();
    let station = tokens.next()?;
    let time = tokens.next()?;
    (is_station_id(station) && is_time_token(time)).then_some(station)
}

/// Segment observation text: one record per non-blank line.
///
/// The first whitespace-delimited token must look like a station identifier;
/// lines where it does not are dropped silently.
#[must_use]
pub fn segment_raw_observation_text(text: &str) -> Vec<StationObservation> {
    let mut records = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(first) = trimmed.split_whitespace().next() else {
            continue;
        };
        if is_station_id(first) {
            records.push(StationObservation::from_raw(
                first.to_string(),
                trimmed.to_string(),
            ));
        } else {
            debug!(line = trimmed, "dropping line without station identifier");
        }
    }
    records
}

/// Segment forecast text: records span multiple lines.
///
/// A line matching `(TAF )?XXXX DDHHMMZ` opens a new record; other lines are
/// appended to the record being accumulated. Accumulated lines are joined
/// with single spaces, which is lossy for fields the original separated with
/// line breaks. Lines seen before any recognized record start are dropped.
#[must_use]
pub fn segment_raw_forecast_text(text: &str) -> Vec<TerminalForecast> {
    let mut records = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(station) = is_forecast_start(trimmed) {
            if let Some((station, lines)) = current.take() {
                records.push(TerminalForecast::from_raw(station, lines.join(" ")));
            }
            current = Some((station.to_string(), vec![trimmed.to_string()]));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(trimmed.to_string());
        } else {
            debug!(line = trimmed, "dropping forecast line before any record start");
        }
    }
    if let Some((station, lines)) = current {
        records.push(TerminalForecast::from_raw(station, lines.join(" ")));
    }
    records
}
