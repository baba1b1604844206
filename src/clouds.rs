//! Cloud-layer normalization for loosely-typed feed entries

use serde_json::Value;

use crate::models::{CloudCover, CloudLayer};
use crate::normalize::coerce_number;

/// Base-altitude field names in priority order, with the factor that brings
/// the value to feet. `hgt` is the legacy hundreds-of-feet encoding.
const BASE_FIELDS: &[(&str, f64)] = &[
    ("base", 1.0),
    ("cloud_base_ft_agl", 1.0),
    ("base_ft_agl", 1.0),
    ("hgt", 100.0),
];

/// Cover-code field names in priority order
const COVER_FIELDS: &[&str] = &["cover", "sky_cover", "cloud_type"];

fn parse_cover(raw: &str) -> Option<CloudCover> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "FEW" => Some(CloudCover::Few),
        "SCT" => Some(CloudCover::Sct),
        "BKN" => Some(CloudCover::Bkn),
        "OVC" => Some(CloudCover::Ovc),
        "CLR" => Some(CloudCover::Clr),
        "SKC" => Some(CloudCover::Skc),
        _ => None,
    }
}

/// Convert one raw cloud entry into a canonical layer.
///
/// Unrecognized or missing cover defaults to `CLR`; a clear layer never
/// carries a base altitude. Base coercion failures degrade to absent.
#[must_use]
pub fn parse_cloud_entry(entry: &Value) -> CloudLayer {
    let cover = COVER_FIELDS
        .iter()
        .filter_map(|key| entry.get(key))
        .filter_map(|v| v.as_str())
        .find_map(parse_cover)
        .unwrap_or(CloudCover::Clr);

    let base_ft_agl = if matches!(cover, CloudCover::Clr | CloudCover::Skc) {
        None
    } else {
        BASE_FIELDS
            .iter()
            .find_map(|(key, factor)| {
                entry
                    .get(key)
                    .filter(|v| !v.is_null())
                    .map(|v| (v, *factor))
            })
            .and_then(|(v, factor)| coerce_number(v).map(|base| base * factor))
    };

    CloudLayer { cover, base_ft_agl }
}

/// Convert a sequence of raw cloud entries, preserving order. No
/// deduplication, no sorting.
#[must_use]
pub fn parse_cloud_layers(entries: &[Value]) -> Vec<CloudLayer> {
    entries.iter().map(parse_cloud_entry).collect()
}
