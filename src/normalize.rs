//! Scalar value normalization for loosely-typed feed fields
//!
//! The upstream feed is inconsistent about value encodings: visibility may
//! arrive as a number, `"10+"` or `"P6SM"`; intensities arrive as free-ish
//! strings. Everything here degrades to absent rather than raising; a
//! malformed optional field must never fail a whole record.

use serde_json::Value;

use crate::models::{HazardType, IcingIntensity, TurbulenceIntensity};

/// Coerce a feed value to a number. Accepts JSON numbers and numeric
/// strings; anything else is absent.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Normalize a visibility value to statute miles.
///
/// Historical encodings handled before numeric coercion:
/// a trailing `+` is stripped (`"10+"` is 10) and a leading `P` with a
/// trailing `SM` is stripped (`"P6SM"` is 6).
#[must_use]
pub fn normalize_visibility(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let mut raw = s.trim();
            raw = raw.strip_suffix('+').unwrap_or(raw);
            if let Some(stripped) = raw.strip_prefix('P').and_then(|r| r.strip_suffix("SM")) {
                raw = stripped;
            }
            if raw.is_empty() {
                None
            } else {
                raw.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Walk an ordered intensity table, worst entry first, and return the first
/// whose token appears in `raw` (case-insensitive substring). A report
/// mentioning both SEVERE and LIGHT classifies as SEVERE; the scan order is
/// the safety bias, not an accident of parsing.
#[must_use]
pub fn scan_intensity<T: Copy>(raw: &str, table: &[(&str, T)]) -> Option<T> {
    let upper = raw.to_ascii_uppercase();
    table
        .iter()
        .find(|(token, _)| upper.contains(token))
        .map(|(_, intensity)| *intensity)
}

/// Turbulence intensity tokens, worst first. The feed uses both spelled-out
/// and abbreviated forms (`SEV`, `MOD-SEV`, `LGT`).
pub const TURBULENCE_TABLE: &[(&str, TurbulenceIntensity)] = &[
    ("EXTREME", TurbulenceIntensity::Extreme),
    ("EXTRM", TurbulenceIntensity::Extreme),
    ("SEVERE", TurbulenceIntensity::Severe),
    ("SEV", TurbulenceIntensity::Severe),
    ("MODERATE", TurbulenceIntensity::Moderate),
    ("MOD", TurbulenceIntensity::Moderate),
    ("LIGHT", TurbulenceIntensity::Light),
    ("LGT", TurbulenceIntensity::Light),
];

/// Icing intensity tokens, worst first
pub const ICING_TABLE: &[(&str, IcingIntensity)] = &[
    ("SEVERE", IcingIntensity::Severe),
    ("SEV", IcingIntensity::Severe),
    ("MODERATE", IcingIntensity::Moderate),
    ("MOD", IcingIntensity::Moderate),
    ("LIGHT", IcingIntensity::Light),
    ("LGT", IcingIntensity::Light),
    ("TRACE", IcingIntensity::Trace),
    ("TRC", IcingIntensity::Trace),
];

/// Normalize a turbulence intensity string
#[must_use]
pub fn normalize_turbulence(raw: &str) -> Option<TurbulenceIntensity> {
    scan_intensity(raw, TURBULENCE_TABLE)
}

/// Normalize an icing intensity string
#[must_use]
pub fn normalize_icing(raw: &str) -> Option<IcingIntensity> {
    scan_intensity(raw, ICING_TABLE)
}

/// AIRMET hazard tokens in fixed match order
const HAZARD_TABLE: &[(&str, HazardType)] = &[
    ("IFR", HazardType::Ifr),
    ("OBSC", HazardType::MountainObscuration),
    ("TURB", HazardType::Turbulence),
    ("ICE", HazardType::Icing),
    ("LLWS", HazardType::LowLevelWindShear),
    ("SFC", HazardType::StrongSurfaceWinds),
];

/// Normalize an AIRMET hazard string against the fixed ordered table.
///
/// Unmatched input defaults to IFR. That default is kept for compatibility
/// with the upstream feed's historical behavior even though it can
/// misclassify an unrecognized hazard.
#[must_use]
pub fn normalize_hazard_type(raw: &str) -> HazardType {
    let upper = raw.to_ascii_uppercase();
    HAZARD_TABLE
        .iter()
        .find(|(token, _)| upper.contains(token))
        .map_or(HazardType::Ifr, |(_, hazard)| *hazard)
}
