//! Ceiling/visibility flight-category classification

use crate::models::FlightCategory;

/// Classify a ceiling (feet AGL) and visibility (statute miles) into a
/// flight category.
///
/// The classic "whichever is worse" rule: each bucket is entered when either
/// input falls below its thresholds, checked worst bucket first. Thresholds
/// are exclusive, so a value exactly at a boundary (ceiling 500/1000/3000,
/// visibility 1/3/5) belongs to the better bucket. Absent inputs impose no
/// restriction; with both absent the category is VFR.
#[must_use]
pub fn classify_flight_category(
    ceiling_ft: Option<f64>,
    visibility_sm: Option<f64>,
) -> FlightCategory {
    let below = |limit: f64, value: Option<f64>| value.is_some_and(|v| v < limit);

    if below(500.0, ceiling_ft) || below(1.0, visibility_sm) {
        FlightCategory::Lifr
    } else if below(1000.0, ceiling_ft) || below(3.0, visibility_sm) {
        FlightCategory::Ifr
    } else if below(3000.0, ceiling_ft) || below(5.0, visibility_sm) {
        FlightCategory::Mvfr
    } else {
        FlightCategory::Vfr
    }
}
