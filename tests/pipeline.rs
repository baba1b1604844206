//! End-to-end pipeline tests on canned feed payloads (no network)

use serde_json::json;
use wxbrief::{
    classify_flight_category, decode_raw_metar, parse_observations,
    segment_raw_observation_text, FlightCategory, WxBriefError,
};

#[test]
fn structured_records_flow_through_to_a_category() {
    let payload = json!([{
        "icaoId": "KDEN",
        "rawOb": "KDEN 121652Z 27015G25KT 10SM FEW050 SCT100 BKN200 22/10 A2992 RMK AO2",
        "visib": "10",
        "clouds": [
            {"cover": "FEW", "base": 5000},
            {"cover": "SCT", "base": 10000},
            {"cover": "BKN", "base": 20000}
        ]
    }]);

    let observations = parse_observations(&payload).unwrap();
    let obs = &observations[0];
    assert_eq!(obs.station, "KDEN");
    assert_eq!(obs.flight_category, Some(FlightCategory::Vfr));

    // the embedded category always equals a direct classification of the
    // record's own ceiling and visibility
    assert_eq!(
        obs.flight_category,
        Some(classify_flight_category(obs.ceiling_ft(), obs.visibility_sm))
    );

    // the raw text on the record decodes to prose with the expected lines
    let prose = decode_raw_metar(&obs.raw).unwrap();
    let lines: Vec<&str> = prose.lines().collect();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("missing line containing {needle:?} in {prose}"))
    };
    assert!(position("KDEN") < position("270\u{b0} at 15 knots gusting to 25 knots"));
    assert!(position("10SM") < position("Few at 5000 ft"));
    assert!(position("22\u{b0}C / 10\u{b0}C") < position("29.92 inHg"));
    assert!(position("29.92 inHg") < position("Remarks: AO2"));
}

#[test]
fn raw_text_fallback_yields_raw_only_records() {
    let text = "KDEN 121652Z 27015G25KT 10SM FEW050 22/10 A2992\nKLAS 121653Z 00000KT 10SM CLR 28/05 A2990\n";
    let records = segment_raw_observation_text(text);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].station, "KDEN");
    assert_eq!(records[1].station, "KLAS");
    for record in &records {
        assert!(record.flight_category.is_none());
        assert!(record.visibility_sm.is_none());
        // the raw text of a segmented record re-segments to itself
        let again = segment_raw_observation_text(&record.raw);
        assert_eq!(again.len(), 1);
        assert_eq!(&again[0], record);
    }
}

#[test]
fn error_taxonomy_at_the_surface() {
    assert!(matches!(
        parse_observations(&json!("not a sequence")),
        Err(WxBriefError::InvalidResponse { .. })
    ));
    assert!(matches!(
        decode_raw_metar(""),
        Err(WxBriefError::Decode { .. })
    ));
    assert!(matches!(
        wxbrief::lookup_station(&json!([]), "KDEN"),
        Err(WxBriefError::StationNotFound { .. })
    ));
}

#[test]
fn low_ifr_conditions_classify_from_either_input() {
    let payload = json!([
        {
            "icaoId": "KSEA",
            "visib": "0.5",
            "clouds": [{"cover": "OVC", "base": 5000}]
        },
        {
            "icaoId": "KPDX",
            "visib": "10",
            "clouds": [{"cover": "OVC", "base": 300}]
        }
    ]);
    let observations = parse_observations(&payload).unwrap();
    // whichever input is worse decides the bucket
    assert_eq!(observations[0].flight_category, Some(FlightCategory::Lifr));
    assert_eq!(observations[1].flight_category, Some(FlightCategory::Lifr));
}
