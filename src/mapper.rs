//! Mapping of loosely-typed feed records into canonical report entities
//!
//! The upstream feed has renamed most of its fields at least once over the
//! years. Every logical field therefore reads through a declarative list of
//! alternative key names, first present key wins, so the fallback logic
//! lives in one lookup helper instead of being duplicated across the
//! per-kind mapping functions.
//!
//! Missing or malformed optional fields never fail a record; they degrade to
//! absent. The only hard failures here are a payload that is not a record
//! sequence (`InvalidResponse`) and a station lookup with no match
//! (`StationNotFound`).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::category::classify_flight_category;
use crate::clouds::parse_cloud_layers;
use crate::error::WxBriefError;
use crate::models::{
    ceiling_from_layers, AreaHazard, CloudLayer, ForecastChange, ForecastPeriod, HazardKind,
    IcingReport, PilotReport, ReportUrgency, StationInfo, StationObservation, TerminalForecast,
    TurbulenceReport,
};
use crate::normalize::{
    coerce_number, normalize_hazard_type, normalize_icing, normalize_turbulence,
    normalize_visibility,
};
use crate::Result;

// Field-name fallback chains, newest feed key first.
const RAW_OB: &[&str] = &["rawOb", "raw_text", "rawText"];
const RAW_TAF: &[&str] = &["rawTAF", "raw_text", "rawText"];
const RAW_ADVISORY: &[&str] = &["rawAirSigmet", "raw_text", "rawText"];
const STATION: &[&str] = &["icaoId", "station_id", "stationId", "icao"];
const OBS_TIME: &[&str] = &["obsTime", "observation_time", "reportTime"];
const TEMP: &[&str] = &["temp", "temp_c", "tempC"];
const DEWPOINT: &[&str] = &["dewp", "dewpoint_c", "dewp_c"];
const WIND_DIR: &[&str] = &["wdir", "wind_dir_degrees", "windDir"];
const WIND_SPEED: &[&str] = &["wspd", "wind_speed_kt", "windSpeed"];
const WIND_GUST: &[&str] = &["wgst", "wind_gust_kt", "windGust"];
const VISIBILITY: &[&str] = &["visib", "visibility_statute_mi", "visibility"];
const ALTIMETER: &[&str] = &["altim", "altim_in_hg", "altimeter"];
const CLOUDS: &[&str] = &["clouds", "sky_condition", "cloudList"];
const WEATHER: &[&str] = &["wxString", "wx_string", "presentWeather"];
const REMARKS: &[&str] = &["remarks", "rmk"];
const ISSUE_TIME: &[&str] = &["issueTime", "issue_time"];
const VALID_FROM: &[&str] = &["validTimeFrom", "valid_time_from"];
const VALID_TO: &[&str] = &["validTimeTo", "valid_time_to"];
const PERIODS: &[&str] = &["fcsts", "forecast", "periods"];
const PERIOD_FROM: &[&str] = &["timeFrom", "fcst_time_from"];
const PERIOD_TO: &[&str] = &["timeTo", "fcst_time_to"];
const PERIOD_CHANGE: &[&str] = &["fcstChange", "change_indicator"];
const PROBABILITY: &[&str] = &["probability", "prob"];
const REPORT_TYPE: &[&str] = &["airepType", "reportType", "report_type"];
const AIRCRAFT: &[&str] = &["acType", "aircraft_ref", "acftRef"];
const LOCATION: &[&str] = &["location", "rawLocation"];
const ALTITUDE: &[&str] = &["altitude_ft_msl", "fltLvl"];
const TURB_INTENSITY: &[&str] = &["tbInt1", "turbulence_condition", "turbulence"];
const TURB_TYPE: &[&str] = &["tbType1", "turbulence_type"];
const ICING_INTENSITY: &[&str] = &["icgInt1", "icing_condition", "icing"];
const ICING_TYPE: &[&str] = &["icgType1", "icing_type"];
const HAZARD: &[&str] = &["hazard", "hazard_type"];
const SEVERITY: &[&str] = &["severity"];
const ADVISORY_TYPE: &[&str] = &["airSigmetType", "product"];
const AREA: &[&str] = &["alphaChar", "area", "region"];
const DESCRIPTION: &[&str] = &["description", "hazardText"];
const STATION_NAME: &[&str] = &["site", "station_name", "name"];
const LATITUDE: &[&str] = &["lat", "latitude"];
const LONGITUDE: &[&str] = &["lon", "longitude"];
const ELEVATION: &[&str] = &["elev", "elevation_m"];

/// First present, non-null value among the alternative key names
fn pick<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find(|value| !value.is_null())
}

fn pick_number(record: &Value, keys: &[&str]) -> Option<f64> {
    pick(record, keys).and_then(coerce_number)
}

fn pick_string(record: &Value, keys: &[&str]) -> Option<String> {
    pick(record, keys)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Timestamps arrive as epoch seconds, RFC 3339 strings, or the feed's
/// space-separated UTC form. Anything else degrades to absent.
fn pick_time(record: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    let value = pick(record, keys)?;
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        Value::String(s) => parse_time_str(s.trim()),
        _ => None,
    }
}

fn parse_time_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Whitespace-separated phenomenon codes from a weather string field
fn pick_weather(record: &Value, keys: &[&str]) -> Vec<String> {
    pick_string(record, keys)
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn pick_clouds(record: &Value, keys: &[&str]) -> Vec<CloudLayer> {
    pick(record, keys)
        .and_then(|v| v.as_array())
        .map(|entries| parse_cloud_layers(entries))
        .unwrap_or_default()
}

/// The feed contract is a JSON array of records; anything else is a hard
/// `InvalidResponse`.
fn as_records<'a>(payload: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    payload.as_array().ok_or_else(|| {
        WxBriefError::invalid_response(format!("expected a sequence of {what} records"))
    })
}

fn map_observation(record: &Value) -> StationObservation {
    let cloud_layers = pick_clouds(record, CLOUDS);
    let visibility_sm = pick(record, VISIBILITY).and_then(normalize_visibility);
    let ceiling_ft = ceiling_from_layers(&cloud_layers);
    let flight_category = Some(classify_flight_category(ceiling_ft, visibility_sm));

    StationObservation {
        raw: pick_string(record, RAW_OB).unwrap_or_default(),
        station: pick_string(record, STATION).unwrap_or_default(),
        time: pick_time(record, OBS_TIME),
        temperature_c: pick_number(record, TEMP),
        dewpoint_c: pick_number(record, DEWPOINT),
        wind_dir_deg: pick_number(record, WIND_DIR),
        wind_speed_kt: pick_number(record, WIND_SPEED),
        wind_gust_kt: pick_number(record, WIND_GUST),
        visibility_sm,
        altimeter_in_hg: pick_number(record, ALTIMETER),
        cloud_layers,
        weather: pick_weather(record, WEATHER),
        remarks: pick_string(record, REMARKS),
        flight_category,
    }
}

/// Map a sequence of loosely-typed METAR records into canonical
/// observations, deriving each record's flight category from its own parsed
/// cloud layers and visibility.
pub fn parse_observations(payload: &Value) -> Result<Vec<StationObservation>> {
    let records = as_records(payload, "observation")?;
    debug!(count = records.len(), "mapping observation records");
    Ok(records.iter().map(map_observation).collect())
}

fn parse_change(raw: &str) -> Option<ForecastChange> {
    let upper = raw.trim().to_ascii_uppercase();
    if upper.starts_with("FM") {
        Some(ForecastChange::Fm)
    } else if upper.starts_with("TEMPO") {
        Some(ForecastChange::Tempo)
    } else if upper.starts_with("BECMG") {
        Some(ForecastChange::Becmg)
    } else if upper.starts_with("PROB") {
        Some(ForecastChange::Prob)
    } else {
        None
    }
}

fn map_forecast_period(record: &Value) -> ForecastPeriod {
    ForecastPeriod {
        time_from: pick_time(record, PERIOD_FROM),
        time_to: pick_time(record, PERIOD_TO),
        change: pick_string(record, PERIOD_CHANGE).and_then(|s| parse_change(&s)),
        probability: pick_number(record, PROBABILITY),
        wind_dir_deg: pick_number(record, WIND_DIR),
        wind_speed_kt: pick_number(record, WIND_SPEED),
        wind_gust_kt: pick_number(record, WIND_GUST),
        visibility_sm: pick(record, VISIBILITY).and_then(normalize_visibility),
        weather: pick_weather(record, WEATHER),
        cloud_layers: pick_clouds(record, CLOUDS),
    }
}

fn map_forecast(record: &Value) -> TerminalForecast {
    let periods = pick(record, PERIODS)
        .and_then(|v| v.as_array())
        .map(|entries| entries.iter().map(map_forecast_period).collect())
        .unwrap_or_default();

    TerminalForecast {
        raw: pick_string(record, RAW_TAF).unwrap_or_default(),
        station: pick_string(record, STATION).unwrap_or_default(),
        issue_time: pick_time(record, ISSUE_TIME),
        valid_from: pick_time(record, VALID_FROM),
        valid_to: pick_time(record, VALID_TO),
        periods,
    }
}

/// Map a sequence of loosely-typed TAF records into canonical forecasts
pub fn parse_forecasts(payload: &Value) -> Result<Vec<TerminalForecast>> {
    let records = as_records(payload, "forecast")?;
    debug!(count = records.len(), "mapping forecast records");
    Ok(records.iter().map(map_forecast).collect())
}

fn map_pilot_report(record: &Value) -> PilotReport {
    let urgency = pick_string(record, REPORT_TYPE)
        .filter(|s| {
            let upper = s.to_ascii_uppercase();
            upper.contains("UUA") || upper.contains("URGENT")
        })
        .map_or(ReportUrgency::Routine, |_| ReportUrgency::Urgent);

    let turbulence = pick_string(record, TURB_INTENSITY)
        .and_then(|s| normalize_turbulence(&s))
        .map(|intensity| TurbulenceReport {
            intensity,
            turbulence_type: pick_string(record, TURB_TYPE),
        });

    let icing = pick_string(record, ICING_INTENSITY)
        .and_then(|s| normalize_icing(&s))
        .map(|intensity| IcingReport {
            intensity,
            icing_type: pick_string(record, ICING_TYPE),
        });

    PilotReport {
        raw: pick_string(record, RAW_OB).unwrap_or_default(),
        time: pick_time(record, OBS_TIME),
        urgency,
        aircraft_type: pick_string(record, AIRCRAFT),
        location: pick_string(record, LOCATION).unwrap_or_default(),
        altitude_ft: pick_number(record, ALTITUDE),
        turbulence,
        icing,
        weather: pick_weather(record, WEATHER),
        remarks: pick_string(record, REMARKS),
    }
}

/// Map a sequence of loosely-typed PIREP records into canonical pilot
/// reports
pub fn parse_pilot_reports(payload: &Value) -> Result<Vec<PilotReport>> {
    let records = as_records(payload, "pilot report")?;
    debug!(count = records.len(), "mapping pilot report records");
    Ok(records.iter().map(map_pilot_report).collect())
}

fn map_area_hazard(record: &Value) -> AreaHazard {
    let hazard_text = pick_string(record, HAZARD).unwrap_or_default();
    let is_sigmet = pick_string(record, ADVISORY_TYPE)
        .is_some_and(|s| s.to_ascii_uppercase().contains("SIGMET"));

    let kind = if is_sigmet {
        HazardKind::Sigmet {
            hazard: hazard_text,
            severity: pick_string(record, SEVERITY),
        }
    } else {
        HazardKind::Airmet(normalize_hazard_type(&hazard_text))
    };

    AreaHazard {
        raw: pick_string(record, RAW_ADVISORY).unwrap_or_default(),
        kind,
        valid_from: pick_time(record, VALID_FROM),
        valid_to: pick_time(record, VALID_TO),
        area: pick_string(record, AREA),
        description: pick_string(record, DESCRIPTION),
    }
}

/// Map a sequence of loosely-typed AIRMET/SIGMET records into canonical
/// area hazards
pub fn parse_area_hazards(payload: &Value) -> Result<Vec<AreaHazard>> {
    let records = as_records(payload, "area hazard")?;
    debug!(count = records.len(), "mapping area hazard records");
    Ok(records.iter().map(map_area_hazard).collect())
}

/// Find the station metadata record for one identifier.
///
/// Fails with `StationNotFound` when no record matches, whether the
/// sequence was empty or merely did not contain the station.
pub fn lookup_station(payload: &Value, station_id: &str) -> Result<StationInfo> {
    let records = as_records(payload, "station")?;
    let wanted = station_id.trim().to_ascii_uppercase();

    records
        .iter()
        .find(|record| {
            pick_string(record, STATION).is_some_and(|id| id.eq_ignore_ascii_case(&wanted))
        })
        .map(|record| StationInfo {
            station: pick_string(record, STATION).unwrap_or_else(|| wanted.clone()),
            name: pick_string(record, STATION_NAME),
            latitude: pick_number(record, LATITUDE),
            longitude: pick_number(record, LONGITUDE),
            elevation_m: pick_number(record, ELEVATION),
        })
        .ok_or_else(|| WxBriefError::station_not_found(station_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CloudCover, FlightCategory, HazardType, IcingIntensity, TurbulenceIntensity};
    use serde_json::json;

    #[test]
    fn test_parse_observations_derives_category() {
        let payload = json!([{
            "icaoId": "KDEN",
            "rawOb": "KDEN 121652Z 27015G25KT 10SM FEW050 SCT100 BKN200 22/10 A2992",
            "obsTime": 1_700_000_000,
            "temp": 22.0,
            "dewp": 10.0,
            "wdir": 270,
            "wspd": 15,
            "wgst": 25,
            "visib": "10",
            "altim": 29.92,
            "clouds": [
                {"cover": "FEW", "base": 5000},
                {"cover": "SCT", "base": 10000},
                {"cover": "BKN", "base": 20000}
            ]
        }]);

        let observations = parse_observations(&payload).unwrap();
        assert_eq!(observations.len(), 1);
        let obs = &observations[0];
        assert_eq!(obs.station, "KDEN");
        assert_eq!(obs.temperature_c, Some(22.0));
        assert_eq!(obs.wind_dir_deg, Some(270.0));
        assert_eq!(obs.wind_gust_kt, Some(25.0));
        assert_eq!(obs.visibility_sm, Some(10.0));
        assert_eq!(obs.cloud_layers.len(), 3);
        // ceiling 20000 from the BKN layer, visibility 10 -> VFR
        assert_eq!(obs.ceiling_ft(), Some(20000.0));
        assert_eq!(obs.flight_category, Some(FlightCategory::Vfr));
    }

    #[test]
    fn test_category_invariant_holds_for_mapped_records() {
        let payload = json!([{
            "station_id": "KSEA",
            "raw_text": "KSEA 121653Z 18008KT 2SM BR OVC007 12/11 A3001",
            "visibility_statute_mi": "2",
            "sky_condition": [{"sky_cover": "OVC", "cloud_base_ft_agl": 700}]
        }]);

        let obs = &parse_observations(&payload).unwrap()[0];
        assert_eq!(obs.station, "KSEA");
        assert_eq!(
            obs.flight_category,
            Some(classify_flight_category(obs.ceiling_ft(), obs.visibility_sm))
        );
        assert_eq!(obs.flight_category, Some(FlightCategory::Ifr));
    }

    #[test]
    fn test_missing_optionals_degrade_to_absent() {
        let payload = json!([{"icaoId": "KBOS"}]);
        let obs = &parse_observations(&payload).unwrap()[0];
        assert_eq!(obs.station, "KBOS");
        assert!(obs.time.is_none());
        assert!(obs.visibility_sm.is_none());
        assert!(obs.cloud_layers.is_empty());
        // no ceiling and no visibility classifies as VFR
        assert_eq!(obs.flight_category, Some(FlightCategory::Vfr));
    }

    #[test]
    fn test_non_sequence_payload_is_invalid_response() {
        let payload = json!({"error": "service unavailable"});
        let result = parse_observations(&payload);
        assert!(matches!(
            result,
            Err(WxBriefError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_forecasts(&payload),
            Err(WxBriefError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_pilot_reports(&json!("text")),
            Err(WxBriefError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_area_hazards(&json!(42)),
            Err(WxBriefError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_parse_forecast_with_periods() {
        let payload = json!([{
            "icaoId": "KDEN",
            "rawTAF": "TAF KDEN 121720Z 1218/1324 27012KT P6SM SCT100",
            "issueTime": "2024-01-12T17:20:00Z",
            "validTimeFrom": 1_700_000_000,
            "validTimeTo": 1_700_100_000,
            "fcsts": [
                {
                    "timeFrom": 1_700_000_000,
                    "timeTo": 1_700_050_000,
                    "wdir": 270,
                    "wspd": 12,
                    "visib": "P6SM",
                    "clouds": [{"cover": "SCT", "base": 10000}]
                },
                {
                    "timeFrom": 1_700_050_000,
                    "timeTo": 1_700_100_000,
                    "fcstChange": "TEMPO",
                    "probability": 30,
                    "visib": "2",
                    "wxString": "-SN BR"
                }
            ]
        }]);

        let forecasts = parse_forecasts(&payload).unwrap();
        let taf = &forecasts[0];
        assert_eq!(taf.station, "KDEN");
        assert!(taf.issue_time.is_some());
        assert_eq!(taf.periods.len(), 2);
        assert_eq!(taf.periods[0].change, None);
        assert_eq!(taf.periods[0].visibility_sm, Some(6.0));
        assert_eq!(taf.periods[0].cloud_layers[0].cover, CloudCover::Sct);
        assert_eq!(taf.periods[1].change, Some(ForecastChange::Tempo));
        assert_eq!(taf.periods[1].probability, Some(30.0));
        assert_eq!(taf.periods[1].weather, vec!["-SN", "BR"]);
    }

    #[test]
    fn test_parse_pilot_report() {
        let payload = json!([{
            "rawOb": "UA /OV DEN/TM 1720/FL350/TP B738/TB MOD-SEV/IC LGT RIME",
            "obsTime": 1_700_000_000,
            "airepType": "Urgent PIREP",
            "acType": "B738",
            "location": "DEN 090015",
            "fltLvl": 35000,
            "tbInt1": "MOD-SEV",
            "tbType1": "CHOP",
            "icgInt1": "LGT LIGHT RIME",
            "icgType1": "RIME"
        }]);

        let reports = parse_pilot_reports(&payload).unwrap();
        let pirep = &reports[0];
        assert_eq!(pirep.urgency, ReportUrgency::Urgent);
        assert_eq!(pirep.aircraft_type.as_deref(), Some("B738"));
        assert_eq!(pirep.altitude_ft, Some(35000.0));
        // worst-first scan: "MOD-SEV" classifies severe
        let turbulence = pirep.turbulence.as_ref().unwrap();
        assert_eq!(turbulence.intensity, TurbulenceIntensity::Severe);
        assert_eq!(turbulence.turbulence_type.as_deref(), Some("CHOP"));
        let icing = pirep.icing.as_ref().unwrap();
        assert_eq!(icing.intensity, IcingIntensity::Light);
    }

    #[test]
    fn test_parse_area_hazards() {
        let payload = json!([
            {
                "rawAirSigmet": "WAUS45 KKCI 121445 DENT WA ...",
                "airSigmetType": "AIRMET",
                "hazard": "MT_OBSC",
                "validTimeFrom": 1_700_000_000,
                "validTimeTo": 1_700_020_000,
                "alphaChar": "S"
            },
            {
                "raw_text": "WSUS31 KKCI 121455 ...",
                "airSigmetType": "SIGMET",
                "hazard": "CONVECTIVE",
                "severity": "SEV"
            }
        ]);

        let hazards = parse_area_hazards(&payload).unwrap();
        assert_eq!(
            hazards[0].kind,
            HazardKind::Airmet(HazardType::MountainObscuration)
        );
        assert_eq!(hazards[0].area.as_deref(), Some("S"));
        assert_eq!(
            hazards[1].kind,
            HazardKind::Sigmet {
                hazard: "CONVECTIVE".to_string(),
                severity: Some("SEV".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_airmet_hazard_defaults_to_ifr() {
        let payload = json!([{"airSigmetType": "AIRMET", "hazard": "ASH"}]);
        let hazards = parse_area_hazards(&payload).unwrap();
        assert_eq!(hazards[0].kind, HazardKind::Airmet(HazardType::Ifr));
    }

    #[test]
    fn test_lookup_station() {
        let payload = json!([
            {"icaoId": "KDEN", "site": "Denver Intl", "lat": 39.85, "lon": -104.65, "elev": 1656},
            {"icaoId": "KLAS", "site": "Las Vegas"}
        ]);

        let info = lookup_station(&payload, "kden").unwrap();
        assert_eq!(info.station, "KDEN");
        assert_eq!(info.name.as_deref(), Some("Denver Intl"));
        assert_eq!(info.elevation_m, Some(1656.0));

        let missing = lookup_station(&payload, "KXYZ");
        assert!(matches!(missing, Err(WxBriefError::StationNotFound { .. })));

        let empty = lookup_station(&json!([]), "KDEN");
        assert!(matches!(empty, Err(WxBriefError::StationNotFound { .. })));
    }

    #[test]
    fn test_time_forms() {
        let payload = json!([
            {"icaoId": "A", "obsTime": 1_700_000_000},
            {"icaoId": "B", "obsTime": "2024-01-12T16:52:00Z"},
            {"icaoId": "C", "obsTime": "2024-01-12 16:52:00"},
            {"icaoId": "D", "obsTime": "whenever"}
        ]);
        let observations = parse_observations(&payload).unwrap();
        assert!(observations[0].time.is_some());
        assert!(observations[1].time.is_some());
        assert!(observations[2].time.is_some());
        assert!(observations[3].time.is_none());
    }
}
