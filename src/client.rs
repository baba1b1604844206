//! Thin fetch client for the weather data feed
//!
//! This is the transport collaborator around the parsing core: it fetches
//! bytes, enforces the timeout, and picks the structured-vs-raw-text parse
//! path from the response's declared content type. No caching, no retries,
//! no rate limiting; a failed fetch is the caller's problem.

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::WxBriefConfig;
use crate::error::WxBriefError;
use crate::mapper::{
    lookup_station, parse_area_hazards, parse_forecasts, parse_observations, parse_pilot_reports,
};
use crate::models::{AreaHazard, PilotReport, StationInfo, StationObservation, TerminalForecast};
use crate::segment::{segment_raw_forecast_text, segment_raw_observation_text};
use crate::Result;

/// Blocking client for the aviation weather data API
pub struct FeedClient {
    client: Client,
    config: WxBriefConfig,
}

/// Whether a response declares a JSON body. The structured-vs-segmenter
/// choice is made once per call from this header, never from payload
/// inspection.
fn declares_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"))
}

impl FeedClient {
    /// Create a client from configuration
    pub fn new(config: WxBriefConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    fn get(&self, product: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}/{product}", self.config.base_url);
        debug!(url, "fetching weather product");
        let response = self.client.get(&url).query(query).send()?;
        if !response.status().is_success() {
            return Err(WxBriefError::api(format!(
                "{product} request failed with status {}",
                response.status()
            )));
        }
        Ok(response)
    }

    fn get_json(&self, product: &str, query: &[(&str, &str)]) -> Result<Value> {
        Ok(self.get(product, query)?.json()?)
    }

    /// Fetch current observations for a list of station identifiers
    #[instrument(skip(self))]
    pub fn fetch_observations(&self, ids: &[&str]) -> Result<Vec<StationObservation>> {
        let ids = ids.join(",");
        let payload = self.get_json("metar", &[("ids", &ids), ("format", "json")])?;
        parse_observations(&payload)
    }

    /// Fetch observations for a geographic bounding box
    /// (`lat0,lon0,lat1,lon1`). This path may answer raw text; the declared
    /// content type picks the parse path.
    #[instrument(skip(self))]
    pub fn fetch_observations_bbox(&self, bbox: &str) -> Result<Vec<StationObservation>> {
        let response = self.get("metar", &[("bbox", bbox), ("format", "json")])?;
        if declares_json(&response) {
            parse_observations(&response.json()?)
        } else {
            debug!("feed answered raw text, segmenting");
            Ok(segment_raw_observation_text(&response.text()?))
        }
    }

    /// Fetch terminal forecasts for a list of station identifiers
    #[instrument(skip(self))]
    pub fn fetch_forecasts(&self, ids: &[&str]) -> Result<Vec<TerminalForecast>> {
        let ids = ids.join(",");
        let payload = self.get_json("taf", &[("ids", &ids), ("format", "json")])?;
        parse_forecasts(&payload)
    }

    /// Fetch terminal forecasts for a geographic bounding box
    #[instrument(skip(self))]
    pub fn fetch_forecasts_bbox(&self, bbox: &str) -> Result<Vec<TerminalForecast>> {
        let response = self.get("taf", &[("bbox", bbox), ("format", "json")])?;
        if declares_json(&response) {
            parse_forecasts(&response.json()?)
        } else {
            debug!("feed answered raw text, segmenting");
            Ok(segment_raw_forecast_text(&response.text()?))
        }
    }

    /// Fetch recent pilot reports near a station
    #[instrument(skip(self))]
    pub fn fetch_pilot_reports(&self, id: &str, distance_nm: u32) -> Result<Vec<PilotReport>> {
        let distance = distance_nm.to_string();
        let payload = self.get_json(
            "pirep",
            &[("id", id), ("distance", &distance), ("format", "json")],
        )?;
        parse_pilot_reports(&payload)
    }

    /// Fetch active area advisories (AIRMET/SIGMET)
    #[instrument(skip(self))]
    pub fn fetch_area_hazards(&self) -> Result<Vec<AreaHazard>> {
        let payload = self.get_json("airsigmet", &[("format", "json")])?;
        parse_area_hazards(&payload)
    }

    /// Fetch metadata for one station
    #[instrument(skip(self))]
    pub fn fetch_station(&self, id: &str) -> Result<StationInfo> {
        let payload = self.get_json("stationinfo", &[("ids", id), ("format", "json")])?;
        lookup_station(&payload, id)
    }
}
