//! Thin briefing binary: fetch, decode and classify one station's weather.
//! All logic lives in the library; this is orchestration only.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wxbrief::{decode_raw_metar, FeedClient, WxBriefConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let station = std::env::args()
        .nth(1)
        .context("usage: wxbrief <station-id>, e.g. wxbrief KDEN")?;

    let config = WxBriefConfig::from_env()?;
    let client = FeedClient::new(config)?;

    let observations = client
        .fetch_observations(&[&station])
        .with_context(|| format!("fetching current weather for {station}"))?;
    let observation = observations
        .first()
        .with_context(|| format!("no current observation for {station}"))?;

    println!("{}", observation.raw);
    println!();
    println!("{}", decode_raw_metar(&observation.raw)?);
    if let Some(category) = observation.flight_category {
        println!();
        println!("Flight category: {category}");
    }

    Ok(())
}
