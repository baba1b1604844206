//! Mnemonic-to-prose decoding of one raw METAR string
//!
//! A single left-to-right pass over whitespace-delimited tokens, driven by a
//! fixed sequence of decode stages. A stage that does not recognize the
//! token at the cursor is skipped without consuming anything, so a missing
//! group never fails the decode; the cost is that a malformed token can
//! shadow later valid groups. The cursor never moves backwards.

use crate::error::WxBriefError;
use crate::Result;

/// Weather phenomenon mnemonics, matched as substrings and concatenated in
/// this order. This is a small local table for prose output, deliberately
/// separate from the canonical mapping path.
const WEATHER_MNEMONICS: &[(&str, &str)] = &[
    ("RA", "Rain"),
    ("SN", "Snow"),
    ("BR", "Mist"),
    ("FG", "Fog"),
    ("HZ", "Haze"),
    ("TS", "Thunderstorm"),
    ("SH", "Showers"),
    ("FZ", "Freezing"),
    ("DZ", "Drizzle"),
];

const CLOUD_COVERS: &[(&str, &str)] = &[
    ("CLR", "Clear"),
    ("SKC", "Sky clear"),
    ("FEW", "Few"),
    ("SCT", "Scattered"),
    ("BKN", "Broken"),
    ("OVC", "Overcast"),
];

/// The fixed field order of the single-pass scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeStage {
    ReportType,
    Station,
    Time,
    Wind,
    Visibility,
    Weather,
    Clouds,
    TempDewpoint,
    Altimeter,
    Remarks,
}

const STAGES: [DecodeStage; 10] = [
    DecodeStage::ReportType,
    DecodeStage::Station,
    DecodeStage::Time,
    DecodeStage::Wind,
    DecodeStage::Visibility,
    DecodeStage::Weather,
    DecodeStage::Clouds,
    DecodeStage::TempDewpoint,
    DecodeStage::Altimeter,
    DecodeStage::Remarks,
];

fn is_station_id(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_uppercase())
}

fn decode_report_type(token: &str) -> Option<String> {
    match token {
        "METAR" => Some("Report type: METAR (routine observation)".to_string()),
        "SPECI" => Some("Report type: SPECI (special observation)".to_string()),
        _ => None,
    }
}

/// `DDHHMMZ`
fn decode_time(token: &str) -> Option<String> {
    let bytes = token.as_bytes();
    if bytes.len() != 7 || bytes[6] != b'Z' || !bytes[..6].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let day: u32 = token[0..2].parse().ok()?;
    let hour: u32 = token[2..4].parse().ok()?;
    let minute: u32 = token[4..6].parse().ok()?;
    Some(format!("Time: day {day}, {hour:02}:{minute:02} UTC"))
}

/// `DDDSSKT` / `DDDSSGGGKT`, `VRB` direction allowed
fn decode_wind(token: &str) -> Option<String> {
    let body = token.strip_suffix("KT")?;
    let (dir_speed, gust) = match body.split_once('G') {
        Some((head, gust)) => (head, Some(gust)),
        None => (body, None),
    };
    if dir_speed.len() < 5 {
        return None;
    }
    let (dir, speed) = dir_speed.split_at(3);
    if !speed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let speed: u32 = speed.parse().ok()?;
    let gust: Option<u32> = match gust {
        Some(g) => Some(g.parse().ok()?),
        None => None,
    };

    let mut line = if dir == "VRB" {
        format!("Wind: variable at {speed} knots")
    } else if dir.bytes().all(|b| b.is_ascii_digit()) {
        let dir: u32 = dir.parse().ok()?;
        if dir == 0 && speed == 0 {
            return Some("Wind: calm".to_string());
        }
        format!("Wind: {dir}\u{b0} at {speed} knots")
    } else {
        return None;
    };
    if let Some(gust) = gust {
        line.push_str(&format!(" gusting to {gust} knots"));
    }
    Some(line)
}

/// `NNSM`, `N/NSM`, `MN/NSM` or literal `CAVOK`
fn decode_visibility(token: &str) -> Option<String> {
    if token == "CAVOK" {
        return Some(
            "Visibility: ceiling and visibility OK (10 km or more, no significant weather)"
                .to_string(),
        );
    }
    let body = token.strip_suffix("SM")?;
    let body = body.strip_prefix('M').unwrap_or(body);
    let plain = !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit());
    let fractional = body
        .split_once('/')
        .is_some_and(|(n, d)| {
            !n.is_empty()
                && !d.is_empty()
                && n.bytes().all(|b| b.is_ascii_digit())
                && d.bytes().all(|b| b.is_ascii_digit())
        });
    (plain || fractional).then(|| format!("Visibility: {token}"))
}

/// Optional `+`/`-` intensity, optional `VC`, then a 2-6 letter code that
/// must hit at least one mnemonic
fn decode_weather(token: &str) -> Option<String> {
    let (intensity, rest) = match token.as_bytes().first()? {
        b'+' => (Some("heavy "), &token[1..]),
        b'-' => (Some("light "), &token[1..]),
        _ => (None, token),
    };
    let (vicinity, code) = match rest.strip_prefix("VC") {
        Some(stripped) if !stripped.is_empty() => (true, stripped),
        _ => (false, rest),
    };
    if code.len() < 2 || code.len() > 6 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }

    let decoded: Vec<&str> = WEATHER_MNEMONICS
        .iter()
        .filter(|(mnemonic, _)| code.contains(mnemonic))
        .map(|(_, description)| *description)
        .collect();
    if decoded.is_empty() {
        return None;
    }

    let mut line = format!("Weather: {}{}", intensity.unwrap_or(""), decoded.join(" "));
    if vicinity {
        line.push_str(" in the vicinity");
    }
    Some(line)
}

/// `(CLR|SKC|FEW|SCT|BKN|OVC)NNN(CB|TCU)?`; bare `CLR`/`SKC` allowed
fn decode_cloud(token: &str) -> Option<String> {
    let (code, description) = CLOUD_COVERS
        .iter()
        .find(|(code, _)| token.starts_with(code))?;
    let rest = &token[code.len()..];
    if rest.is_empty() {
        return matches!(*code, "CLR" | "SKC").then(|| format!("Clouds: {description}"));
    }
    let (height, suffix) = if let Some(height) = rest.strip_suffix("CB") {
        (height, ", cumulonimbus")
    } else if let Some(height) = rest.strip_suffix("TCU") {
        (height, ", towering cumulus")
    } else {
        (rest, "")
    };
    if height.len() != 3 || !height.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let height_ft: u32 = height.parse::<u32>().ok()? * 100;
    Some(format!("Clouds: {description} at {height_ft} ft{suffix}"))
}

fn parse_temp_part(part: &str) -> Option<i32> {
    let (sign, digits) = match part.strip_prefix('M') {
        Some(rest) => (-1, rest),
        None => (1, part),
    };
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(sign * digits.parse::<i32>().ok()?)
}

/// `M?NN/M?NN`, `M` prefix meaning negative
fn decode_temp_dewpoint(token: &str) -> Option<String> {
    let (temp, dewpoint) = token.split_once('/')?;
    let temp = parse_temp_part(temp)?;
    let dewpoint = parse_temp_part(dewpoint)?;
    Some(format!(
        "Temperature/dewpoint: {temp}\u{b0}C / {dewpoint}\u{b0}C"
    ))
}

/// `ANNNN` as inHg hundredths or `QNNNN` as whole hPa
fn decode_altimeter(token: &str) -> Option<String> {
    let bytes = token.as_bytes();
    if bytes.len() != 5 || !bytes[1..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value: f64 = token[1..].parse().ok()?;
    match bytes[0] {
        b'A' => Some(format!("Altimeter: {:.2} inHg", value / 100.0)),
        b'Q' => Some(format!("Altimeter: {value:.0} hPa")),
        _ => None,
    }
}

/// Decode one raw METAR into ordered multi-line prose, one line per
/// recognized group. Fails only on empty input.
pub fn decode_raw_metar(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(WxBriefError::decode("empty METAR text"));
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let mut cursor = 0;
    let mut lines: Vec<String> = Vec::new();

    // A stage either consumes the token(s) it recognizes or yields to the
    // next stage at the same cursor position.
    for stage in STAGES {
        let Some(&token) = tokens.get(cursor) else {
            break;
        };
        match stage {
            DecodeStage::ReportType => {
                if let Some(line) = decode_report_type(token) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Station => {
                if is_station_id(token) {
                    lines.push(format!("Station: {token}"));
                    cursor += 1;
                }
            }
            DecodeStage::Time => {
                if let Some(line) = decode_time(token) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Wind => {
                if let Some(line) = decode_wind(token) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Visibility => {
                if let Some(line) = decode_visibility(token) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Weather => {
                while let Some(line) = tokens.get(cursor).and_then(|t| decode_weather(t)) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Clouds => {
                while let Some(line) = tokens.get(cursor).and_then(|t| decode_cloud(t)) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::TempDewpoint => {
                if let Some(line) = decode_temp_dewpoint(token) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Altimeter => {
                if let Some(line) = decode_altimeter(token) {
                    lines.push(line);
                    cursor += 1;
                }
            }
            DecodeStage::Remarks => {
                // everything after a literal RMK token, verbatim
                if let Some(rmk) = tokens[cursor..].iter().position(|&t| t == "RMK") {
                    let rest = &tokens[cursor + rmk + 1..];
                    if !rest.is_empty() {
                        lines.push(format!("Remarks: {}", rest.join(" ")));
                    }
                    cursor = tokens.len();
                }
            }
        }
    }

    Ok(lines.join("\n"))
}
