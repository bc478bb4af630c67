//! Runtime configuration loaded from the environment.
//!
//! Every key has a documented fallback so a missing `.env` never prevents
//! the server from starting.

use chrono::FixedOffset;

/// Merge endpoint used when `MERGE_API_URL` is not configured.
pub const MERGE_API_URL_FALLBACK: &str = "https://pdf-merge-service.onrender.com/merge";

const DEFAULT_CANONICAL_OFFSET: &str = "-05:00";
const DEFAULT_TEMPLATE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/static/transport_contract.typ");

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub merge_api_url: String,
    pub main_hub_link: String,
    pub schedule_csv_path: String,
    pub contract_template_path: String,
    pub storage_root: String,
    /// The single UTC offset all calendar-day comparisons run in.
    pub canonical_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            merge_api_url: env_or("MERGE_API_URL", MERGE_API_URL_FALLBACK),
            main_hub_link: env_or("MAIN_HUB_LINK", ""),
            schedule_csv_path: env_or("SCHEDULE_CSV_PATH", "./data/schedule.csv"),
            contract_template_path: env_or("CONTRACT_TEMPLATE_PATH", DEFAULT_TEMPLATE_PATH),
            storage_root: env_or("STORAGE_ROOT", "./files"),
            canonical_offset: canonical_offset_from_env(),
        }
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn canonical_offset_from_env() -> FixedOffset {
    let raw = env_or("CANONICAL_UTC_OFFSET", DEFAULT_CANONICAL_OFFSET);
    match parse_offset(&raw) {
        Some(offset) => offset,
        None => {
            log::warn!(
                "invalid CANONICAL_UTC_OFFSET {:?}, falling back to {}",
                raw,
                DEFAULT_CANONICAL_OFFSET
            );
            parse_offset(DEFAULT_CANONICAL_OFFSET).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
        }
    }
}

/// Parse a `±HH:MM` offset string.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    let (sign, rest) = match raw.chars().next()? {
        '+' => (1, &raw[1..]),
        '-' => (-1, &raw[1..]),
        _ => (1, raw),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
