//! Environment configuration
//!
//! Loaded once at startup. Every field has a documented default except the
//! Discord token; malformed values are rejected here rather than at first use.

use anyhow::{anyhow, bail, Context as _, Result};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::preferences::{DEFAULT_MODEL, SUPPORTED_MODELS};

const DEFAULT_DATA_FILE: &str = "data.json";
const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";
const DEFAULT_TICK_SECS: u64 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Register commands on this guild only (instant update) instead of globally
    pub guild_id: Option<u64>,
    pub gemini_api_key: Option<String>,
    pub data_path: PathBuf,
    /// IANA zone used to interpret /alarm wall-clock times
    pub time_zone: Tz,
    pub tick_interval: Duration,
    pub default_model: String,
    pub chat_default_on: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let discord_token =
            get("DISCORD_TOKEN").ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let guild_id = get("GUILD_ID")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("GUILD_ID is not a valid id: {raw}"))
            })
            .transpose()?;

        let time_zone_raw = get("BOT_TZ").unwrap_or_else(|| DEFAULT_TIME_ZONE.into());
        let time_zone = parse_time_zone(&time_zone_raw)
            .with_context(|| format!("BOT_TZ is not a known time zone: {time_zone_raw}"))?;

        let tick_secs = match get("TIMER_TICK_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("TIMER_TICK_SECS is not a number: {raw}"))?,
            None => DEFAULT_TICK_SECS,
        };
        if tick_secs == 0 {
            bail!("TIMER_TICK_SECS must be at least 1");
        }

        let default_model = get("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        if !SUPPORTED_MODELS.contains(&default_model.as_str()) {
            bail!(
                "DEFAULT_MODEL '{default_model}' is not one of {}",
                SUPPORTED_MODELS.join(", ")
            );
        }

        let chat_default_on = match get("CHAT_DEFAULT_ON") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("CHAT_DEFAULT_ON must be true or false, got {raw}"))?,
            None => true,
        };

        Ok(Config {
            discord_token,
            guild_id,
            gemini_api_key: get("GEMINI_API_KEY"),
            data_path: get("DATA_FILE")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.into())
                .into(),
            time_zone,
            tick_interval: Duration::from_secs(tick_secs),
            default_model,
            chat_default_on,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
        })
    }
}

/// Parse an IANA zone name such as `Asia/Tokyo` or `America/New_York`
pub fn parse_time_zone(raw: &str) -> Result<Tz> {
    raw.trim().parse::<Tz>().map_err(|e| anyhow!("{e}"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
