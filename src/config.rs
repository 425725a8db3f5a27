use std::str::FromStr;

use anyhow::{Context, Result};
use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// IANA zone the stored civil date/time strings are interpreted in.
    pub clinic_tz: Tz,
    pub reminder_interval_secs: u64,
    pub reminder_lookahead_mins: i64,
}

pub fn load() -> Result<AppConfig> {
    let port = env_or("PORT", "8080")
        .parse()
        .context("PORT must be a number")?;

    let tz_name = env_or("CLINIC_TIMEZONE", "Africa/Johannesburg");
    let clinic_tz = Tz::from_str(&tz_name)
        .map_err(|_| anyhow::anyhow!("{tz_name} is not a known IANA timezone"))?;

    let reminder_interval_secs = env_or("REMINDER_INTERVAL_SECS", "300")
        .parse()
        .context("REMINDER_INTERVAL_SECS must be a number")?;

    let reminder_lookahead_mins = env_or("REMINDER_LOOKAHEAD_MINS", "15")
        .parse()
        .context("REMINDER_LOOKAHEAD_MINS must be a number")?;

    Ok(AppConfig {
        port,
        clinic_tz,
        reminder_interval_secs,
        reminder_lookahead_mins,
    })
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
