use anyhow::{Context, Result};
use chrono::{Duration, NaiveTime};
use dotenv::dotenv;
use std::env;

use crate::services::listing_payload::ListingDefaults;

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_endpoint: String,
    pub api_key: String,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub listing_defaults: ListingDefaults,
    pub is_production: bool,
    pub port: u16,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = ListingDefaults::default();
        let ttl_hours: i64 = env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "168".to_string())
            .parse()
            .context("SESSION_TTL_HOURS must be a whole number of hours")?;

        Ok(Self {
            api_endpoint: env::var("MARKETPLACE_API_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            api_key: env::var("MARKETPLACE_API_KEY")
                .context("MARKETPLACE_API_KEY must be set in environment")?,
            session_secret: env::var("SESSION_SECRET")
                .context("SESSION_SECRET must be set in environment")?,
            session_ttl: Duration::hours(ttl_hours),
            listing_defaults: ListingDefaults {
                event_time: time_var("DEFAULT_EVENT_TIME", defaults.event_time)?,
                travel_time: time_var("DEFAULT_TRAVEL_TIME", defaults.travel_time)?,
                other_time: time_var("DEFAULT_OTHER_TIME", defaults.other_time)?,
            },
            is_production: env::var("ENVIRONMENT")
                .map(|val| val.to_lowercase() == "production")
                .unwrap_or(false),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }
}

fn time_var(name: &str, fallback: NaiveTime) -> Result<NaiveTime> {
    match env::var(name) {
        Ok(raw) => parse_time(&raw).with_context(|| format!("{} must be HH:MM", name)),
        Err(_) => Ok(fallback),
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(raw.trim(), "%H:%M")?)
}
