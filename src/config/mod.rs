/// Application configuration module
use crate::clients::FeedEndpoints;
use crate::domain::{
    DisplayFormat, TimeRange, ViewOptions, DEFAULT_DATETIME_PATTERN, DEFAULT_DATE_PATTERN,
};
use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_DAY_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";
pub const DEFAULT_WEEK_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const DEFAULT_MONTH_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub endpoints: FeedEndpoints,
    pub http: HttpSettings,
    pub initial_range: TimeRange,
    pub view: ViewOptions,
}

#[derive(Clone, Debug)]
pub struct HttpSettings {
    /// `None` means requests never time out
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let endpoints = FeedEndpoints {
            day: url("USGS_DAY_URL", DEFAULT_DAY_URL),
            week: url("USGS_WEEK_URL", DEFAULT_WEEK_URL),
            month: url("USGS_MONTH_URL", DEFAULT_MONTH_URL),
        };

        let http = HttpSettings {
            timeout: parse_var::<u64, _>(&lookup, "HTTP_TIMEOUT_SECONDS").map(Duration::from_secs),
            user_agent: lookup("HTTP_USER_AGENT")
                .unwrap_or_else(|| "quake-dashboard/0.1".to_string()),
        };

        let initial_range = match lookup("TIME_RANGE") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring TIME_RANGE: {}", e);
                TimeRange::Day
            }),
            None => TimeRange::Day,
        };

        let display = DisplayFormat {
            offset: offset_minutes(parse_var(&lookup, "DISPLAY_UTC_OFFSET_MINUTES").unwrap_or(0)),
            datetime_pattern: pattern(&lookup, "DISPLAY_TIME_FORMAT", DEFAULT_DATETIME_PATTERN),
            date_pattern: pattern(&lookup, "DISPLAY_DATE_FORMAT", DEFAULT_DATE_PATTERN),
        };

        let defaults = ViewOptions::default();
        let view = ViewOptions {
            timeline_limit: parse_var(&lookup, "TIMELINE_LIMIT").unwrap_or(defaults.timeline_limit),
            top_countries_limit: parse_var(&lookup, "TOP_COUNTRIES_LIMIT")
                .unwrap_or(defaults.top_countries_limit),
            country_label_budget: parse_var(&lookup, "COUNTRY_LABEL_BUDGET")
                .unwrap_or(defaults.country_label_budget),
            recent_limit: parse_var(&lookup, "RECENT_LIMIT").unwrap_or(defaults.recent_limit),
            display,
        };

        Self {
            endpoints,
            http,
            initial_range,
            view,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn offset_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| {
            warn!("Ignoring out-of-range display offset: {} minutes", minutes);
            Utc.fix()
        })
}

/// strftime pattern, falling back when it would fail to render
fn pattern<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(p) if StrftimeItems::new(&p).any(|item| matches!(item, Item::Error)) => {
            warn!("Ignoring invalid {}: {:?}", key, p);
            default.to_string()
        }
        Some(p) => p,
        None => default.to_string(),
    }
}
