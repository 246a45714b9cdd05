/// Domain models for the application
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

/// Country filter value that disables country matching
pub const ALL_COUNTRIES: &str = "all";

/// GeoJSON summary feed document
#[derive(Debug, Clone, Deserialize)]
pub struct FeedCollection {
    pub features: Vec<Feature>,
}

/// One raw feed entry
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub mag: Option<f64>,
    /// Event time in epoch milliseconds
    #[serde(default)]
    pub time: Option<i64>,
}

/// Point geometry, `[longitude, latitude, depth]`; any member may be null
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Vec<Option<f64>>,
}

/// A JSON `null` reads as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized earthquake record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    pub id: String,
    pub place: String,
    pub magnitude: f64,
    pub timestamp: i64,
    /// Display rendering of `timestamp`, never parsed back
    pub time: String,
    pub depth: f64,
    /// `[latitude, longitude]`
    pub coordinates: [f64; 2],
    pub country: String,
}

impl Earthquake {
    pub fn latitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Feed window, one per remote endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Day,
    Week,
    Month,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            other => Err(format!("unknown time range: {}", other)),
        }
    }
}

/// Calendar dates picked by the user; a missing side is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Everything that decides which records get fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub time_range: TimeRange,
    pub dates: Option<DateRange>,
}

impl FeedQuery {
    pub fn for_range(time_range: TimeRange) -> Self {
        Self {
            time_range,
            dates: None,
        }
    }
}

/// Filter settings owned by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    /// `"all"` or a case-insensitive substring of country or place
    pub country: String,
    /// `(low, high)` in km
    pub depth_range: (f64, f64),
    pub time_range: TimeRange,
    pub use_custom_date: bool,
    pub custom_start_date: Option<NaiveDate>,
    pub custom_end_date: Option<NaiveDate>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_magnitude: 0.0,
            max_magnitude: 10.0,
            country: ALL_COUNTRIES.to_string(),
            depth_range: (0.0, 1000.0),
            time_range: TimeRange::Day,
            use_custom_date: false,
            custom_start_date: None,
            custom_end_date: None,
        }
    }
}

impl FilterConfig {
    pub fn is_all_countries(&self) -> bool {
        self.country == ALL_COUNTRIES
    }

    /// Custom dates always read from the widest feed
    pub fn feed_query(&self) -> FeedQuery {
        if self.use_custom_date {
            FeedQuery {
                time_range: TimeRange::Month,
                dates: Some(DateRange {
                    start: self.custom_start_date,
                    end: self.custom_end_date,
                }),
            }
        } else {
            FeedQuery::for_range(self.time_range)
        }
    }
}

/// How timestamps are rendered and where day boundaries fall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    pub offset: FixedOffset,
    pub datetime_pattern: String,
    pub date_pattern: String,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            datetime_pattern: DEFAULT_DATETIME_PATTERN.to_string(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

pub const DEFAULT_DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

impl DisplayFormat {
    pub fn format_datetime(&self, timestamp_ms: i64) -> String {
        self.render(timestamp_ms, &self.datetime_pattern, DEFAULT_DATETIME_PATTERN)
    }

    pub fn format_date(&self, timestamp_ms: i64) -> String {
        self.render(timestamp_ms, &self.date_pattern, DEFAULT_DATE_PATTERN)
    }

    /// Renders with `pattern`, or with `fallback` when `pattern` is invalid
    fn render(&self, timestamp_ms: i64, pattern: &str, fallback: &str) -> String {
        let Some(dt) = DateTime::<Utc>::from_timestamp_millis(timestamp_ms) else {
            return "Invalid date".to_string();
        };
        let local = dt.with_timezone(&self.offset);

        let mut out = String::new();
        if write!(out, "{}", local.format(pattern)).is_ok() {
            return out;
        }
        local.format(fallback).to_string()
    }
}

/// Limits and formatting used when deriving views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub timeline_limit: usize,
    pub top_countries_limit: usize,
    pub country_label_budget: usize,
    pub recent_limit: usize,
    pub display: DisplayFormat,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            timeline_limit: 50,
            top_countries_limit: 15,
            country_label_budget: 20,
            recent_limit: 10,
            display: DisplayFormat::default(),
        }
    }
}

/// Histogram bucket over magnitude
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeBin {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Ranking entry; `label` may be truncated, `country` never is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthPoint {
    pub index: usize,
    pub depth: f64,
    pub magnitude: f64,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub index: usize,
    pub magnitude: f64,
    pub date: String,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
}

/// Overview statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total: usize,
    pub strong_count: usize,
    pub max_magnitude: f64,
    pub average_magnitude: f64,
    pub average_depth: f64,
}

/// Everything the presentation layer renders for one filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub earthquakes: Vec<Earthquake>,
    pub countries: Vec<String>,
    pub summary: SummaryStats,
    pub magnitude_distribution: Vec<MagnitudeBin>,
    pub top_countries: Vec<CountryCount>,
    pub depth_series: Vec<DepthPoint>,
    pub timeline: Vec<TimelinePoint>,
    pub heatmap: Vec<HeatPoint>,
    pub recent: Vec<Earthquake>,
}
