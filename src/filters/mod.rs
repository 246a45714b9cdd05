/// Record filtering; an inverted range or unmatched country keeps nothing
use crate::domain::{DateRange, Earthquake, FilterConfig};
use crate::utils::start_of_day_ms;
use chrono::{Days, FixedOffset};

/// A [`FilterConfig`] prepared for evaluating many records
#[derive(Debug, Clone)]
pub struct RecordFilter {
    magnitude: (f64, f64),
    depth: (f64, f64),
    /// Lower-cased country needle, `None` for "all"
    needle: Option<String>,
}

impl RecordFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let needle = if config.is_all_countries() {
            None
        } else {
            Some(config.country.to_lowercase())
        };
        Self {
            magnitude: (config.min_magnitude, config.max_magnitude),
            depth: config.depth_range,
            needle,
        }
    }

    pub fn matches(&self, eq: &Earthquake) -> bool {
        let (min_mag, max_mag) = self.magnitude;
        let (min_depth, max_depth) = self.depth;

        min_mag <= eq.magnitude
            && eq.magnitude <= max_mag
            && min_depth <= eq.depth
            && eq.depth <= max_depth
            && self.matches_country(eq)
    }

    /// Either the canonical country or the raw place may contain the needle
    fn matches_country(&self, eq: &Earthquake) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => {
                eq.country.to_lowercase().contains(needle.as_str())
                    || eq.place.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Evaluate one record against a configuration
pub fn matches(eq: &Earthquake, config: &FilterConfig) -> bool {
    RecordFilter::new(config).matches(eq)
}

/// Records passing the configuration, in input order
pub fn apply(records: &[Earthquake], config: &FilterConfig) -> Vec<Earthquake> {
    let filter = RecordFilter::new(config);
    records
        .iter()
        .filter(|eq| filter.matches(eq))
        .cloned()
        .collect()
}

/// Custom date window in epoch milliseconds, `[start, end)`.
///
/// The end bound is midnight after the chosen end date, so the whole end
/// day is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

impl DateWindow {
    pub fn new(range: &DateRange, offset: &FixedOffset) -> Self {
        let start_ms = range.start.map(|d| start_of_day_ms(d, offset));
        let end_ms = range
            .end
            .map(|d| match d.checked_add_days(Days::new(1)) {
                Some(next) => start_of_day_ms(next, offset),
                None => i64::MAX,
            });
        Self { start_ms, end_ms }
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        self.start_ms.map_or(true, |start| start <= timestamp_ms)
            && self.end_ms.map_or(true, |end| timestamp_ms < end)
    }

    pub fn retain(&self, records: &mut Vec<Earthquake>) {
        records.retain(|eq| self.contains(eq.timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn quake(id: &str, magnitude: f64, depth: f64, place: &str, country: &str) -> Earthquake {
        Earthquake {
            id: id.to_string(),
            place: place.to_string(),
            magnitude,
            timestamp: 0,
            time: String::new(),
            depth,
            coordinates: [0.0, 0.0],
            country: country.to_string(),
        }
    }

    fn sample() -> Vec<Earthquake> {
        vec![
            quake("a", 5.2, 10.0, "120km SE of Tokyo, Japan", "Japan"),
            quake("b", 3.1, 35.0, "50km N of Santiago, Chile", "Chile"),
            quake("c", 7.0, 600.0, "Izu Islands", "Japan"),
        ]
    }

    #[test]
    fn test_magnitude_bounds_inclusive() {
        let config = FilterConfig {
            min_magnitude: 4.0,
            max_magnitude: 10.0,
            ..FilterConfig::default()
        };
        let kept = apply(&sample(), &config);
        let ids: Vec<&str> = kept.iter().map(|eq| eq.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let config = FilterConfig {
            min_magnitude: 5.2,
            max_magnitude: 5.2,
            ..FilterConfig::default()
        };
        assert_eq!(apply(&sample(), &config).len(), 1);
    }

    #[test]
    fn test_inverted_ranges_keep_nothing() {
        let config = FilterConfig {
            min_magnitude: 8.0,
            max_magnitude: 2.0,
            ..FilterConfig::default()
        };
        assert!(apply(&sample(), &config).is_empty());

        let config = FilterConfig {
            depth_range: (500.0, 100.0),
            ..FilterConfig::default()
        };
        assert!(apply(&sample(), &config).is_empty());
    }

    #[test]
    fn test_depth_range() {
        let config = FilterConfig {
            depth_range: (0.0, 35.0),
            ..FilterConfig::default()
        };
        assert_eq!(apply(&sample(), &config).len(), 2);
    }

    #[test]
    fn test_country_case_insensitive() {
        let config = FilterConfig {
            country: "JAPAN".to_string(),
            ..FilterConfig::default()
        };
        assert_eq!(apply(&sample(), &config).len(), 2);
    }

    #[test]
    fn test_country_matches_place_text() {
        let config = FilterConfig {
            country: "santiago".to_string(),
            ..FilterConfig::default()
        };
        let kept = apply(&sample(), &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "b");
    }

    #[test]
    fn test_country_without_match() {
        let config = FilterConfig {
            country: "Peru".to_string(),
            ..FilterConfig::default()
        };
        assert!(apply(&sample(), &config).is_empty());
    }

    #[test]
    fn test_single_record_predicate() {
        let records = sample();
        assert!(matches(&records[0], &FilterConfig::default()));
    }

    #[test]
    fn test_date_window_covers_whole_end_day() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let window = DateWindow::new(
            &DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 10),
                end: NaiveDate::from_ymd_opt(2024, 1, 12),
            },
            &utc,
        );
        // 2024-01-10T00:00:00Z and 2024-01-13T00:00:00Z
        let start = 1_704_844_800_000;
        let end = 1_705_104_000_000;

        assert!(!window.contains(start - 1));
        assert!(window.contains(start));
        assert!(window.contains(end - 1));
        assert!(!window.contains(end));
    }

    #[test]
    fn test_date_window_open_sides() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let window = DateWindow::new(
            &DateRange {
                start: None,
                end: NaiveDate::from_ymd_opt(2024, 1, 12),
            },
            &utc,
        );
        assert!(window.contains(i64::MIN));
        assert!(!window.contains(1_705_104_000_000));

        let unbounded = DateWindow::new(&DateRange::default(), &utc);
        assert!(unbounded.contains(0));
    }

    #[test]
    fn test_date_window_retain() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let window = DateWindow::new(
            &DateRange {
                start: NaiveDate::from_ymd_opt(2024, 1, 10),
                end: NaiveDate::from_ymd_opt(2024, 1, 10),
            },
            &utc,
        );
        let mut records = sample();
        records[0].timestamp = 1_704_844_800_000 + 3_600_000;
        records[1].timestamp = 1_704_844_800_000 - 1;
        records[2].timestamp = 1_704_844_800_000 + 86_400_000;
        window.retain(&mut records);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }
}
