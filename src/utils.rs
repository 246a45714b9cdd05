/// Utility functions
use chrono::{FixedOffset, NaiveDate, NaiveTime};

/// First comma-separated segment of a place description
pub fn short_place(place: &str) -> String {
    place.split(',').next().unwrap_or_default().trim().to_string()
}

/// Shorten a display label to `budget` characters plus an ellipsis
pub fn truncate_label(label: &str, budget: usize) -> String {
    if label.chars().count() <= budget {
        return label.to_string();
    }
    let mut short: String = label.chars().take(budget).collect();
    short.push_str("...");
    short
}

/// Mean that reports zero for an empty input
pub fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Epoch milliseconds of local midnight at the start of `date`
pub fn start_of_day_ms(date: NaiveDate, offset: &FixedOffset) -> i64 {
    let midnight_utc = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    midnight_utc - i64::from(offset.local_minus_utc()) * 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_place() {
        assert_eq!(short_place("120km SE of Tokyo, Japan"), "120km SE of Tokyo");
        assert_eq!(short_place("Kuril Islands"), "Kuril Islands");
        assert_eq!(short_place(""), "");
    }

    #[test]
    fn test_truncate_label_short() {
        assert_eq!(truncate_label("Japan", 20), "Japan");
    }

    #[test]
    fn test_truncate_label_long() {
        assert_eq!(
            truncate_label("south of the Fiji Islands", 10),
            "south of t..."
        );
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        assert_eq!(truncate_label("Nouvelle-Calédonie", 11), "Nouvelle-Ca...");
        assert_eq!(truncate_label("Calédonie", 9), "Calédonie");
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(average(0.0, 0), 0.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(30.0, 4), 7.5);
    }

    #[test]
    fn test_start_of_day_utc() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(start_of_day_ms(date, &utc), 1_704_844_800_000);
    }

    #[test]
    fn test_start_of_day_with_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            start_of_day_ms(date, &tokyo),
            1_704_844_800_000 - 9 * 3_600_000
        );
    }
}
