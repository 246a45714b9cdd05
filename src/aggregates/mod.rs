/// Derived dashboard views over a filtered record collection
use crate::domain::{
    CountryCount, DashboardView, DepthPoint, DisplayFormat, Earthquake, FilterConfig, HeatPoint,
    MagnitudeBin, SummaryStats, TimelinePoint, ViewOptions,
};
use crate::filters;
use crate::utils::{average, short_place, truncate_label};
use std::collections::{BTreeSet, HashMap};

/// Upper bound of the top bin, which is closed on both ends
pub const MAX_MAGNITUDE: f64 = 10.0;

/// Magnitude at which a quake counts as strong
pub const STRONG_MAGNITUDE: f64 = 5.0;

const BINS: [(&str, f64, f64); 6] = [
    ("Micro (0-2)", 0.0, 2.0),
    ("Minor (2-3)", 2.0, 3.0),
    ("Light (3-4)", 3.0, 4.0),
    ("Moderate (4-5)", 4.0, 5.0),
    ("Strong (5-6)", 5.0, 6.0),
    ("Major (6+)", 6.0, MAX_MAGNITUDE),
];

/// Count records per magnitude bin
pub fn magnitude_distribution(records: &[Earthquake]) -> Vec<MagnitudeBin> {
    let last = BINS.len() - 1;
    BINS.iter()
        .enumerate()
        .map(|(i, &(label, min, max))| {
            let count = records
                .iter()
                .filter(|eq| {
                    min <= eq.magnitude
                        && (eq.magnitude < max || (i == last && eq.magnitude <= max))
                })
                .count();
            MagnitudeBin {
                label,
                min,
                max,
                count,
            }
        })
        .collect()
}

/// Most frequent countries, ties kept in first-seen order
pub fn top_countries(
    records: &[Earthquake],
    limit: usize,
    label_budget: usize,
) -> Vec<CountryCount> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for eq in records {
        match slots.get(eq.country.as_str()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(eq.country.as_str(), counts.len());
                counts.push((eq.country.as_str(), 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(limit)
        .map(|(country, count)| CountryCount {
            country: country.to_string(),
            label: truncate_label(country, label_budget),
            count,
        })
        .collect()
}

pub fn depth_series(records: &[Earthquake]) -> Vec<DepthPoint> {
    records
        .iter()
        .enumerate()
        .map(|(index, eq)| DepthPoint {
            index,
            depth: eq.depth,
            magnitude: eq.magnitude,
            place: short_place(&eq.place),
        })
        .collect()
}

/// Oldest `limit` records in time order
pub fn timeline(
    records: &[Earthquake],
    limit: usize,
    display: &DisplayFormat,
) -> Vec<TimelinePoint> {
    let mut ordered: Vec<&Earthquake> = records.iter().collect();
    ordered.sort_by_key(|eq| eq.timestamp);

    ordered
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, eq)| TimelinePoint {
            index,
            magnitude: eq.magnitude,
            date: display.format_date(eq.timestamp),
            place: short_place(&eq.place),
        })
        .collect()
}

/// Sorted distinct countries; feed it the unfiltered fetch
pub fn distinct_countries(records: &[Earthquake]) -> Vec<String> {
    records
        .iter()
        .map(|eq| eq.country.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn summary(records: &[Earthquake]) -> SummaryStats {
    let total = records.len();
    let strong_count = records
        .iter()
        .filter(|eq| eq.magnitude >= STRONG_MAGNITUDE)
        .count();
    let max_magnitude = records.iter().map(|eq| eq.magnitude).fold(0.0, f64::max);
    let magnitude_sum: f64 = records.iter().map(|eq| eq.magnitude).sum();
    let depth_sum: f64 = records.iter().map(|eq| eq.depth).sum();

    SummaryStats {
        total,
        strong_count,
        max_magnitude,
        average_magnitude: average(magnitude_sum, total),
        average_depth: average(depth_sum, total),
    }
}

/// Heatmap points weighted by magnitude on a 0-1 scale
pub fn heatmap(records: &[Earthquake]) -> Vec<HeatPoint> {
    records
        .iter()
        .map(|eq| HeatPoint {
            latitude: eq.latitude(),
            longitude: eq.longitude(),
            intensity: eq.magnitude / MAX_MAGNITUDE,
        })
        .collect()
}

pub fn recent(records: &[Earthquake], limit: usize) -> Vec<Earthquake> {
    records.iter().take(limit).cloned().collect()
}

/// Filter the fetched records and derive every view from the result
pub fn build_view(
    all: &[Earthquake],
    config: &FilterConfig,
    options: &ViewOptions,
) -> DashboardView {
    let filtered = filters::apply(all, config);

    DashboardView {
        countries: distinct_countries(all),
        summary: summary(&filtered),
        magnitude_distribution: magnitude_distribution(&filtered),
        top_countries: top_countries(
            &filtered,
            options.top_countries_limit,
            options.country_label_budget,
        ),
        depth_series: depth_series(&filtered),
        timeline: timeline(&filtered, options.timeline_limit, &options.display),
        heatmap: heatmap(&filtered),
        recent: recent(&filtered, options.recent_limit),
        earthquakes: filtered,
    }
}
