// Country and region classification from free-text place names

/// Region used when a place string has nothing to classify
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Feed abbreviations and island groups mapped to the owning region
const OVERRIDES: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AR", "Arkansas"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PR", "Puerto Rico"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("WA", "Washington"),
    ("WY", "Wyoming"),
    ("MX", "Mexico"),
    ("US", "United States"),
    ("Kuril Islands", "Russia"),
    ("Komandorskiye Ostrova", "Russia"),
    ("Izu Islands", "Japan"),
    ("Bonin Islands", "Japan"),
    ("Ryukyu Islands", "Japan"),
    ("Kermadec Islands", "New Zealand"),
    ("Andreanof Islands", "Alaska"),
    ("Rat Islands", "Alaska"),
    ("Fox Islands", "Alaska"),
    ("Aleutian Islands", "Alaska"),
    ("South Sandwich Islands", "United Kingdom"),
    ("Balleny Islands", "Antarctica"),
    ("Loyalty Islands", "New Caledonia"),
];

/// Map a raw place string to its country or region.
///
/// The feed ends most place strings with a region after the last comma
/// ("12 km SSW of Volcano, Hawaii", "south of the Fiji Islands"). That
/// trailing segment is the region unless the override table knows better.
/// Anything the table misses passes through untouched.
pub fn classify(place: Option<&str>) -> String {
    let segment = place
        .and_then(|p| p.rsplit(',').next())
        .map(str::trim)
        .unwrap_or_default();

    if segment.is_empty() {
        return UNKNOWN_COUNTRY.to_string();
    }

    lookup_override(segment).unwrap_or(segment).to_string()
}

fn lookup_override(segment: &str) -> Option<&'static str> {
    OVERRIDES
        .iter()
        .find(|(key, _)| *key == segment)
        .map(|(_, name)| *name)
}
