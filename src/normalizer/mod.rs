/// Raw feed entries to normalized earthquake records
use crate::country::classify;
use crate::domain::{DisplayFormat, Earthquake, Feature};

pub const UNKNOWN_PLACE: &str = "Unknown location";

/// Turns feed features into [`Earthquake`] records.
///
/// Normalization never fails: every missing optional member has a
/// default, so one raw entry always yields exactly one record.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    display: DisplayFormat,
}

impl Normalizer {
    pub fn new(display: DisplayFormat) -> Self {
        Self { display }
    }

    pub fn display(&self) -> &DisplayFormat {
        &self.display
    }

    pub fn normalize_all(&self, features: &[Feature]) -> Vec<Earthquake> {
        features.iter().map(|f| self.normalize(f)).collect()
    }

    pub fn normalize(&self, feature: &Feature) -> Earthquake {
        let props = &feature.properties;
        let coords = feature
            .geometry
            .as_ref()
            .map(|g| g.coordinates.as_slice())
            .unwrap_or_default();
        let coord = |i: usize| coords.get(i).copied().flatten().unwrap_or(0.0);

        let raw_place = props.place.as_deref().filter(|p| !p.is_empty());
        let timestamp = props.time.unwrap_or(0);

        Earthquake {
            id: feature.id.clone(),
            place: raw_place.unwrap_or(UNKNOWN_PLACE).to_string(),
            magnitude: props.mag.unwrap_or(0.0).max(0.0),
            timestamp,
            time: self.display.format_datetime(timestamp),
            depth: coord(2).abs(),
            coordinates: [
                coord(1).clamp(-90.0, 90.0),
                coord(0).clamp(-180.0, 180.0),
            ],
            country: classify(raw_place),
        }
    }
}
