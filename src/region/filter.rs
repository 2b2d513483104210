use geojson::JsonValue;
use serde::Deserialize;

use crate::geofile::feature::property_point;

use super::{bounding_box::WgsBoundingBox, error::RegionFilterError};

/// What to do with a feature lacking numeric `Longitude`/`Latitude` properties.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingCoordinatePolicy {
    /// Leave the feature out of the output and log a warning.
    #[default]
    Skip,
    /// Abort the whole run.
    Fail,
}

#[derive(Debug)]
pub struct FilteredFeatures {
    /// Retained features, in input order.
    pub features: Vec<JsonValue>,
    /// Number of features dropped because they had no usable coordinates.
    pub skipped: usize,
}

/// Keep the features whose property coordinates fall inside `bbox`, preserving input order.
pub fn filter_features(
    features: Vec<JsonValue>,
    bbox: &WgsBoundingBox,
    policy: MissingCoordinatePolicy,
) -> Result<FilteredFeatures, RegionFilterError> {
    let mut retained = Vec::new();
    let mut skipped = 0;
    for (index, feature) in features.into_iter().enumerate() {
        match property_point(&feature) {
            Some(point) => {
                if bbox.contains(&point) {
                    retained.push(feature);
                }
            }
            None => match policy {
                MissingCoordinatePolicy::Skip => {
                    log::warn!(
                        "Skipping feature {} without numeric Longitude/Latitude properties",
                        index
                    );
                    skipped += 1;
                }
                MissingCoordinatePolicy::Fail => {
                    return Err(RegionFilterError::MissingCoordinates { index })
                }
            },
        }
    }
    Ok(FilteredFeatures {
        features: retained,
        skipped,
    })
}
