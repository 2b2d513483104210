use serde::Deserialize;

use super::error::RegionFilterError;

/// Axis aligned WGS84 bounding box in degrees. All four bounds are inclusive.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WgsBoundingBox {
    pub left_lon: f64,
    pub bottom_lat: f64,
    pub right_lon: f64,
    pub top_lat: f64,
}

/// Approximate bounding box of Norway, roughly 4°E-31°E and 57°N-71°N, buffered by one degree
/// (~100km) on each side.
pub const NORWAY_BOUNDING_BOX: WgsBoundingBox = WgsBoundingBox {
    left_lon: 3.0,
    bottom_lat: 56.0,
    right_lon: 32.0,
    top_lat: 72.0,
};

impl WgsBoundingBox {
    /// Create a bounding box from `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn from_corners(corners: [f64; 4]) -> Result<Self, RegionFilterError> {
        let [left_lon, bottom_lat, right_lon, top_lat] = corners;
        let bbox = Self {
            left_lon,
            bottom_lat,
            right_lon,
            top_lat,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// The bounds as `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn corners(&self) -> [f64; 4] {
        [self.left_lon, self.bottom_lat, self.right_lon, self.top_lat]
    }

    pub fn validate(&self) -> Result<(), RegionFilterError> {
        // Written so that NaN bounds are rejected as well.
        if !(self.left_lon <= self.right_lon && self.bottom_lat <= self.top_lat) {
            return Err(RegionFilterError::InvalidBoundingBox(*self));
        }
        Ok(())
    }

    pub fn contains(&self, point: &geo::Point) -> bool {
        self.left_lon <= point.x()
            && point.x() <= self.right_lon
            && self.bottom_lat <= point.y()
            && point.y() <= self.top_lat
    }
}

impl Default for WgsBoundingBox {
    fn default() -> Self {
        NORWAY_BOUNDING_BOX
    }
}
