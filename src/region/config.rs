use anyhow::anyhow;
use serde::Deserialize;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use super::{bounding_box::WgsBoundingBox, filter::MissingCoordinatePolicy};

pub const DEFAULT_INPUT_FILENAME: &str = "hazard_points_with_id.geojson";
pub const DEFAULT_OUTPUT_FILENAME: &str = "points.geojson";
pub const DEFAULT_COLLECTION_NAME: &str = "NorwayHazardPoints";

/// The `data` directory next to the crate sources.
pub fn default_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Settings of a region filter run. Every field is optional in the YAML file, missing fields fall
/// back to the defaults.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Input file name, relative to `data_dir`.
    pub input_filename: PathBuf,
    /// Output file name, relative to `data_dir`.
    pub output_filename: PathBuf,
    pub bounding_box: WgsBoundingBox,
    /// Value of the `name` member of the output collection.
    pub collection_name: String,
    pub missing_coordinates: MissingCoordinatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            input_filename: PathBuf::from(DEFAULT_INPUT_FILENAME),
            output_filename: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            bounding_box: WgsBoundingBox::default(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            missing_coordinates: MissingCoordinatePolicy::default(),
        }
    }
}

impl Config {
    pub fn load(config_filepath: &Path) -> anyhow::Result<Self> {
        if !config_filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", config_filepath));
        }
        let config_contents = read_to_string(config_filepath)?;
        let config: Config = serde_yaml::from_str(&config_contents)?;
        config.bounding_box.validate()?;
        Ok(config)
    }

    pub fn input_filepath(&self) -> PathBuf {
        self.data_dir.join(&self.input_filename)
    }

    pub fn output_filepath(&self) -> PathBuf {
        self.data_dir.join(&self.output_filename)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};
    use testdir::testdir;

    use crate::region::{bounding_box::WgsBoundingBox, filter::MissingCoordinatePolicy};

    use super::{default_data_dir, Config};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            default_data_dir().join("hazard_points_with_id.geojson"),
            config.input_filepath()
        );
        assert_eq!(default_data_dir().join("points.geojson"), config.output_filepath());
        assert_eq!([3.0, 56.0, 32.0, 72.0], config.bounding_box.corners());
        assert_eq!("NorwayHazardPoints", config.collection_name);
        assert_eq!(MissingCoordinatePolicy::Skip, config.missing_coordinates);
    }

    #[test]
    fn test_load_partial_config() {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        fs::write(
            &config_filepath,
            "data_dir: /tmp/hazards
output_filename: selected/sweden.geojson
bounding_box:
  left_lon: 11.0
  bottom_lat: 55.0
  right_lon: 24.0
  top_lat: 69.0
missing_coordinates: fail
",
        )
        .unwrap();

        let config = Config::load(&config_filepath).unwrap();
        assert_eq!(PathBuf::from("/tmp/hazards"), config.data_dir);
        assert_eq!(
            PathBuf::from("/tmp/hazards/hazard_points_with_id.geojson"),
            config.input_filepath()
        );
        assert_eq!(
            PathBuf::from("/tmp/hazards/selected/sweden.geojson"),
            config.output_filepath()
        );
        assert_eq!(
            WgsBoundingBox::from_corners([11.0, 55.0, 24.0, 69.0]).unwrap(),
            config.bounding_box
        );
        assert_eq!("NorwayHazardPoints", config.collection_name);
        assert_eq!(MissingCoordinatePolicy::Fail, config.missing_coordinates);
    }

    #[test]
    fn test_load_missing_config() {
        let test_dir = testdir!();
        assert!(Config::load(&test_dir.join("missing.yaml")).is_err());
    }

    #[test]
    fn test_load_config_with_inverted_bounding_box() {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        fs::write(
            &config_filepath,
            "bounding_box:
  left_lon: 32.0
  bottom_lat: 56.0
  right_lon: 3.0
  top_lat: 72.0
",
        )
        .unwrap();

        assert!(Config::load(&config_filepath).is_err());
    }
}
