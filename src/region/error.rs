use std::{fmt, fs, path::Path, path::PathBuf};

use thiserror::Error;

use super::bounding_box::WgsBoundingBox;

#[derive(Debug, Error)]
pub enum RegionFilterError {
    #[error("File not found at {path:?}\n{listing}")]
    InputNotFound {
        path: PathBuf,
        listing: DirectoryListing,
    },

    #[error("{path:?} does not hold a GeoJSON FeatureCollection: {reason}")]
    InvalidCollection { path: PathBuf, reason: String },

    #[error("Feature {index} has no numeric Longitude and Latitude properties")]
    MissingCoordinates { index: usize },

    #[error("Invalid bounding box {0:?}, minimum bounds must not exceed maximum bounds")]
    InvalidBoundingBox(WgsBoundingBox),
}

/// Contents of a data directory, reported to the operator when an input file is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryListing {
    Entries { dir: PathBuf, names: Vec<String> },
    MissingDirectory(PathBuf),
}

impl DirectoryListing {
    pub fn of(dir: &Path) -> Self {
        if !dir.is_dir() {
            return DirectoryListing::MissingDirectory(dir.to_path_buf());
        }
        let mut names: Vec<String> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(err) => {
                log::debug!("Could not list {:?}: {}", dir, err);
                Vec::new()
            }
        };
        names.sort();
        DirectoryListing::Entries {
            dir: dir.to_path_buf(),
            names,
        }
    }
}

impl fmt::Display for DirectoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryListing::Entries { dir, names } => {
                write!(f, "Available files in data directory {:?}:\n{:?}", dir, names)
            }
            DirectoryListing::MissingDirectory(dir) => {
                write!(f, "Data directory {:?} does not exist", dir)
            }
        }
    }
}
