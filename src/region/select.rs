use std::path::PathBuf;

use anyhow::Context;

use crate::geofile::geojson::{
    named_feature_collection, read_feature_collection, write_feature_collection,
};

use super::{
    config::Config,
    error::{DirectoryListing, RegionFilterError},
    filter::filter_features,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Number of features in the input collection.
    pub total: usize,
    /// Number of features written to the output collection.
    pub retained: usize,
    /// Number of features dropped for lacking coordinates.
    pub skipped: usize,
    pub output_filepath: PathBuf,
}

/// Read the input collection, keep the features inside the configured bounding box and write them to
/// the output file.
///
/// Nothing is written if the input file does not exist, cannot be parsed, or if a feature lacks
/// coordinates under [`MissingCoordinatePolicy::Fail`](super::filter::MissingCoordinatePolicy::Fail).
pub fn select_points(config: &Config) -> anyhow::Result<SelectionSummary> {
    let input_filepath = config.input_filepath();
    let output_filepath = config.output_filepath();

    log::info!("Loading hazard points data from {:?}...", input_filepath);
    if !input_filepath.exists() {
        return Err(RegionFilterError::InputNotFound {
            listing: DirectoryListing::of(&config.data_dir),
            path: input_filepath,
        }
        .into());
    }
    let collection = read_feature_collection(&input_filepath).map_err(|err| {
        RegionFilterError::InvalidCollection {
            path: input_filepath.clone(),
            reason: format!("{:#}", err),
        }
    })?;

    let crs = collection.crs().cloned();
    if crs.is_none() {
        log::warn!(
            "{:?} has no crs member, the output will not have one either",
            input_filepath
        );
    }
    let total = collection.features.len();

    log::info!(
        "Filtering points in bounding box {:?}...",
        config.bounding_box.corners()
    );
    let filtered = filter_features(
        collection.features,
        &config.bounding_box,
        config.missing_coordinates,
    )?;
    if filtered.skipped > 0 {
        log::warn!(
            "Skipped {} features without coordinates",
            filtered.skipped
        );
    }
    let retained = filtered.features.len();

    log::info!("Saving {} points to {:?}...", retained, output_filepath);
    write_feature_collection(
        named_feature_collection(&config.collection_name, crs, filtered.features),
        &output_filepath,
    )
    .context("Writing selected points")?;
    log::info!("Done!");

    Ok(SelectionSummary {
        total,
        retained,
        skipped: filtered.skipped,
        output_filepath,
    })
}
