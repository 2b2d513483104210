use anyhow::{anyhow, Context};
use geojson::{JsonObject, JsonValue};
use std::{fs, path::Path};

pub const TYPE_MEMBER: &str = "type";
pub const NAME_MEMBER: &str = "name";
pub const CRS_MEMBER: &str = "crs";
pub const FEATURES_MEMBER: &str = "features";
pub const FEATURE_COLLECTION_TYPE: &str = "FeatureCollection";

/// A FeatureCollection whose features are kept as raw JSON.
///
/// Only the collection level is checked when reading. Features are not parsed, so a feature without
/// a `geometry` member, or with one that is not valid GeoJSON, is carried through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeatureCollection {
    /// Members of the collection other than `type` and `features`, e.g. `name` and `crs`.
    pub members: JsonObject,
    pub features: Vec<JsonValue>,
}

impl RawFeatureCollection {
    pub fn crs(&self) -> Option<&JsonValue> {
        self.members.get(CRS_MEMBER)
    }
}

pub fn read_feature_collection(filepath: &Path) -> anyhow::Result<RawFeatureCollection> {
    let contents = fs::read_to_string(filepath)
        .with_context(|| format!("Reading GeoJSON from {:?}", filepath))?;
    let geojson_contents: JsonValue = serde_json::from_str(&contents)
        .with_context(|| format!("Parsing GeoJSON from {:?}", filepath))?;
    let mut members = match geojson_contents {
        JsonValue::Object(members) => members,
        _ => return Err(anyhow!("Expected a JSON object at the top level")),
    };
    match members.remove(TYPE_MEMBER) {
        Some(JsonValue::String(type_name)) if type_name == FEATURE_COLLECTION_TYPE => {}
        Some(other) => return Err(anyhow!("Expected a FeatureCollection, found type {}", other)),
        None => return Err(anyhow!("Expected a FeatureCollection, found no type member")),
    }
    let features = match members.remove(FEATURES_MEMBER) {
        Some(JsonValue::Array(features)) => features,
        Some(_) => return Err(anyhow!("The features member is not an array")),
        None => return Err(anyhow!("The FeatureCollection has no features member")),
    };
    Ok(RawFeatureCollection { members, features })
}

/// Build a collection carrying a `name` and, if given, a `crs` member. Features are written as given.
pub fn named_feature_collection(
    name: &str,
    crs: Option<JsonValue>,
    features: Vec<JsonValue>,
) -> JsonObject {
    let mut collection = JsonObject::new();
    collection.insert(
        TYPE_MEMBER.to_string(),
        JsonValue::from(FEATURE_COLLECTION_TYPE),
    );
    collection.insert(NAME_MEMBER.to_string(), JsonValue::from(name));
    if let Some(crs) = crs {
        collection.insert(CRS_MEMBER.to_string(), crs);
    }
    collection.insert(FEATURES_MEMBER.to_string(), JsonValue::Array(features));
    collection
}

/// Write a feature collection to file, creating missing parent directories of the output path.
pub fn write_feature_collection(collection: JsonObject, output_filepath: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output_filepath.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output directory {:?}", parent))?;
        }
    }
    let geojson_contents = JsonValue::Object(collection);
    fs::write(output_filepath, geojson_contents.to_string())
        .with_context(|| format!("Writing GeoJSON to {:?}", output_filepath))
}
