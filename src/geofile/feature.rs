use geojson::JsonValue;

pub const PROPERTIES_MEMBER: &str = "properties";
pub const LONGITUDE_PROPERTY: &str = "Longitude";
pub const LATITUDE_PROPERTY: &str = "Latitude";

/// Read the position of a raw GeoJSON feature from its `Longitude` and `Latitude` properties.
///
/// The geometry of the feature is not consulted and need not be present. Returns `None` if the
/// feature has no properties object, or if either property is absent or is not a number, e.g. a
/// string or null.
pub fn property_point(feature: &JsonValue) -> Option<geo::Point> {
    let properties = feature.get(PROPERTIES_MEMBER)?.as_object()?;
    let lon = properties
        .get(LONGITUDE_PROPERTY)
        .and_then(JsonValue::as_f64)?;
    let lat = properties
        .get(LATITUDE_PROPERTY)
        .and_then(JsonValue::as_f64)?;
    Some(geo::Point::new(lon, lat))
}
