//! GeoJSON rendering of read results.

use geobufr_core::{GeoFeature, ReadOutcome};
use serde_json::{Value, json};

/// Render `outcome` as a GeoJSON `FeatureCollection`.
///
/// Tables with rows carry a named `crs` member. Empty results render as a
/// collection with no features and no `crs`.
pub(crate) fn feature_collection(outcome: &ReadOutcome) -> Result<Value, serde_json::Error> {
    let ReadOutcome::Geo(table) = outcome else {
        return Ok(json!({ "type": "FeatureCollection", "features": [] }));
    };
    let features = table
        .features()
        .iter()
        .map(feature)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "type": "FeatureCollection",
        "crs": {
            "type": "name",
            "properties": { "name": table.crs().as_str() },
        },
        "features": features,
    }))
}

// Missing values and non-finite floats serialize as null.
fn feature(feature: &GeoFeature) -> Result<Value, serde_json::Error> {
    let properties = serde_json::to_value(&feature.properties)?;
    Ok(json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [feature.geometry.x(), feature.geometry.y()],
        },
        "properties": properties,
    }))
}
