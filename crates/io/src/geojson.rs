// GeoJSON FeatureCollection output for map renderers

use serde::Serialize;

use mapgap_recon::{ClassifiedRecord, MatchStatus};

use crate::error::IoError;

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Point,
    properties: Properties<'a>,
}

#[derive(Serialize)]
struct Point {
    #[serde(rename = "type")]
    kind: &'static str,
    /// `[lon, lat]`, GeoJSON axis order.
    coordinates: [f64; 2],
}

#[derive(Serialize)]
struct Properties<'a> {
    identifier: &'a str,
    name: &'a str,
    status: MatchStatus,
    #[serde(rename = "sourceRef")]
    source_ref: Option<&'a str>,
}

fn feature(record: &ClassifiedRecord) -> Feature<'_> {
    Feature {
        kind: "Feature",
        geometry: Point {
            kind: "Point",
            coordinates: [record.longitude, record.latitude],
        },
        properties: Properties {
            identifier: &record.identifier,
            name: &record.label,
            status: record.status,
            source_ref: record.source_ref.as_deref(),
        },
    }
}

/// Render records as a compact FeatureCollection, in record order.
pub fn to_geojson_string(records: &[ClassifiedRecord]) -> Result<String, IoError> {
    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features: records.iter().map(feature).collect(),
    };
    Ok(serde_json::to_string(&collection)?)
}
