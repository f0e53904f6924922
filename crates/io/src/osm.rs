// Map source: Overpass API JSON export

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use mapgap_recon::identifier::map_entries;
use mapgap_recon::{MapElement, MapEntry, TagKeyFilter};

use crate::error::IoError;

#[derive(Debug, Deserialize)]
struct OverpassDocument {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

impl From<OverpassElement> for MapElement {
    fn from(el: OverpassElement) -> Self {
        MapElement {
            kind: el.kind,
            id: el.id,
            tags: el.tags,
        }
    }
}

/// Map entries loaded from one export, plus how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    pub entries: Vec<MapEntry>,
    pub elements_read: usize,
    /// The file did not exist; `entries` is empty and every candidate will
    /// come out missing.
    pub missing_file: bool,
}

/// Decode an Overpass JSON document into map elements.
pub fn parse_elements(json: &str) -> Result<Vec<MapElement>, serde_json::Error> {
    let doc: OverpassDocument = serde_json::from_str(json)?;
    Ok(doc.elements.into_iter().map(MapElement::from).collect())
}

/// Load and normalize the map source.
///
/// A missing file degrades to an empty source; an undecodable one is fatal.
pub fn load_map_entries(path: &Path, filter: &TagKeyFilter) -> Result<MapSource, IoError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                path = %path.display(),
                "map source not found, every candidate will be reported missing"
            );
            return Ok(MapSource {
                missing_file: true,
                ..MapSource::default()
            });
        }
        Err(source) => {
            return Err(IoError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let elements = parse_elements(&json).map_err(|e| IoError::MapDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let entries = map_entries(&elements, filter);
    tracing::info!(
        path = %path.display(),
        elements = elements.len(),
        entries = entries.len(),
        mode = %filter.mode(),
        "map source loaded"
    );

    Ok(MapSource {
        entries,
        elements_read: elements.len(),
        missing_file: false,
    })
}
