use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::region::Region;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Everything a run needs, loaded once before the engine starts.
///
/// Every section is optional; an empty file is a valid config that targets
/// the built-in region with the default file names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub columns: ColumnAliases,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// How a tag key is tested against the marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatchMode {
    /// Key ends with the marker (`wikidata`, `brand:wikidata`).
    #[default]
    Suffix,
    /// Key contains the marker anywhere (`wikidata:note` too).
    Contains,
}

impl std::fmt::Display for TagMatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suffix => write!(f, "suffix"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    #[serde(default)]
    pub tag_match_mode: TagMatchMode,
    #[serde(default = "default_tag_marker")]
    pub tag_marker: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            tag_match_mode: TagMatchMode::Suffix,
            tag_marker: default_tag_marker(),
        }
    }
}

fn default_tag_marker() -> String {
    "wikidata".into()
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Name of the region used when the config does not define one.
pub const DEFAULT_REGION_NAME: &str = "south-tyrol";

/// Outline of South Tyrol as `(lat, lon)`, clockwise from the Reschen pass.
///
/// Coarse on purpose: the dataset is POIs, not cadastral parcels. The notch
/// at the second vertex follows the Ötztal Alps ridge.
pub const SOUTH_TYROL: &[(f64, f64)] = &[
    (46.84, 10.46),
    (46.77, 10.80),
    (46.86, 11.02),
    (47.00, 11.50),
    (47.10, 12.15),
    (46.93, 12.30),
    (46.77, 12.45),
    (46.62, 12.15),
    (46.55, 11.85),
    (46.35, 11.55),
    (46.22, 11.20),
    (46.40, 10.95),
    (46.47, 10.62),
    (46.55, 10.45),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    #[serde(default = "default_region_name")]
    pub name: String,
    /// `[lat, lon]` pairs; order defines the edges.
    #[serde(default = "default_region_vertices")]
    pub vertices: Vec<[f64; 2]>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: default_region_name(),
            vertices: default_region_vertices(),
        }
    }
}

fn default_region_name() -> String {
    DEFAULT_REGION_NAME.into()
}

fn default_region_vertices() -> Vec<[f64; 2]> {
    SOUTH_TYROL.iter().map(|&(lat, lon)| [lat, lon]).collect()
}

impl RegionConfig {
    pub fn build(&self) -> Result<Region, ReconError> {
        let vertices: Vec<(f64, f64)> = self.vertices.iter().map(|&[lat, lon]| (lat, lon)).collect();
        Region::new(self.name.clone(), vertices)
    }
}

// ---------------------------------------------------------------------------
// Sources + columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Map-source export (Overpass JSON).
    #[serde(default = "default_map_file")]
    pub map: String,
    /// Reference-source export (CSV).
    #[serde(default = "default_reference_file")]
    pub reference: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            map: default_map_file(),
            reference: default_reference_file(),
            delimiter: default_delimiter(),
        }
    }
}

impl SourcesConfig {
    /// The delimiter as a single byte. Only meaningful after `validate`.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

fn default_map_file() -> String {
    "osm.json".into()
}

fn default_reference_file() -> String {
    "query.csv".into()
}

fn default_delimiter() -> String {
    ",".into()
}

/// Accepted header names per logical column; first one present wins.
///
/// SPARQL endpoints prefix variables with `?` in some export modes, so both
/// spellings are listed by default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnAliases {
    #[serde(default = "default_identifier_columns")]
    pub identifier: Vec<String>,
    #[serde(default = "default_latitude_columns")]
    pub latitude: Vec<String>,
    #[serde(default = "default_longitude_columns")]
    pub longitude: Vec<String>,
    #[serde(default = "default_label_columns")]
    pub label: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            identifier: default_identifier_columns(),
            latitude: default_latitude_columns(),
            longitude: default_longitude_columns(),
            label: default_label_columns(),
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_identifier_columns() -> Vec<String> {
    strings(&["qid", "?qid", "item", "?item"])
}

fn default_latitude_columns() -> Vec<String> {
    strings(&["lat", "?lat"])
}

fn default_longitude_columns() -> Vec<String> {
    strings(&["lon", "?lon"])
}

fn default_label_columns() -> Vec<String> {
    strings(&["label", "?label", "itemLabel", "?itemLabel"])
}

// ---------------------------------------------------------------------------
// Output + engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_geojson_file")]
    pub geojson: String,
    #[serde(default)]
    pub report: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            geojson: default_geojson_file(),
            report: None,
        }
    }
}

fn default_geojson_file() -> String {
    "data.geojson".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    4096
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.matching.tag_marker.is_empty() {
            return Err(ReconError::ConfigValidation(
                "matching.tag_marker must not be empty".into(),
            ));
        }

        let delimiter = self.sources.delimiter.as_bytes();
        if delimiter.len() != 1 {
            return Err(ReconError::ConfigValidation(format!(
                "sources.delimiter must be a single ASCII character, got {:?}",
                self.sources.delimiter
            )));
        }

        for (name, aliases) in [
            ("identifier", &self.columns.identifier),
            ("latitude", &self.columns.latitude),
            ("longitude", &self.columns.longitude),
        ] {
            if aliases.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{name} needs at least one header name"
                )));
            }
        }

        if self.engine.chunk_size == 0 {
            return Err(ReconError::ConfigValidation(
                "engine.chunk_size must be at least 1".into(),
            ));
        }

        // Fails fast on a polygon that cannot be classified against.
        self.region.build()?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
