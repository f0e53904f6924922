//! Region containment: bounding-box reject, then ray casting.
//!
//! Vertices are `(lat, lon)`. In the ray-casting formula latitude plays `y`
//! and longitude plays `x`; the ray runs toward increasing longitude.

use serde::Serialize;

use crate::error::ReconError;

/// Axis-aligned bounds of a region, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    fn from_vertices(vertices: &[(f64, f64)]) -> Self {
        let mut bbox = BoundingBox {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for &(lat, lon) in vertices {
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lat = bbox.max_lat.max(lat);
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.max_lon = bbox.max_lon.max(lon);
        }
        bbox
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Which check decided a containment query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionTest {
    Inside,
    OutsideBoundingBox,
    OutsidePolygon,
}

impl std::fmt::Display for RegionTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inside => write!(f, "inside"),
            Self::OutsideBoundingBox => write!(f, "outside (bounding box)"),
            Self::OutsidePolygon => write!(f, "outside (polygon)"),
        }
    }
}

/// A closed simple polygon; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    vertices: Vec<(f64, f64)>,
    bbox: BoundingBox,
}

impl Region {
    pub fn new(name: impl Into<String>, vertices: Vec<(f64, f64)>) -> Result<Self, ReconError> {
        let name = name.into();

        if vertices.len() < 3 {
            return Err(ReconError::MalformedRegionConfig {
                region: name,
                reason: format!("needs at least 3 vertices, got {}", vertices.len()),
            });
        }

        if let Some(i) = vertices
            .iter()
            .position(|(lat, lon)| !lat.is_finite() || !lon.is_finite())
        {
            return Err(ReconError::MalformedRegionConfig {
                region: name,
                reason: format!("vertex {i} is not a finite coordinate"),
            });
        }

        let bbox = BoundingBox::from_vertices(&vertices);
        Ok(Self { name, vertices, bbox })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn is_inside(&self, lat: f64, lon: f64) -> bool {
        self.classify(lat, lon) == RegionTest::Inside
    }

    pub fn classify(&self, lat: f64, lon: f64) -> RegionTest {
        if !self.bbox.contains(lat, lon) {
            return RegionTest::OutsideBoundingBox;
        }
        if self.polygon_contains(lat, lon) {
            RegionTest::Inside
        } else {
            RegionTest::OutsidePolygon
        }
    }

    /// Even-odd ray casting. Points on an edge land on whichever side the
    /// arithmetic puts them.
    fn polygon_contains(&self, lat: f64, lon: f64) -> bool {
        let v = &self.vertices;
        let mut inside = false;
        let mut j = v.len() - 1;

        for i in 0..v.len() {
            let (yi, xi) = v[i];
            let (yj, xj) = v[j];
            if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}
