use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DropReason;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One element of the map source: kind, numeric id and its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapElement {
    pub kind: String,
    pub id: i64,
    pub tags: BTreeMap<String, String>,
}

impl MapElement {
    /// `"<kind>/<id>"`, e.g. `node/5`.
    pub fn source_ref(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }
}

/// A normalized cross-reference found in the map source.
///
/// `source_ref` is opaque to the engine; it is only carried through to the
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub identifier: String,
    pub source_ref: String,
}

/// A reference-source row as extracted by ingestion, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    /// 1-based data row number in the source file.
    pub row: usize,
    pub identifier: String,
    pub label: String,
    pub latitude: String,
    pub longitude: String,
}

/// Pre-loaded inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub map_entries: Vec<MapEntry>,
    pub candidates: Vec<RawCandidate>,
}

/// A validated reference-source row.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub identifier: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Missing,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// One in-region candidate with its match status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub identifier: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: MatchStatus,
    pub source_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub matched: usize,
    pub missing: usize,
    pub skipped_out_of_region: usize,
}

impl Summary {
    /// Number of records emitted.
    pub fn emitted(&self) -> usize {
        self.matched + self.missing
    }
}

/// A candidate that did not make it into the output, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedCandidate {
    pub row: usize,
    pub identifier: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconOutcome {
    pub records: Vec<ClassifiedRecord>,
    pub summary: Summary,
    pub dropped: Vec<DroppedCandidate>,
}
