// JSON run report: summary counts plus why each dropped row was dropped

use serde::Serialize;

use mapgap_recon::{DroppedCandidate, ReconOutcome, Summary, TagMatchMode};

use crate::error::IoError;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub region: String,
    pub tag_match_mode: TagMatchMode,
    pub map_source_missing: bool,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub meta: ReportMeta,
    pub summary: Summary,
    pub dropped: &'a [DroppedCandidate],
}

impl<'a> RunReport<'a> {
    pub fn new(
        outcome: &'a ReconOutcome,
        region: &str,
        tag_match_mode: TagMatchMode,
        map_source_missing: bool,
    ) -> Self {
        Self {
            meta: ReportMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                region: region.to_string(),
                tag_match_mode,
                map_source_missing,
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            summary: outcome.summary,
            dropped: &outcome.dropped,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
