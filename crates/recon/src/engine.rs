use rayon::prelude::*;

use crate::config::ReconConfig;
use crate::error::{CoordinateField, DropReason, ReconError};
use crate::identifier::normalize_reference_identifier;
use crate::index::IdentifierIndex;
use crate::model::{
    Candidate, ClassifiedRecord, DroppedCandidate, MapEntry, MatchStatus, RawCandidate, ReconInput,
    ReconOutcome,
};
use crate::region::Region;

/// Run reconciliation per config. The only fallible step is building the
/// region; once classification starts every row ends up somewhere.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconOutcome, ReconError> {
    let region = config.region.build()?;

    let outcome = if config.engine.parallel {
        reconcile_parallel(&input.map_entries, &input.candidates, &region, config.engine.chunk_size)
    } else {
        reconcile(&input.map_entries, &input.candidates, &region)
    };

    let s = &outcome.summary;
    tracing::info!(
        region = region.name(),
        matched = s.matched,
        missing = s.missing,
        skipped_out_of_region = s.skipped_out_of_region,
        invalid = outcome.dropped.len() - s.skipped_out_of_region,
        "reconciliation finished"
    );

    Ok(outcome)
}

/// Classify every candidate against the map entries, in input order.
pub fn reconcile(map_entries: &[MapEntry], candidates: &[RawCandidate], region: &Region) -> ReconOutcome {
    let index = IdentifierIndex::build(map_entries);
    collect(candidates.iter().map(|raw| classify(raw, &index, region)))
}

/// Same result as [`reconcile`], with candidates classified on the rayon
/// pool. The index is shared read-only; results come back in input order.
pub fn reconcile_parallel(
    map_entries: &[MapEntry],
    candidates: &[RawCandidate],
    region: &Region,
    chunk_size: usize,
) -> ReconOutcome {
    let index = IdentifierIndex::build(map_entries);
    let verdicts: Vec<Verdict> = candidates
        .par_iter()
        .with_min_len(chunk_size.max(1))
        .map(|raw| classify(raw, &index, region))
        .collect();
    collect(verdicts)
}

enum Verdict {
    Emit(ClassifiedRecord),
    Drop(DroppedCandidate),
}

fn collect(verdicts: impl IntoIterator<Item = Verdict>) -> ReconOutcome {
    let mut outcome = ReconOutcome::default();

    for verdict in verdicts {
        match verdict {
            Verdict::Emit(record) => {
                match record.status {
                    MatchStatus::Matched => outcome.summary.matched += 1,
                    MatchStatus::Missing => outcome.summary.missing += 1,
                }
                outcome.records.push(record);
            }
            Verdict::Drop(dropped) => {
                if dropped.reason == DropReason::OutOfRegion {
                    outcome.summary.skipped_out_of_region += 1;
                }
                outcome.dropped.push(dropped);
            }
        }
    }

    outcome
}

fn classify(raw: &RawCandidate, index: &IdentifierIndex, region: &Region) -> Verdict {
    let candidate = match validate(raw) {
        Ok(candidate) => candidate,
        Err(reason) => return reject(raw, reason),
    };

    if !region.is_inside(candidate.latitude, candidate.longitude) {
        return reject(raw, DropReason::OutOfRegion);
    }

    let (status, source_ref) = match index.get(&candidate.identifier) {
        Some(source_ref) => (MatchStatus::Matched, Some(source_ref.to_string())),
        None => (MatchStatus::Missing, None),
    };

    Verdict::Emit(ClassifiedRecord {
        identifier: candidate.identifier,
        label: candidate.label,
        latitude: candidate.latitude,
        longitude: candidate.longitude,
        status,
        source_ref,
    })
}

fn reject(raw: &RawCandidate, reason: DropReason) -> Verdict {
    tracing::debug!(row = raw.row, identifier = %raw.identifier, %reason, "candidate dropped");
    Verdict::Drop(DroppedCandidate {
        row: raw.row,
        identifier: raw.identifier.clone(),
        reason,
    })
}

/// Turn an extracted row into a candidate, or say why it can't be one.
pub fn validate(raw: &RawCandidate) -> Result<Candidate, DropReason> {
    let identifier = normalize_reference_identifier(&raw.identifier);
    if identifier.is_empty() {
        return Err(DropReason::EmptyIdentifier);
    }

    let latitude = parse_coordinate(&raw.latitude, CoordinateField::Latitude)?;
    let longitude = parse_coordinate(&raw.longitude, CoordinateField::Longitude)?;

    let label = if raw.label.is_empty() {
        identifier.clone()
    } else {
        raw.label.clone()
    };

    Ok(Candidate {
        identifier,
        label,
        latitude,
        longitude,
    })
}

fn parse_coordinate(value: &str, field: CoordinateField) -> Result<f64, DropReason> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DropReason::UnparseableCoordinate {
            field,
            value: value.to_string(),
        })
}
