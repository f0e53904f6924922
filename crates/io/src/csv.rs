// Reference source: SPARQL query results as CSV

use std::io::Read;
use std::path::Path;

use mapgap_recon::config::ColumnAliases;
use mapgap_recon::identifier::normalize_reference_identifier;
use mapgap_recon::RawCandidate;

use crate::error::IoError;

/// Read file and convert to UTF-8 if needed (Windows-1252 exports from
/// spreadsheet tools are common).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |source| IoError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            tracing::debug!(path = %path.display(), "reference file is not UTF-8, decoded as Windows-1252");
            Ok(decoded.into_owned())
        }
    }
}

/// Header positions for the logical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    identifier: usize,
    latitude: usize,
    longitude: usize,
    label: Option<usize>,
}

fn find_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

fn resolve_columns(headers: &[String], columns: &ColumnAliases) -> Result<ColumnIndex, IoError> {
    let required = |name: &str, aliases: &[String]| {
        find_column(headers, aliases).ok_or_else(|| IoError::MissingColumn {
            column: name.into(),
            tried: aliases.to_vec(),
        })
    };

    Ok(ColumnIndex {
        identifier: required("identifier", &columns.identifier)?,
        latitude: required("latitude", &columns.latitude)?,
        longitude: required("longitude", &columns.longitude)?,
        label: find_column(headers, &columns.label),
    })
}

/// Extract candidate rows from CSV text.
///
/// Short rows are kept with empty cells; the engine decides what to do with
/// them. Identifiers are normalized here so the engine sees canonical ids.
pub fn parse_candidates(
    content: &str,
    delimiter: u8,
    columns: &ColumnAliases,
) -> Result<Vec<RawCandidate>, IoError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IoError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = resolve_columns(&headers, columns)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IoError::Csv(e.to_string()))?;
        let cell = |at: usize| record.get(at).unwrap_or("");

        rows.push(RawCandidate {
            row: i + 1,
            identifier: normalize_reference_identifier(cell(idx.identifier)),
            label: idx.label.map(|at| cell(at).trim().to_string()).unwrap_or_default(),
            latitude: cell(idx.latitude).to_string(),
            longitude: cell(idx.longitude).to_string(),
        });
    }

    Ok(rows)
}

/// Read and extract the reference source. A missing file is fatal.
pub fn load_candidates(
    path: &Path,
    delimiter: u8,
    columns: &ColumnAliases,
) -> Result<Vec<RawCandidate>, IoError> {
    let content = read_file_as_utf8(path)?;
    let rows = parse_candidates(&content, delimiter, columns)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "reference source loaded");
    Ok(rows)
}
