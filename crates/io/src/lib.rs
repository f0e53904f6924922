// Ingestion and output for mapgap runs

pub mod csv;
pub mod error;
pub mod geojson;
pub mod osm;
pub mod report;

pub use error::IoError;

use std::path::{Path, PathBuf};

/// Write files via sibling temp files and renames, so readers never observe
/// a half-written file.
///
/// Every payload is staged in a sibling temp file before any target is
/// replaced; if staging fails, all temp files are removed and every target
/// keeps its previous content.
pub fn write_atomic_all(files: &[(&Path, &[u8])]) -> Result<(), IoError> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());

    for &(path, bytes) in files {
        let tmp = temp_path(path);
        if let Err(source) = std::fs::write(&tmp, bytes) {
            let _ = std::fs::remove_file(&tmp);
            discard(&staged);
            return Err(IoError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        staged.push((tmp, path));
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = std::fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(IoError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        tracing::debug!(path = %path.display(), "wrote file");
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = std::fs::remove_file(tmp);
    }
}
