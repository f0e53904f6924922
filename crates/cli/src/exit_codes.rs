//! CLI Exit Code Registry
//!
//! Single source of truth for `mapgap` exit codes. Scripts (cron jobs that
//! refresh the map layer) branch on these, so treat them as a contract.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | `inside`: point is outside the region            |
//! | 2    | Usage error (bad arguments, clap failures)       |
//! | 3    | Config file unreadable or invalid                |
//! | 4    | Region polygon malformed                         |
//! | 5    | Map source unreadable or undecodable             |
//! | 6    | Reference source unreadable or missing a column  |
//! | 7    | Output could not be written                      |
//!
//! A missing map source file is not an error: the run continues and every
//! candidate is reported missing.

use mapgap_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// `inside` only: the point is outside the region.
pub const EXIT_OUTSIDE: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file cannot be read, parsed, or fails validation.
pub const EXIT_CONFIG: u8 = 3;

/// Region has fewer than 3 vertices or a non-finite vertex.
pub const EXIT_REGION: u8 = 4;

/// Map source exists but cannot be read or decoded.
pub const EXIT_MAP_SOURCE: u8 = 5;

/// Reference source missing, unreadable, malformed, or lacking a column.
pub const EXIT_REFERENCE_SOURCE: u8 = 6;

/// GeoJSON output or report could not be written.
pub const EXIT_WRITE: u8 = 7;

/// Exit code for a fatal core error.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::MalformedRegionConfig { .. } => EXIT_REGION,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
    }
}
