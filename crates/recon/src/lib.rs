//! `mapgap-recon`: reconciles a reference dataset against map data.
//!
//! Pure engine crate: receives pre-loaded map entries and candidate rows,
//! returns classified records. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod index;
pub mod model;
pub mod region;

pub use config::{ReconConfig, TagMatchMode};
pub use engine::{reconcile, reconcile_parallel, run};
pub use error::{DropReason, ReconError};
pub use identifier::TagKeyFilter;
pub use model::{
    Candidate, ClassifiedRecord, DroppedCandidate, MapElement, MapEntry, MatchStatus, RawCandidate,
    ReconInput, ReconOutcome, Summary,
};
pub use region::{BoundingBox, Region, RegionTest};
