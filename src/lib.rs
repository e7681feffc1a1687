//! dbreclaim - Embedded Database Footprint Reclaimer
//!
//! A closed embedded database leaves more than its data file on disk: a
//! management directory of lock and coordination files next to it, and a
//! notification file used to signal changes across processes. dbreclaim
//! deletes all of them, treating the data file as the only artifact whose
//! survival is an error.
//!
//! ## Layout
//!
//! - `footprint` - the validated set of paths belonging to one database
//! - `reclaim` - the deletion protocol and its result type
//! - `fs` - filesystem primitives, swappable for tests
//! - `config` - sidecar naming rules (embedded `reclaim.toml` plus overrides)
//! - `guards`, `capability`, `report` - small shared helpers

pub mod capability;
pub mod config;
pub mod footprint;
pub mod fs;
pub mod guards;
pub mod reclaim;
pub mod report;

// Re-export commonly used items
pub use capability::{color_output_available, CapabilityProbe};
pub use config::{load_config, ConfigError, ReclaimConfig};
pub use footprint::{DatabaseFootprint, FootprintError};
pub use fs::{Filesystem, LocalFilesystem};
pub use guards::{check_empty, check_present, to_set, GuardError};
pub use reclaim::{
    ArtifactKind, DatabaseFileReclaimer, ReclaimResult, ReclaimWarning, TracingSink, WarningSink,
};
pub use report::error_report;
