//! Best-effort deletion of every on-disk artifact of a closed database.
//!
//! A database is considered gone once its primary file is gone. Sidecar
//! artifacts (the management directory and its entries, the notification file)
//! are removed too, but failing to remove them only produces warnings.

use crate::config::ReclaimConfig;
use crate::footprint::DatabaseFootprint;
use crate::fs::{Filesystem, LocalFilesystem};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives one message per artifact that could not be removed
pub trait WarningSink {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Which part of a footprint an artifact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    ManagementEntry,
    ManagementDirectory,
    Primary,
    Notification,
}

impl ArtifactKind {
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::ManagementEntry => "Temporary file",
            ArtifactKind::ManagementDirectory => "Temporary folder",
            ArtifactKind::Primary => "Database file",
            ArtifactKind::Notification => "Notification file",
        }
    }
}

/// An artifact that survived reclamation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclaimWarning {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub reason: String,
}

impl fmt::Display for ReclaimWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} cannot be deleted: {}",
            self.kind.label(),
            self.path.display(),
            self.reason
        )
    }
}

/// Outcome of one `reclaim` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclaimResult {
    /// False only when the primary file existed and could not be deleted
    pub primary_deleted: bool,
    pub warnings: Vec<ReclaimWarning>,
    /// Artifacts actually deleted, in deletion order
    pub removed: Vec<PathBuf>,
    /// Total size of the regular files deleted
    pub bytes_freed: u64,
}

impl ReclaimResult {
    /// Everything was removed and nothing was left behind
    pub fn is_clean(&self) -> bool {
        self.primary_deleted && self.warnings.is_empty()
    }
}

/// Deletes database footprints through a `Filesystem`, reporting non-fatal
/// failures to a `WarningSink`.
///
/// Holds no state between calls. The caller must make sure the database is
/// closed in every process and hold whatever cross-process lock guards it for
/// the duration of the call; nothing here locks.
#[derive(Debug, Clone)]
pub struct DatabaseFileReclaimer<F = LocalFilesystem, S = TracingSink> {
    fs: F,
    sink: S,
    config: ReclaimConfig,
}

impl DatabaseFileReclaimer {
    pub fn new(config: ReclaimConfig) -> Self {
        Self::with_collaborators(LocalFilesystem, TracingSink, config)
    }
}

impl<F: Filesystem, S: WarningSink> DatabaseFileReclaimer<F, S> {
    pub fn with_collaborators(fs: F, sink: S, config: ReclaimConfig) -> Self {
        Self { fs, sink, config }
    }

    pub fn config(&self) -> &ReclaimConfig {
        &self.config
    }

    /// Artifacts of `footprint` currently on disk, in the order `reclaim`
    /// processes them. Deletes nothing.
    pub fn plan(&self, footprint: &DatabaseFootprint) -> Vec<(ArtifactKind, PathBuf)> {
        let mut planned = Vec::new();

        let management = footprint.management_directory(&self.config);
        if self.fs.exists(&management) {
            if let Ok(children) = self.fs.list_dir(&management) {
                planned.extend(
                    children
                        .into_iter()
                        .map(|child| (ArtifactKind::ManagementEntry, child)),
                );
            }
            planned.push((ArtifactKind::ManagementDirectory, management));
        }

        let primary = footprint.primary_path();
        if self.fs.exists(primary) {
            planned.push((ArtifactKind::Primary, primary.to_path_buf()));
        }

        let note = footprint.notification_file(&self.config);
        if self.fs.exists(&note) {
            planned.push((ArtifactKind::Notification, note));
        }

        planned
    }

    /// Delete every artifact of `footprint`.
    ///
    /// Order: management directory entries, the management directory, the
    /// primary file, the notification file. Each step runs regardless of the
    /// others. The management directory is assumed flat; a nested directory is
    /// not descended into and is reported as a warning.
    pub fn reclaim(&self, footprint: &DatabaseFootprint) -> ReclaimResult {
        let mut result = ReclaimResult::default();

        let management = footprint.management_directory(&self.config);
        if self.fs.exists(&management) {
            match self.fs.list_dir(&management) {
                Ok(children) => {
                    for child in children {
                        self.remove(ArtifactKind::ManagementEntry, &child, &mut result);
                    }
                }
                Err(err) => self.record_failure(
                    ArtifactKind::ManagementDirectory,
                    &management,
                    &err,
                    &mut result,
                ),
            }
        }

        if self.fs.exists(&management) {
            self.remove(ArtifactKind::ManagementDirectory, &management, &mut result);
        }

        let primary = footprint.primary_path();
        result.primary_deleted = if self.fs.exists(primary) {
            self.remove(ArtifactKind::Primary, primary, &mut result)
        } else {
            true
        };

        let note = footprint.notification_file(&self.config);
        if self.fs.exists(&note) {
            self.remove(ArtifactKind::Notification, &note, &mut result);
        }

        result
    }

    fn remove(&self, kind: ArtifactKind, path: &Path, result: &mut ReclaimResult) -> bool {
        let size = self.fs.file_size(path);
        let removal = match kind {
            ArtifactKind::ManagementDirectory => self.fs.remove_empty_dir(path),
            _ => self.fs.remove_file(path),
        };

        match removal {
            Ok(()) => {
                debug!(path = %path.display(), kind = kind.label(), "removed");
                result.removed.push(path.to_path_buf());
                result.bytes_freed += size.unwrap_or(0);
                true
            }
            Err(err) => {
                self.record_failure(kind, path, &err, result);
                false
            }
        }
    }

    fn record_failure(
        &self,
        kind: ArtifactKind,
        path: &Path,
        err: &io::Error,
        result: &mut ReclaimResult,
    ) {
        let warning = ReclaimWarning {
            path: path.to_path_buf(),
            kind,
            reason: err.to_string(),
        };
        self.sink.warn(&warning.to_string());
        result.warnings.push(warning);
    }
}
