//! The set of paths belonging to one database instance.

use crate::config::ReclaimConfig;
use crate::guards::{check_empty, check_present, GuardError};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Reasons a footprint is rejected before any filesystem access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FootprintError {
    #[error(transparent)]
    Argument(#[from] GuardError),

    #[error("Primary path must be absolute: {}", .0.display())]
    RelativePrimary(PathBuf),

    #[error("Primary path must be canonical (no '.' or '..' components): {}", .0.display())]
    NonCanonicalPrimary(PathBuf),

    #[error("Logical name must be a single path component: {0:?}")]
    NameNotAComponent(String),

    #[error("Primary file name is not valid UTF-8: {}", .0.display())]
    NonUtf8Name(PathBuf),
}

/// Paths of one logical database: its primary file, the directory holding its
/// sidecars, and the base name the sidecar names derive from.
///
/// Only the validating constructors build a footprint, so a value of this type
/// always has an absolute canonical primary path and a non-empty single-component
/// logical name. Canonical is checked lexically: no `.` or `..` steps, no
/// doubled or trailing separators. Symlinks are not resolved here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFootprint {
    primary_path: PathBuf,
    root_directory: PathBuf,
    logical_name: String,
}

impl DatabaseFootprint {
    pub fn new(
        primary_path: impl Into<PathBuf>,
        root_directory: impl Into<PathBuf>,
        logical_name: impl Into<String>,
    ) -> Result<Self, FootprintError> {
        let primary_path = primary_path.into();
        let root_directory = root_directory.into();
        let logical_name = logical_name.into();

        check_empty(&primary_path.to_string_lossy(), "primary_path")?;
        check_empty(&logical_name, "logical_name")?;

        if !primary_path.is_absolute() {
            return Err(FootprintError::RelativePrimary(primary_path));
        }
        if !is_canonical(&primary_path) {
            return Err(FootprintError::NonCanonicalPrimary(primary_path));
        }
        if !is_single_component(&logical_name) {
            return Err(FootprintError::NameNotAComponent(logical_name));
        }

        check_empty(&root_directory.to_string_lossy(), "root_directory")?;

        Ok(Self {
            primary_path,
            root_directory,
            logical_name,
        })
    }

    /// Derive the root directory and logical name from the primary file itself,
    /// which is where an unconfigured database keeps its sidecars
    pub fn from_primary_path(primary_path: impl Into<PathBuf>) -> Result<Self, FootprintError> {
        let primary_path = primary_path.into();

        let root_directory = check_present(primary_path.parent(), "root_directory")?.to_path_buf();
        let file_name = check_present(primary_path.file_name(), "logical_name")?;
        let logical_name = file_name
            .to_str()
            .ok_or_else(|| FootprintError::NonUtf8Name(primary_path.clone()))?
            .to_string();

        Self::new(primary_path, root_directory, logical_name)
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary_path
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// `<root_directory>/<logical_name><management_suffix>`
    pub fn management_directory(&self, config: &ReclaimConfig) -> PathBuf {
        self.root_directory
            .join(format!("{}{}", self.logical_name, config.management_suffix))
    }

    /// `<primary_path><note_suffix>`
    pub fn notification_file(&self, config: &ReclaimConfig) -> PathBuf {
        let mut path = OsString::from(self.primary_path.as_os_str());
        path.push(&config.note_suffix);
        PathBuf::from(path)
    }
}

// `components()` silently drops interior "." and repeated or trailing
// separators, so the path must also be spelled exactly as its components.
fn is_canonical(path: &Path) -> bool {
    let has_relative_step = path
        .components()
        .any(|c| matches!(c, Component::CurDir | Component::ParentDir));
    let respelled: PathBuf = path.components().collect();

    !has_relative_step && respelled.as_os_str() == path.as_os_str()
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_footprint() {
        let footprint = DatabaseFootprint::new("/data/app.realm", "/data", "app.realm").unwrap();
        assert_eq!(footprint.primary_path(), Path::new("/data/app.realm"));
        assert_eq!(footprint.root_directory(), Path::new("/data"));
        assert_eq!(footprint.logical_name(), "app.realm");
    }

    #[test]
    fn test_derived_sidecar_paths() {
        let footprint = DatabaseFootprint::new("/data/app.realm", "/data", "app.realm").unwrap();
        let config = ReclaimConfig::embedded().unwrap();

        assert_eq!(
            footprint.management_directory(&config),
            PathBuf::from("/data/app.realm.management")
        );
        assert_eq!(
            footprint.notification_file(&config),
            PathBuf::from("/data/app.realm.note")
        );
    }

    #[test]
    fn test_sidecars_follow_root_not_primary() {
        // The management directory lives under the root directory, the note file
        // next to the primary file
        let footprint = DatabaseFootprint::new("/data/files/app.db", "/cache", "app.db").unwrap();
        let config = ReclaimConfig::embedded().unwrap();

        assert_eq!(
            footprint.management_directory(&config),
            PathBuf::from("/cache/app.db.management")
        );
        assert_eq!(
            footprint.notification_file(&config),
            PathBuf::from("/data/files/app.db.note")
        );
    }

    #[test]
    fn test_custom_suffixes() {
        let footprint = DatabaseFootprint::new("/data/app.db", "/data", "app.db").unwrap();
        let config = ReclaimConfig {
            management_suffix: ".mgmt".to_string(),
            note_suffix: ".fifo".to_string(),
        };

        assert_eq!(
            footprint.management_directory(&config),
            PathBuf::from("/data/app.db.mgmt")
        );
        assert_eq!(
            footprint.notification_file(&config),
            PathBuf::from("/data/app.db.fifo")
        );
    }

    #[test]
    fn test_empty_logical_name_rejected() {
        let err = DatabaseFootprint::new("/data/app.realm", "/data", "").unwrap_err();
        assert_eq!(
            err,
            FootprintError::Argument(GuardError::Empty {
                name: "logical_name"
            })
        );
    }

    #[test]
    fn test_empty_root_rejected() {
        let err = DatabaseFootprint::new("/data/app.realm", "", "app.realm").unwrap_err();
        assert_eq!(err.to_string(), "Non-empty 'root_directory' required.");
    }

    #[test]
    fn test_relative_primary_rejected() {
        let err = DatabaseFootprint::new("data/app.realm", "data", "app.realm").unwrap_err();
        assert!(matches!(err, FootprintError::RelativePrimary(_)));
    }

    #[test]
    fn test_parent_dir_component_rejected() {
        let err = DatabaseFootprint::new("/data/../etc/app.realm", "/data", "app.realm").unwrap_err();
        assert!(matches!(err, FootprintError::NonCanonicalPrimary(_)));
    }

    #[test]
    fn test_lexically_unnormalized_primary_rejected() {
        for primary in [
            "/data/./app.realm",
            "/data//app.realm",
            "//data/app.realm",
            "/data/app.realm/",
            "/data/app.realm/.",
        ] {
            let err = DatabaseFootprint::new(primary, "/data", "app.realm").unwrap_err();
            assert!(
                matches!(err, FootprintError::NonCanonicalPrimary(_)),
                "{primary:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_name_with_separator_rejected() {
        for name in ["../app.realm", "sub/app.realm", "..", "."] {
            let err = DatabaseFootprint::new("/data/app.realm", "/data", name).unwrap_err();
            assert!(
                matches!(err, FootprintError::NameNotAComponent(_)),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_primary_path() {
        let footprint = DatabaseFootprint::from_primary_path("/data/app.realm").unwrap();
        assert_eq!(footprint.root_directory(), Path::new("/data"));
        assert_eq!(footprint.logical_name(), "app.realm");
    }

    #[test]
    fn test_from_primary_path_root_rejected() {
        let err = DatabaseFootprint::from_primary_path("/").unwrap_err();
        assert_eq!(err.to_string(), "Nonnull 'root_directory' required.");
    }

    #[test]
    fn test_from_primary_path_relative_rejected() {
        let err = DatabaseFootprint::from_primary_path("app.realm").unwrap_err();
        assert!(matches!(err, FootprintError::RelativePrimary(_)));
    }
}
