use std::path::{Path, PathBuf};

use crate::data_path::module_data_path;
use crate::error::ResourceError;

/// Conventional fallback image name.
pub const DEFAULT_IMAGE: &str = "not_found.png";

/// Ordered list of directories searched for image resources.
///
/// Directories are searched in insertion order; the first one holding a
/// regular file with the requested name wins.
///
/// # Example
///
/// ```no_run
/// use guidata_resources::{ResourceLocator, DEFAULT_IMAGE};
///
/// let mut images = ResourceLocator::new();
/// images.add_path("assets/images", true).unwrap();
/// let path = images.resolve("save.png", Some(DEFAULT_IMAGE)).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    paths: Vec<PathBuf>,
}

impl ResourceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path`, and with `include_subfolders` each of its immediate
    /// subdirectories (sorted by name).
    pub fn add_path(
        &mut self,
        path: impl Into<PathBuf>,
        include_subfolders: bool,
    ) -> Result<(), ResourceError> {
        let path = path.into();
        let subfolders = if include_subfolders {
            subdirectories(&path)?
        } else {
            Vec::new()
        };
        log::debug!(
            "Adding image path {} ({} subfolders)",
            path.display(),
            subfolders.len()
        );
        self.paths.push(path);
        self.paths.extend(subfolders);
        Ok(())
    }

    /// Append the data directory `relpath` of the module rooted at
    /// `data_root`.
    pub fn add_module_path(
        &mut self,
        data_root: impl AsRef<Path>,
        relpath: &str,
        include_subfolders: bool,
    ) -> Result<(), ResourceError> {
        self.add_path(module_data_path(data_root, Some(relpath)), include_subfolders)
    }

    /// Search directories in order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Absolute path of the first file named `name`.
    ///
    /// If nothing matches and `default_name` is given, that name is tried
    /// once instead. The error always carries the requested `name`.
    pub fn resolve(&self, name: &str, default_name: Option<&str>) -> Result<PathBuf, ResourceError> {
        if let Some(path) = self.find(name) {
            return Ok(path);
        }
        if let Some(default_name) = default_name {
            if let Some(path) = self.find(default_name) {
                log::debug!("Image {name:?} not found, using {default_name:?}");
                return Ok(path);
            }
        }
        Err(ResourceError::NotFound(name.to_owned()))
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        self.paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .map(|found| std::path::absolute(&found).unwrap_or(found))
    }
}

fn subdirectories(path: &Path) -> Result<Vec<PathBuf>, ResourceError> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(path).map_err(ResourceError::io(path))? {
        let entry = entry.map_err(ResourceError::io(path))?;
        let candidate = entry.path();
        if candidate.is_dir() {
            dirs.push(candidate);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("guidata_locator_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"img").unwrap();
    }

    #[test]
    fn first_directory_wins() {
        let dir = temp_dir("order");
        touch(&dir.join("a/icon.png"));
        touch(&dir.join("b/icon.png"));

        let mut locator = ResourceLocator::new();
        locator.add_path(dir.join("a"), false).unwrap();
        locator.add_path(dir.join("b"), false).unwrap();
        let found = locator.resolve("icon.png", None).unwrap();
        assert_eq!(found, dir.join("a/icon.png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn later_directory_used_when_earlier_lacks_file() {
        let dir = temp_dir("fallthrough");
        std::fs::create_dir_all(dir.join("a")).unwrap();
        touch(&dir.join("b/icon.png"));

        let mut locator = ResourceLocator::new();
        locator.add_path(dir.join("a"), false).unwrap();
        locator.add_path(dir.join("b"), false).unwrap();
        let found = locator.resolve("icon.png", None).unwrap();
        assert_eq!(found, dir.join("b/icon.png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn subfolders_follow_parent_sorted() {
        let dir = temp_dir("subfolders");
        std::fs::create_dir_all(dir.join("zeta")).unwrap();
        std::fs::create_dir_all(dir.join("alpha/nested")).unwrap();
        touch(&dir.join("file.png"));

        let mut locator = ResourceLocator::new();
        locator.add_path(&dir, true).unwrap();
        assert_eq!(
            locator.paths(),
            &[dir.clone(), dir.join("alpha"), dir.join("zeta")]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directories_are_not_matches() {
        let dir = temp_dir("not_file");
        std::fs::create_dir_all(dir.join("icon.png")).unwrap();

        let mut locator = ResourceLocator::new();
        locator.add_path(&dir, false).unwrap();
        assert!(locator.resolve("icon.png", None).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_is_tried_once() {
        let dir = temp_dir("default");
        touch(&dir.join(DEFAULT_IMAGE));

        let mut locator = ResourceLocator::new();
        locator.add_path(&dir, false).unwrap();
        let found = locator.resolve("missing.png", Some(DEFAULT_IMAGE)).unwrap();
        assert_eq!(found, dir.join(DEFAULT_IMAGE));

        let err = locator.resolve("missing.png", Some("also_missing.png")).unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(ref n) if n == "missing.png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_locator_reports_name() {
        let err = ResourceLocator::new()
            .resolve("x.png", Some(DEFAULT_IMAGE))
            .unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(ref n) if n == "x.png"));
    }

    #[test]
    fn missing_directory_with_subfolders_is_io_error() {
        let dir = temp_dir("missing_dir");
        let mut locator = ResourceLocator::new();
        let err = locator.add_path(dir.join("nope"), true).unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
        assert!(locator.paths().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
