//! Paths of data shipped alongside a module.

use std::path::{Path, PathBuf};

/// Name of the translation directory under a module data root.
pub const LOCALE_DIR: &str = "locale";

/// Absolute path of `relpath` under the module data root `root`, or of
/// `root` itself without `relpath`.
///
/// The path is made absolute against the current directory; it is not
/// required to exist.
pub fn module_data_path(root: impl AsRef<Path>, relpath: Option<&str>) -> PathBuf {
    let root = root.as_ref();
    let joined = match relpath {
        Some(rel) => root.join(rel),
        None => root.to_path_buf(),
    };
    std::path::absolute(&joined).unwrap_or(joined)
}

/// The gettext catalog directory of a module: `<root>/locale`.
pub fn module_locale_path(root: impl AsRef<Path>) -> PathBuf {
    module_data_path(root, Some(LOCALE_DIR))
}
