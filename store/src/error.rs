use std::fmt;
use std::path::PathBuf;

use crate::store::Mode;

/// Errors that can occur while reading or writing a container file.
#[derive(Debug)]
pub enum StoreError {
    /// The container could not be opened in the requested mode.
    Open {
        path: PathBuf,
        mode: Mode,
        source: Box<StoreError>,
    },
    /// An IO error occurred while accessing the file.
    Io(std::io::Error),
    /// The file is not a container, or its payload could not be encoded/decoded.
    Format(String),
    /// A required attribute, dataset or group does not exist.
    NotFound(String),
    /// A stored value has a different type than the one requested.
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A value was written or read with an empty option path.
    EmptyPath,
    /// The option path still had open groups when the store was closed.
    UnbalancedPath(String),
    /// A store opened in [`Mode::Read`] was handed to a writer.
    ReadOnly(PathBuf),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, mode, source } => {
                write!(
                    f,
                    "failed to open {} in {mode} mode: {source}",
                    path.display()
                )
            }
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::NotFound(name) => write!(f, "not found: {name}"),
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "type mismatch for '{name}': expected {expected}, found {found}"
                )
            }
            Self::EmptyPath => write!(f, "no current attribute name (empty option path)"),
            Self::UnbalancedPath(path) => {
                write!(f, "groups still open when closing the store: {path}")
            }
            Self::ReadOnly(path) => write!(f, "{} is opened read-only", path.display()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source.as_ref()),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}
