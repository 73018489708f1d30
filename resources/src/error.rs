use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while locating or loading resources.
#[derive(Debug)]
pub enum ResourceError {
    /// No search directory holds a file with this name.
    NotFound(String),
    /// An IO error occurred while accessing a resource path.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A translation catalog is malformed.
    Catalog(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound(name) => write!(f, "image file {name:?} not found"),
            ResourceError::Io { path, source } => {
                write!(f, "IO error on {}: {source}", path.display())
            }
            ResourceError::Catalog(reason) => write!(f, "invalid translation catalog: {reason}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ResourceError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ResourceError::Io { path, source }
    }
}
