use std::fmt;
use std::path::PathBuf;

use guidata_resources::ResourceError;

/// Errors that can occur while building widgets from resources.
#[derive(Debug)]
pub enum WidgetError {
    /// The image file could not be located.
    Resource(ResourceError),
    /// The image file exists but could not be decoded.
    Image { path: PathBuf, message: String },
    /// A configuration file could not be read, parsed or written.
    Config { path: PathBuf, message: String },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Resource(err) => write!(f, "{err}"),
            WidgetError::Image { path, message } => {
                write!(f, "failed to decode image {}: {message}", path.display())
            }
            WidgetError::Config { path, message } => {
                write!(f, "configuration {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for WidgetError {
    fn from(err: ResourceError) -> Self {
        WidgetError::Resource(err)
    }
}
