//! Resource lookup for data-centric GUI applications.
//!
//! - [`ResourceLocator`]: an owned, ordered list of image directories with
//!   default-image fallback.
//! - [`module_data_path`] / [`module_locale_path`]: where a module's bundled
//!   data and translations live.
//! - [`Translator`]: GNU gettext `.mo` catalogs selected from the
//!   environment, falling back to identity translation.
//! - [`add_extension`]: file-name completion for single-format file items.

mod data_path;
mod error;
mod filename;
mod locator;
pub mod translation;

pub use data_path::{module_data_path, module_locale_path, LOCALE_DIR};
pub use error::ResourceError;
pub use filename::add_extension;
pub use locator::{ResourceLocator, DEFAULT_IMAGE};
pub use translation::Translator;
