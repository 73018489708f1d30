//! egui widget, font and color builders backed by bundled resources.
//!
//! Widgets take an owned [`ResourceLocator`](guidata_resources::ResourceLocator)
//! to find their images; fonts are read from a [`ConfigStore`] and matched
//! against a [`FontCatalog`]; colors are parsed from text.

mod color;
mod config;
mod error;
mod font;
mod icon;

pub use color::{named_color, text_to_color};
pub use config::{ConfigStore, UserConfig};
pub use error::WidgetError;
pub use font::{
    font_is_installed, get_family, get_font, FontCatalog, FontSpec, DEFAULT_FONT_SIZE, MONOSPACE,
    OS_NAME,
};
pub use icon::{decode_image, Alignment, Icon, ImageLabel, ImageLayout};
