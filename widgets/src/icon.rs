//! Image-backed widgets.
//!
//! Images are resolved through a [`ResourceLocator`] and decoded when the
//! widget is built; the GPU texture is created on first display.

use std::path::{Path, PathBuf};

use egui::{Align, ColorImage, Layout, Response, TextureHandle, TextureOptions, Ui};
use guidata_resources::ResourceLocator;

use crate::error::WidgetError;

/// Decode the image file at `path` to RGBA pixels.
pub fn decode_image(path: &Path) -> Result<ColorImage, WidgetError> {
    let bytes = std::fs::read(path).map_err(|e| WidgetError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let img = image::load_from_memory(&bytes).map_err(|e| WidgetError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// A decoded image resource, uploaded as a texture when first shown.
pub struct Icon {
    path: PathBuf,
    image: ColorImage,
    texture: Option<TextureHandle>,
}

impl Icon {
    /// Resolve `name` (falling back to `default`) and decode it.
    pub fn load(
        locator: &ResourceLocator,
        name: &str,
        default: Option<&str>,
    ) -> Result<Self, WidgetError> {
        let path = locator.resolve(name, default)?;
        let image = decode_image(&path)?;
        log::debug!(
            "Loaded icon {name:?} from {} ({}x{})",
            path.display(),
            image.size[0],
            image.size[1]
        );
        Ok(Self {
            path,
            image,
            texture: None,
        })
    }

    /// The resolved image file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixel size as `[width, height]`.
    pub fn size(&self) -> [usize; 2] {
        self.image.size
    }

    /// The texture for this icon, created in `ctx` on first use.
    pub fn texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let (path, image) = (&self.path, &self.image);
        self.texture.get_or_insert_with(|| {
            ctx.load_texture(
                path.to_string_lossy(),
                image.clone(),
                TextureOptions::default(),
            )
        })
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let texture = self.texture(ui.ctx());
        ui.image((texture.id(), texture.size_vec2()))
    }
}

/// A label displaying an image.
pub struct ImageLabel {
    icon: Icon,
}

impl ImageLabel {
    pub fn load(
        locator: &ResourceLocator,
        name: &str,
        default: Option<&str>,
    ) -> Result<Self, WidgetError> {
        Ok(Self {
            icon: Icon::load(locator, name, default)?,
        })
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        self.icon.show(ui)
    }
}

/// Horizontal placement of an [`ImageLayout`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Whether free space goes before and after the content, as
    /// `(leading, trailing)`.
    pub fn stretch(self) -> (bool, bool) {
        match self {
            Alignment::Left => (false, true),
            Alignment::Center => (true, true),
            Alignment::Right => (true, false),
        }
    }
}

/// An image followed by a text label with a tooltip, in one row.
pub struct ImageLayout {
    image: ImageLabel,
    text: String,
    tooltip: String,
    alignment: Alignment,
    /// Width of the content on the previous frame, used to center it.
    content_width: Option<f32>,
}

impl ImageLayout {
    pub fn new(
        locator: &ResourceLocator,
        image_name: &str,
        text: impl Into<String>,
        tooltip: impl Into<String>,
        alignment: Alignment,
    ) -> Result<Self, WidgetError> {
        Ok(Self {
            image: ImageLabel::load(locator, image_name, Some(guidata_resources::DEFAULT_IMAGE))?,
            text: text.into(),
            tooltip: tooltip.into(),
            alignment,
            content_width: None,
        })
    }

    pub fn image(&self) -> &ImageLabel {
        &self.image
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// The text label.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }

    /// Lay the row out in `ui`, returning the text label's response.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let (leading, trailing) = self.alignment.stretch();
        if leading && !trailing {
            // Right to left: the text label is placed first.
            return ui
                .with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let label = self.text_label(ui);
                    self.image.show(ui);
                    label
                })
                .inner;
        }
        ui.horizontal(|ui| {
            if leading {
                let width = self.content_width.unwrap_or(0.0);
                ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
            }
            let start = ui.cursor().min.x;
            self.image.show(ui);
            let label = self.text_label(ui);
            self.content_width = Some(label.rect.max.x - start);
            label
        })
        .inner
    }

    fn text_label(&self, ui: &mut Ui) -> Response {
        let label = ui.label(self.text.as_str());
        if self.tooltip.is_empty() {
            label
        } else {
            label.on_hover_text(self.tooltip.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("guidata_icon_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn locator_with_png(dir: &Path, name: &str, width: u32, height: u32) -> ResourceLocator {
        image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]))
            .save(dir.join(name))
            .unwrap();
        let mut locator = ResourceLocator::new();
        locator.add_path(dir, false).unwrap();
        locator
    }

    fn run_frame(ctx: &egui::Context, mut add: impl FnMut(&mut Ui)) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| add(ui));
        });
    }

    #[test]
    fn icon_decodes_size() {
        let dir = temp_dir("decode");
        let locator = locator_with_png(&dir, "save.png", 3, 2);
        let icon = Icon::load(&locator, "save.png", None).unwrap();
        assert_eq!(icon.size(), [3, 2]);
        assert_eq!(icon.path(), dir.join("save.png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn icon_falls_back_to_default() {
        let dir = temp_dir("fallback");
        let locator = locator_with_png(&dir, guidata_resources::DEFAULT_IMAGE, 1, 1);
        let icon = Icon::load(&locator, "missing.png", Some(guidata_resources::DEFAULT_IMAGE))
            .unwrap();
        assert!(icon.path().ends_with(guidata_resources::DEFAULT_IMAGE));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn undecodable_file_is_image_error() {
        let dir = temp_dir("garbage");
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();
        let mut locator = ResourceLocator::new();
        locator.add_path(&dir, false).unwrap();
        let err = Icon::load(&locator, "broken.png", None).err().unwrap();
        assert!(matches!(err, WidgetError::Image { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_icon_is_resource_error() {
        let err = Icon::load(&ResourceLocator::new(), "x.png", None)
            .err()
            .unwrap();
        assert!(matches!(err, WidgetError::Resource(_)));
    }

    #[test]
    fn texture_is_created_once() {
        let dir = temp_dir("texture");
        let locator = locator_with_png(&dir, "icon.png", 4, 4);
        let mut icon = Icon::load(&locator, "icon.png", None).unwrap();
        let ctx = egui::Context::default();
        let first = icon.texture(&ctx).id();
        let second = icon.texture(&ctx).id();
        assert_eq!(first, second);
        assert_eq!(icon.texture(&ctx).size(), [4, 4]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stretch_rules() {
        assert_eq!(Alignment::Left.stretch(), (false, true));
        assert_eq!(Alignment::Center.stretch(), (true, true));
        assert_eq!(Alignment::Right.stretch(), (true, false));
    }

    #[test]
    fn layout_shows_text_label() {
        let dir = temp_dir("layout");
        let locator = locator_with_png(&dir, "info.png", 8, 8);
        let ctx = egui::Context::default();

        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            let mut layout =
                ImageLayout::new(&locator, "info.png", "Ready", "All good", alignment).unwrap();
            layout.set_text("Done");
            assert_eq!(layout.text(), "Done");
            assert_eq!(layout.tooltip(), "All good");

            let mut label_width = 0.0;
            run_frame(&ctx, |ui| {
                label_width = layout.show(ui).rect.width();
            });
            assert!(label_width > 0.0, "{alignment:?}");
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
