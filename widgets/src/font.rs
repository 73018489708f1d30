//! Fonts from configuration entries.

use egui::{FontDefinitions, FontFamily, FontId, RichText};

use crate::config::ConfigStore;

/// Conventional monospace family preferences, most preferred first.
pub const MONOSPACE: &[&str] = &[
    "Courier New",
    "Bitstream Vera Sans Mono",
    "Andale Mono",
    "Liberation Mono",
    "Monaco",
    "Courier",
    "monospace",
    "Fixed",
    "Terminal",
];

/// Operating system family name used in per-platform configuration keys.
pub const OS_NAME: &str = if cfg!(windows) { "nt" } else { "posix" };

/// Point size used when the configuration does not set one.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Source of installed font families.
pub trait FontCatalog {
    fn is_installed(&self, family: &str) -> bool;
}

/// Families registered by name, plus the built-in `monospace` and
/// `proportional` families.
impl FontCatalog for FontDefinitions {
    fn is_installed(&self, family: &str) -> bool {
        let key = match builtin_family(family) {
            Some(builtin) => builtin,
            None => FontFamily::Name(family.into()),
        };
        self.families.get(&key).is_some_and(|fonts| !fonts.is_empty())
    }
}

fn builtin_family(family: &str) -> Option<FontFamily> {
    match family {
        "monospace" => Some(FontFamily::Monospace),
        "proportional" | "sans-serif" => Some(FontFamily::Proportional),
        _ => None,
    }
}

pub fn font_is_installed(catalog: &impl FontCatalog, family: &str) -> bool {
    catalog.is_installed(family)
}

/// The first installed family of `families`, or `""` when none is.
pub fn get_family<S: AsRef<str>>(catalog: &impl FontCatalog, families: &[S]) -> String {
    match families
        .iter()
        .map(AsRef::as_ref)
        .find(|family| catalog.is_installed(family))
    {
        Some(family) => family.to_owned(),
        None => {
            let requested: Vec<&str> = families.iter().map(AsRef::as_ref).collect();
            log::warn!("None of the following fonts is installed: {requested:?}");
            String::new()
        }
    }
}

/// A resolved font choice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSpec {
    /// Empty for the toolkit default family.
    pub family: String,
    pub size: Option<f32>,
    pub bold: bool,
}

impl FontSpec {
    pub fn family(&self) -> FontFamily {
        if self.family.is_empty() {
            return FontFamily::Proportional;
        }
        builtin_family(&self.family).unwrap_or_else(|| FontFamily::Name(self.family.as_str().into()))
    }

    pub fn font_id(&self) -> FontId {
        FontId::new(self.size.unwrap_or(DEFAULT_FONT_SIZE), self.family())
    }

    /// `text` styled with this font.
    pub fn rich_text(&self, text: impl Into<String>) -> RichText {
        let text = RichText::new(text).font(self.font_id());
        if self.bold {
            text.strong()
        } else {
            text
        }
    }
}

/// Build a font from the entries of `section` under `option`.
///
/// `option` defaults to `font`; a name not containing `font` gets `/font`
/// appended. Reads `<option>/family/<os>` (falling back to
/// `<option>/family`) as a family name or list, then `<option>/size` and
/// `<option>/bold`.
pub fn get_font(
    conf: &impl ConfigStore,
    catalog: &impl FontCatalog,
    section: &str,
    option: Option<&str>,
) -> FontSpec {
    let mut option = option.filter(|o| !o.is_empty()).unwrap_or("font").to_owned();
    if !option.contains("font") {
        option.push_str("/font");
    }

    let os_key = format!("{option}/family/{OS_NAME}");
    let family_key = if conf.has_option(section, &os_key) {
        Some(os_key)
    } else {
        Some(format!("{option}/family")).filter(|key| conf.has_option(section, key))
    };
    let family = match family_key {
        Some(key) => {
            let families = family_list(conf.get_value(section, &key));
            get_family(catalog, &families)
        }
        None => String::new(),
    };

    let size = conf
        .has_option(section, &format!("{option}/size"))
        .then(|| conf.get(section, &format!("{option}/size"), DEFAULT_FONT_SIZE as f64) as f32);
    let bold = conf.get(section, &format!("{option}/bold"), false);

    FontSpec { family, size, bold }
}

/// A family entry may be a single name or a list of names.
fn family_list(value: Option<toml::Value>) -> Vec<String> {
    match value {
        Some(toml::Value::String(family)) => vec![family],
        Some(toml::Value::Array(families)) => families
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;

    fn catalog_with(names: &[&str]) -> FontDefinitions {
        let mut fonts = FontDefinitions::default();
        for name in names {
            fonts
                .families
                .insert(FontFamily::Name((*name).into()), vec!["Hack".to_owned()]);
        }
        fonts
    }

    #[test]
    fn builtin_families_are_installed() {
        let fonts = FontDefinitions::default();
        assert!(font_is_installed(&fonts, "monospace"));
        assert!(font_is_installed(&fonts, "proportional"));
        assert!(!font_is_installed(&fonts, "Courier New"));
    }

    #[test]
    fn first_installed_family_wins() {
        let fonts = catalog_with(&["Monaco"]);
        assert_eq!(get_family(&fonts, MONOSPACE), "Monaco");
        assert_eq!(get_family(&fonts, &["Nope", "monospace"]), "monospace");
        assert_eq!(get_family(&fonts, &["Nope"]), "");
    }

    #[test]
    fn font_from_config() {
        let conf = UserConfig::parse(
            r#"
            [console]
            "font/family" = ["Missing Sans", "Monaco"]
            "font/size" = 11
            "font/bold" = true
            "#,
        )
        .unwrap();
        let font = get_font(&conf, &catalog_with(&["Monaco"]), "console", None);
        assert_eq!(
            font,
            FontSpec {
                family: "Monaco".into(),
                size: Some(11.0),
                bold: true,
            }
        );
        assert_eq!(font.font_id().size, 11.0);
        assert_eq!(font.family(), FontFamily::Name("Monaco".into()));
    }

    #[test]
    fn option_gets_font_suffix() {
        let conf = UserConfig::parse(
            r#"
            [plot]
            "title/font/family" = "monospace"
            "title/font/size" = 9.5
            "#,
        )
        .unwrap();
        let font = get_font(&conf, &FontDefinitions::default(), "plot", Some("title"));
        assert_eq!(font.family, "monospace");
        assert_eq!(font.family(), FontFamily::Monospace);
        assert_eq!(font.size, Some(9.5));
        assert!(!font.bold);
    }

    #[test]
    fn os_specific_family_takes_precedence() {
        let mut conf = UserConfig::new();
        conf.set("console", "font/family", "proportional");
        conf.set("console", &format!("font/family/{OS_NAME}"), "monospace");
        let font = get_font(&conf, &FontDefinitions::default(), "console", None);
        assert_eq!(font.family, "monospace");
    }

    #[test]
    fn nothing_installed_leaves_default_family() {
        let conf = UserConfig::parse(
            r#"
            [console]
            "font/family" = "Missing Sans"
            "#,
        )
        .unwrap();
        let font = get_font(&conf, &FontDefinitions::default(), "console", Some(""));
        assert_eq!(font.family, "");
        assert_eq!(font.family(), FontFamily::Proportional);
        assert_eq!(font.size, None);
        assert_eq!(font.font_id().size, DEFAULT_FONT_SIZE);
    }
}
