//! User configuration store read by the font builder.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::WidgetError;

/// Read access to `(section, option)` configuration entries.
pub trait ConfigStore {
    /// The raw value of an entry.
    fn get_value(&self, section: &str, option: &str) -> Option<toml::Value>;

    fn has_option(&self, section: &str, option: &str) -> bool {
        self.get_value(section, option).is_some()
    }

    /// The entry converted to `T`, or `default` when it is missing or has
    /// another type.
    fn get<T: DeserializeOwned>(&self, section: &str, option: &str, default: T) -> T
    where
        Self: Sized,
    {
        let Some(value) = self.get_value(section, option) else {
            return default;
        };
        match value.try_into() {
            Ok(converted) => converted,
            Err(e) => {
                log::warn!("Ignoring configuration [{section}] {option}: {e}");
                default
            }
        }
    }
}

/// A configuration store backed by a TOML file.
///
/// Each section is a table; option names are its keys and may contain `/`:
///
/// ```toml
/// [console]
/// "font/family" = ["Courier New", "monospace"]
/// "font/size" = 10
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserConfig {
    path: Option<PathBuf>,
    sections: toml::Table,
}

impl UserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the configuration file at `path`. A missing file yields an
    /// empty configuration that will be written to `path` on save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, WidgetError> {
        let path = path.into();
        let sections = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| WidgetError::Config {
                path: path.clone(),
                message: e.to_string(),
            })?;
            content.parse::<toml::Table>().map_err(|e| WidgetError::Config {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            log::info!("Configuration {} not found, using defaults", path.display());
            toml::Table::new()
        };
        Ok(Self {
            path: Some(path),
            sections,
        })
    }

    /// Parse configuration text that is not tied to a file.
    pub fn parse(text: &str) -> Result<Self, WidgetError> {
        let sections = text.parse::<toml::Table>().map_err(|e| WidgetError::Config {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: None,
            sections,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set an entry, creating its section if needed.
    pub fn set(&mut self, section: &str, option: &str, value: impl Into<toml::Value>) {
        let table = self
            .sections
            .entry(section)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        match table {
            toml::Value::Table(table) => {
                table.insert(option.to_owned(), value.into());
            }
            other => {
                let mut fresh = toml::Table::new();
                fresh.insert(option.to_owned(), value.into());
                *other = toml::Value::Table(fresh);
            }
        }
    }

    /// Write the configuration back to the file it was loaded from.
    pub fn save(&self) -> Result<(), WidgetError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = toml::to_string_pretty(&self.sections).map_err(|e| WidgetError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| WidgetError::Config {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}

impl ConfigStore for UserConfig {
    fn get_value(&self, section: &str, option: &str) -> Option<toml::Value> {
        self.sections
            .get(section)
            .and_then(toml::Value::as_table)
            .and_then(|table| table.get(option))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("guidata_config_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn typed_get_with_default() {
        let conf = UserConfig::parse(
            r#"
            [console]
            "font/size" = 10
            "font/bold" = true
            "font/family" = "Courier New"
            "#,
        )
        .unwrap();
        assert_eq!(conf.get("console", "font/size", 0i64), 10);
        assert_eq!(conf.get("console", "font/size", 0.0f64), 10.0);
        assert!(conf.get("console", "font/bold", false));
        assert_eq!(conf.get("console", "missing", 3i64), 3);
        // Wrong type falls back to the default.
        assert_eq!(conf.get("console", "font/family", 7i64), 7);
        assert!(conf.has_option("console", "font/family"));
        assert!(!conf.has_option("editor", "font/family"));
    }

    #[test]
    fn save_and_reload() {
        let dir = temp_dir("save");
        let path = dir.join("app.toml");

        let mut conf = UserConfig::load(&path).unwrap();
        conf.set("editor", "font/size", 12);
        conf.set("editor", "font/family", vec!["Monaco", "monospace"]);
        conf.save().unwrap();

        let conf = UserConfig::load(&path).unwrap();
        assert_eq!(conf.get("editor", "font/size", 0i64), 12);
        assert_eq!(
            conf.get("editor", "font/family", Vec::<String>::new()),
            vec!["Monaco", "monospace"]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = temp_dir("malformed");
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[unterminated").unwrap();
        assert!(matches!(
            UserConfig::load(&path),
            Err(WidgetError::Config { .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
