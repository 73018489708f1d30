//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use guidata_store::{Deserializable, Reader, Serializable, StoreError, Writer};

/// A scratch directory removed when dropped.
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("guidata_store_it_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// A small object with one field of each attribute kind.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sample {
    pub title: String,
    pub count: i64,
    pub scale: f64,
    pub enabled: bool,
    pub note: Option<String>,
    pub offset: Option<f64>,
}

impl Sample {
    pub fn named(title: &str, count: i64) -> Self {
        Self {
            title: title.to_owned(),
            count,
            scale: count as f64 * 0.5,
            enabled: count % 2 == 0,
            note: None,
            offset: Some(-1.25),
        }
    }
}

impl Serializable for Sample {
    fn serialize(&self, w: &mut Writer) -> Result<(), StoreError> {
        w.write("title", &self.title)?;
        w.write("count", &self.count)?;
        w.write("scale", &self.scale)?;
        w.write("enabled", &self.enabled)?;
        w.write("note", &self.note)?;
        w.write("offset", &self.offset)
    }
}

impl Deserializable for Sample {
    fn deserialize(&mut self, r: &mut Reader) -> Result<(), StoreError> {
        self.title = r.read("title")?;
        self.count = r.read("count")?;
        self.scale = r.read("scale")?;
        self.enabled = r.read("enabled")?;
        self.note = r.read("note")?;
        self.offset = r.read("offset")?;
        Ok(())
    }
}

/// An object nesting another object and a sequence of objects.
#[derive(Debug, Default, PartialEq)]
pub struct Session {
    pub name: String,
    pub reference: Option<Sample>,
    pub samples: Option<Vec<Option<Sample>>>,
}

impl Serializable for Session {
    fn serialize(&self, w: &mut Writer) -> Result<(), StoreError> {
        w.write("name", &self.name)?;
        w.write_optional_object("reference", self.reference.as_ref())?;
        w.write_object_list(self.samples.as_deref(), "samples")
    }
}

impl Deserializable for Session {
    fn deserialize(&mut self, r: &mut Reader) -> Result<(), StoreError> {
        self.name = r.read("name")?;
        self.reference = r.read_object("reference")?;
        self.samples = r.read_object_list("samples")?;
        Ok(())
    }
}
