//! # guidata demos
//!
//! A sample acquisition dataset written to and read back from a container
//! file, used by the `gdc` command-line tool.
//!
//! ## Available Demos
//!
//! - `gdc write` - write a sample acquisition with N channels
//! - `gdc read` - read it back, reporting progress
//! - `gdc dump` - print the container tree of any file

use std::path::Path;

use guidata_store::{
    Array, Attr, AttrBinding, Deserializable, Format, Handler, Mode, Reader, Serializable, Store,
    StoreError, Writer,
};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One recorded signal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Channel {
    pub label: String,
    pub unit: Option<String>,
    pub gain: f64,
    pub enabled: bool,
    pub samples: Vec<f64>,
}

impl Channel {
    fn label_attr() -> Attr<Channel, String> {
        Attr::new(
            "label",
            |c: &Channel| Some(c.label.clone()),
            |c: &mut Channel, v| c.label = v.unwrap_or_default(),
        )
    }

    fn unit_attr() -> Attr<Channel, String> {
        Attr::new("unit", |c: &Channel| c.unit.clone(), |c: &mut Channel, v| c.unit = v).optional()
    }

    fn gain_attr() -> Attr<Channel, f64> {
        Attr::new(
            "gain",
            |c: &Channel| Some(c.gain),
            |c: &mut Channel, v| c.gain = v.unwrap_or(1.0),
        )
    }
}

impl Serializable for Channel {
    fn serialize(&self, w: &mut Writer) -> Result<(), StoreError> {
        let (label, unit, gain) = (Self::label_attr(), Self::unit_attr(), Self::gain_attr());
        w.save_attrs(self, &[&label as &dyn AttrBinding<Self>, &unit, &gain]);
        w.write("enabled", &self.enabled)?;
        w.write_dataset("samples", &Array::new(self.samples.clone()))
    }
}

impl Deserializable for Channel {
    fn deserialize(&mut self, r: &mut Reader) -> Result<(), StoreError> {
        let (label, unit, gain) = (Self::label_attr(), Self::unit_attr(), Self::gain_attr());
        r.load_attrs(self, &[&label as &dyn AttrBinding<Self>, &unit, &gain])?;
        self.enabled = r.read("enabled")?;
        self.samples = r.read_dataset("samples")?.to_f64_vec();
        Ok(())
    }
}

/// A set of channels recorded together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Acquisition {
    pub title: String,
    pub operator: Option<String>,
    pub tags: Vec<String>,
    pub channels: Option<Vec<Option<Channel>>>,
}

impl Serializable for Acquisition {
    fn serialize(&self, w: &mut Writer) -> Result<(), StoreError> {
        w.write("title", &self.title)?;
        w.write("operator", &self.operator)?;
        w.group("tags", |w| w.write_sequence(&self.tags))?;
        w.write_object_list(self.channels.as_deref(), "channels")
    }
}

impl Deserializable for Acquisition {
    fn deserialize(&mut self, r: &mut Reader) -> Result<(), StoreError> {
        self.title = r.read("title")?;
        self.operator = r.read("operator")?;
        self.tags = r.group("tags", |r| r.read_sequence())?;
        self.channels = r.read_object_list_with_progress("channels", |percent| {
            log::info!("Reading channels: {percent}%");
            false
        })?;
        Ok(())
    }
}

/// A deterministic acquisition with `count` channels; every third channel
/// is absent.
pub fn sample_acquisition(count: usize) -> Acquisition {
    let channels = (0..count)
        .map(|idx| {
            (idx % 3 != 2).then(|| Channel {
                label: format!("ch{idx}"),
                unit: (idx % 2 == 0).then(|| "V".to_owned()),
                gain: 1.0 + idx as f64 * 0.5,
                enabled: idx % 2 == 0,
                samples: (0..8).map(|i| (i as f64 * 0.25 + idx as f64).sin()).collect(),
            })
        })
        .collect();
    Acquisition {
        title: "Sample acquisition".into(),
        operator: None,
        tags: vec!["demo".into(), format!("{count} channels")],
        channels: Some(channels),
    }
}

/// Write `acquisition` as the `acquisition` group of a new file.
pub fn write_acquisition(
    path: &Path,
    format: Format,
    acquisition: &Acquisition,
) -> Result<(), StoreError> {
    let store = Store::open_with_format(path, Mode::Write, format)?;
    let mut w = Writer::from_store(store)?;
    w.write_object("acquisition", acquisition)?;
    w.close()
}

/// Read the `acquisition` group of `path`.
pub fn read_acquisition(path: &Path) -> Result<Acquisition, StoreError> {
    let mut r = Reader::open(path)?;
    let acquisition = r
        .read_object("acquisition")?
        .ok_or_else(|| StoreError::NotFound("acquisition".into()))?;
    r.close()?;
    Ok(acquisition)
}

/// The container tree of `path` as indented text.
pub fn dump(path: &Path) -> Result<String, StoreError> {
    let store = Store::open(path, Mode::Read)?;
    Ok(store.root().to_string())
}
