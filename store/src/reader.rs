//! Reading objects back from a container.

use std::path::Path;

use crate::container::Group;
use crate::error::StoreError;
use crate::handler::{Deserializable, Handler};
use crate::path::OptionPath;
use crate::store::{Mode, Store};
use crate::value::{decode_attr, Array, AttrValue, FromAttr};

/// Reads values at the current option path of a [`Store`].
///
/// Mirrors [`Writer`](crate::Writer): scalars are attributes of the group
/// named by all but the last path segment, keyed by the last segment.
/// Navigation never creates groups; a missing group or attribute is
/// [`StoreError::NotFound`].
///
/// # Example
///
/// ```no_run
/// use guidata_store::{Handler, Reader};
///
/// let mut reader = Reader::open("run.gdc").unwrap();
/// let title: String = reader.read("title").unwrap();
/// let gain: Option<f64> = reader.group("detector", |r| r.read("gain")).unwrap();
/// reader.close().unwrap();
/// ```
pub struct Reader {
    store: Store,
    path: OptionPath,
}

impl Reader {
    /// Open the file at `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::from_store(Store::open(path, Mode::Read)?))
    }

    /// Read from an already open store.
    pub fn from_store(store: Store) -> Self {
        Self {
            store,
            path: OptionPath::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The group holding the current value.
    fn parent_group(&self) -> Result<&Group, StoreError> {
        let parent = self.path.parent();
        self.store
            .root()
            .resolve(parent)
            .ok_or_else(|| StoreError::NotFound(format!("group /{}", parent.join("/"))))
    }

    /// The group named by the full option path.
    pub fn current_group(&self) -> Result<&Group, StoreError> {
        self.store
            .root()
            .resolve(self.path.segments())
            .ok_or_else(|| StoreError::NotFound(format!("group {}", self.path)))
    }

    /// Whether the current name is stored as an attribute of its parent
    /// group, which is how absent objects and sequences are recorded.
    fn stored_as_attribute(&self) -> Result<bool, StoreError> {
        let name = self.path.name()?;
        Ok(self.parent_group()?.has_attr(name))
    }

    /// Read the raw attribute at the current position.
    pub fn read_attr(&self) -> Result<&AttrValue, StoreError> {
        let name = self.path.name()?;
        self.parent_group()?
            .attr(name)
            .ok_or_else(|| StoreError::NotFound(format!("attribute {}", self.path)))
    }

    /// Read the attribute at the current position, decoding byte strings
    /// to text.
    pub fn read_any(&self) -> Result<AttrValue, StoreError> {
        match self.read_attr()? {
            AttrValue::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map(AttrValue::Str)
                .map_err(|e| StoreError::Format(format!("attribute {}: {e}", self.path))),
            other => Ok(other.clone()),
        }
    }

    /// Decode the attribute at the current position as `T`.
    pub fn read_value<T: FromAttr>(&self) -> Result<T, StoreError> {
        let value = self.read_attr()?;
        decode_attr(&self.path.to_string(), value)
    }

    /// `None` if the absence sentinel was stored.
    pub fn read_bool(&self) -> Result<Option<bool>, StoreError> {
        self.read_value()
    }

    /// `None` if the absence sentinel was stored.
    pub fn read_int(&self) -> Result<Option<i64>, StoreError> {
        self.read_value()
    }

    /// `None` if the absence sentinel was stored.
    pub fn read_float(&self) -> Result<Option<f64>, StoreError> {
        self.read_value()
    }

    /// The absence sentinel reads as the empty string.
    pub fn read_str(&self) -> Result<String, StoreError> {
        self.read_value()
    }

    /// Read a list attribute.
    pub fn read_sequence<T>(&self) -> Result<Vec<T>, StoreError>
    where
        Vec<T>: FromAttr,
    {
        self.read_value()
    }

    /// Read the full dataset at the current position.
    pub fn read_array(&self) -> Result<Array, StoreError> {
        let name = self.path.name()?;
        self.parent_group()?
            .dataset(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("dataset {}", self.path)))
    }

    /// Read the value stored under `name`.
    pub fn read<T: FromAttr>(&mut self, name: &str) -> Result<T, StoreError> {
        self.group(name, |r| r.read_value())
    }

    /// Read the value stored under `name` with a custom reader function.
    pub fn read_with<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        self.group(name, f)
    }

    /// Read the dataset named `name`.
    pub fn read_dataset(&mut self, name: &str) -> Result<Array, StoreError> {
        self.group(name, |r| r.read_array())
    }

    /// Restore `instance` from the group `name`.
    ///
    /// Returns `None` without touching `instance` if the object was absent
    /// when written.
    pub fn read_instance<T: Deserializable>(
        &mut self,
        name: &str,
        mut instance: T,
    ) -> Result<Option<T>, StoreError> {
        self.group(name, |r| {
            if r.stored_as_attribute()? {
                return Ok(None);
            }
            instance.deserialize(r)?;
            Ok(Some(instance))
        })
    }

    /// Restore a nested object written by
    /// [`Writer::write_object`](crate::Writer::write_object).
    pub fn read_object<T: Deserializable + Default>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, StoreError> {
        self.read_instance(name, T::default())
    }

    /// Read a sequence written by
    /// [`Writer::write_object_list`](crate::Writer::write_object_list).
    ///
    /// Returns `None` if the sequence itself was absent. Absent elements
    /// come back as `None`.
    pub fn read_object_list<T: Deserializable + Default>(
        &mut self,
        group_name: &str,
    ) -> Result<Option<Vec<Option<T>>>, StoreError> {
        self.read_object_list_with_progress(group_name, |_| false)
    }

    /// Like [`read_object_list`](Self::read_object_list), reporting progress.
    ///
    /// Before each element `progress` receives the percentage (0–99) of
    /// elements already read. Returning `true` cancels: the elements read
    /// so far are returned.
    pub fn read_object_list_with_progress<T: Deserializable + Default>(
        &mut self,
        group_name: &str,
        mut progress: impl FnMut(u8) -> bool,
    ) -> Result<Option<Vec<Option<T>>>, StoreError> {
        self.group(group_name, |r| {
            if r.stored_as_attribute()? {
                return Ok(None);
            }
            let ids: Vec<String> = r.read("IDs")?;
            let count = ids.len();
            let mut seq = Vec::with_capacity(count);
            for (idx, id) in ids.iter().enumerate() {
                if progress(percent(idx, count)) {
                    log::debug!(
                        "Reading {} cancelled after {idx} of {count} objects",
                        r.path
                    );
                    break;
                }
                seq.push(r.read_instance(id, T::default())?);
            }
            Ok(Some(seq))
        })
    }

    /// Close the underlying store.
    ///
    /// Fails if groups are still open.
    pub fn close(self) -> Result<(), StoreError> {
        if !self.path.is_empty() {
            return Err(StoreError::UnbalancedPath(self.path.to_string()));
        }
        self.store.close()
    }
}

impl Handler for Reader {
    fn option_path(&self) -> &OptionPath {
        &self.path
    }

    fn option_path_mut(&mut self) -> &mut OptionPath {
        &mut self.path
    }
}

fn percent(done: usize, total: usize) -> u8 {
    (100 * done / total.max(1)) as u8
}
