//! Writing objects into a container.

use std::path::Path;

use uuid::Uuid;

use crate::container::Group;
use crate::error::StoreError;
use crate::handler::{Handler, Serializable};
use crate::path::OptionPath;
use crate::store::{Mode, Store};
use crate::value::{Array, AttrValue, ToAttr};

/// Writes values at the current option path of a writable [`Store`].
///
/// Scalars, lists and the absence sentinel become attributes of the group
/// named by all but the last path segment, keyed by the last segment.
/// Arrays become datasets under that same group.
///
/// # Example
///
/// ```no_run
/// use guidata_store::{Handler, Writer};
///
/// let mut writer = Writer::create("run.gdc").unwrap();
/// writer.write("title", "calibration").unwrap();
/// writer
///     .group("detector", |w| {
///         w.write("gain", &2.5)?;
///         w.write("enabled", &true)
///     })
///     .unwrap();
/// writer.close().unwrap();
/// ```
pub struct Writer {
    store: Store,
    path: OptionPath,
}

impl Writer {
    /// Create (or truncate) the file at `path` and write into it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_store(Store::open(path, Mode::Write)?)
    }

    /// Open the file at `path` for update, creating it if missing.
    pub fn append(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_store(Store::open(path, Mode::Append)?)
    }

    /// Write into an already open store.
    ///
    /// Fails with [`StoreError::ReadOnly`] for a [`Mode::Read`] store.
    pub fn from_store(store: Store) -> Result<Self, StoreError> {
        if !store.mode().is_writable() {
            return Err(StoreError::ReadOnly(store.path().to_path_buf()));
        }
        Ok(Self {
            store,
            path: OptionPath::new(),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The group holding the current value, created if missing.
    fn parent_group(&mut self) -> &mut Group {
        self.store.root_mut().require_path(self.path.parent())
    }

    /// The group named by the full option path, created if missing.
    pub fn current_group(&mut self) -> &mut Group {
        self.store.root_mut().require_path(self.path.segments())
    }

    /// Write a raw attribute at the current position.
    pub fn write_any(&mut self, value: AttrValue) -> Result<(), StoreError> {
        let name = self.path.name()?.to_owned();
        self.parent_group().set_attr(name, value);
        Ok(())
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), StoreError> {
        self.write_any(AttrValue::Int(value))
    }

    pub fn write_float(&mut self, value: f64) -> Result<(), StoreError> {
        self.write_any(AttrValue::Float(value))
    }

    /// Booleans are stored as `0` / `1`.
    pub fn write_bool(&mut self, value: bool) -> Result<(), StoreError> {
        self.write_int(i64::from(value))
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), StoreError> {
        self.write_any(AttrValue::Str(value.to_owned()))
    }

    /// Write a list of scalars as a single attribute.
    pub fn write_sequence<T: ToAttr + ?Sized>(&mut self, values: &T) -> Result<(), StoreError> {
        self.write_any(values.to_attr())
    }

    /// Write the absence sentinel at the current position.
    ///
    /// A sub-group of the same name left by an earlier write is removed.
    pub fn write_none(&mut self) -> Result<(), StoreError> {
        let name = self.path.name()?.to_owned();
        let parent = self.parent_group();
        parent.remove_group(&name);
        parent.set_attr(name, AttrValue::absent());
        Ok(())
    }

    /// Write an array as a dataset (not an attribute) at the current position.
    pub fn write_array(&mut self, array: &Array) -> Result<(), StoreError> {
        let name = self.path.name()?.to_owned();
        self.parent_group().set_dataset(name, array.clone());
        Ok(())
    }

    /// Write `value` under `name`. `None` stores the absence sentinel.
    pub fn write<T: ToAttr + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), StoreError> {
        self.group(name, |w| w.write_any(value.to_attr()))
    }

    /// Write `array` as a dataset named `name`.
    pub fn write_dataset(&mut self, name: &str, array: &Array) -> Result<(), StoreError> {
        self.group(name, |w| w.write_array(array))
    }

    /// Write a nested object into the group `name`.
    ///
    /// The group is created even if the object writes nothing. An absence
    /// sentinel stored under `name` by an earlier write is removed.
    pub fn write_object<T: Serializable + ?Sized>(
        &mut self,
        name: &str,
        object: &T,
    ) -> Result<(), StoreError> {
        self.current_group().remove_attr(name);
        self.group(name, |w| {
            w.current_group();
            object.serialize(w)
        })
    }

    /// Write an optional nested object; `None` stores the absence sentinel.
    pub fn write_optional_object<T: Serializable>(
        &mut self,
        name: &str,
        object: Option<&T>,
    ) -> Result<(), StoreError> {
        match object {
            Some(object) => self.write_object(name, object),
            None => self.group(name, |w| w.write_none()),
        }
    }

    /// Write a sequence of objects into the group `group_name`.
    ///
    /// Every element gets a freshly generated identifier naming its
    /// sub-group; absent elements store the absence sentinel under that
    /// identifier instead. The identifiers are written in order as the `IDs`
    /// attribute. An absent sequence stores the absence sentinel under
    /// `group_name` itself. Whatever an earlier write stored under
    /// `group_name` is replaced.
    pub fn write_object_list<T: Serializable>(
        &mut self,
        seq: Option<&[Option<T>]>,
        group_name: &str,
    ) -> Result<(), StoreError> {
        self.group(group_name, |w| {
            let Some(seq) = seq else {
                return w.write_none();
            };
            let parent = w.parent_group();
            parent.remove_attr(group_name);
            parent.remove_group(group_name);
            w.current_group();
            let ids = element_ids(seq.len());
            for (id, item) in ids.iter().zip(seq) {
                match item {
                    Some(object) => w.write_object(id, object)?,
                    None => w.group(id, |w| w.write_none())?,
                }
            }
            log::debug!("Wrote {} objects under {}", seq.len(), w.path);
            w.write("IDs", &ids)
        })
    }

    /// Flush and close the underlying store.
    ///
    /// Fails if groups are still open; the changes made since the store was
    /// opened are then dropped instead of written.
    pub fn close(self) -> Result<(), StoreError> {
        if !self.path.is_empty() {
            let open = self.path.to_string();
            self.store.discard();
            return Err(StoreError::UnbalancedPath(open));
        }
        self.store.close()
    }
}

impl Handler for Writer {
    fn option_path(&self) -> &OptionPath {
        &self.path
    }

    fn option_path_mut(&mut self) -> &mut OptionPath {
        &mut self.path
    }
}

/// Opaque, unique sub-group names for `count` sequence elements.
fn element_ids(count: usize) -> Vec<String> {
    (0..count).map(|_| Uuid::new_v4().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("guidata_writer_test_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    struct Point {
        x: f64,
        y: f64,
    }

    impl Serializable for Point {
        fn serialize(&self, writer: &mut Writer) -> Result<(), StoreError> {
            writer.write("x", &self.x)?;
            writer.write("y", &self.y)
        }
    }

    #[test]
    fn scalar_goes_to_parent_group() {
        let dir = temp_dir("scalar");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        w.group("settings", |w| w.write("gain", &2i64)).unwrap();

        let settings = w.store().root().group("settings").unwrap();
        assert_eq!(settings.attr("gain"), Some(&AttrValue::Int(2)));
        assert_eq!(w.depth(), 0);
        w.close().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn array_is_dataset_not_attribute() {
        let dir = temp_dir("array");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        w.write_dataset("samples", &Array::new(vec![1i32, 2, 3]))
            .unwrap();

        let root = w.store().root();
        assert!(root.dataset("samples").is_some());
        assert!(!root.has_attr("samples"));
        w.close().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn object_list_layout() {
        let dir = temp_dir("list");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        let points = vec![Some(Point { x: 1.0, y: 2.0 }), None];
        w.write_object_list(Some(points.as_slice()), "points")
            .unwrap();

        let group = w.store().root().group("points").unwrap();
        let ids = match group.attr("IDs") {
            Some(AttrValue::StrList(ids)) => ids.clone(),
            other => panic!("unexpected IDs: {other:?}"),
        };
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        let first = group.group(&ids[0]).unwrap();
        assert_eq!(first.attr("x"), Some(&AttrValue::Float(1.0)));
        assert!(group.attr(&ids[1]).unwrap().is_absent());
        assert!(group.group(&ids[1]).is_none());
        w.close().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn absent_list_is_sentinel_on_parent() {
        let dir = temp_dir("absent_list");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        w.write_object_list::<Point>(None, "points").unwrap();

        let root = w.store().root();
        assert!(root.attr("points").unwrap().is_absent());
        assert!(root.group("points").is_none());
        w.close().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_without_name_fails() {
        let dir = temp_dir("no_name");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        assert!(matches!(w.write_int(1), Err(StoreError::EmptyPath)));
        w.close().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_only_store_is_rejected() {
        let dir = temp_dir("read_only");
        let path = dir.join("a.gdc");
        Store::open(&path, Mode::Write).unwrap().close().unwrap();
        let store = Store::open(&path, Mode::Read).unwrap();
        assert!(matches!(
            Writer::from_store(store),
            Err(StoreError::ReadOnly(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn close_with_open_group_fails() {
        let dir = temp_dir("unbalanced");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        w.begin("left_open");
        let err = w.close().unwrap_err();
        assert!(matches!(err, StoreError::UnbalancedPath(ref p) if p == "/left_open"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_close_writes_nothing() {
        let dir = temp_dir("unbalanced_discard");
        let path = dir.join("a.gdc");
        let mut w = Writer::create(&path).unwrap();
        w.write("gain", &2i64).unwrap();
        w.begin("left_open");
        assert!(w.close().is_err());

        let store = Store::open(&path, Mode::Read).unwrap();
        assert!(store.root().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn sentinel_replaces_group_of_same_name() {
        let dir = temp_dir("sentinel_replaces");
        let mut w = Writer::create(dir.join("a.gdc")).unwrap();
        w.write_object("origin", &Point { x: 0.0, y: 1.0 }).unwrap();
        w.write_optional_object::<Point>("origin", None).unwrap();

        let root = w.store().root();
        assert!(root.group("origin").is_none());
        assert!(root.attr("origin").unwrap().is_absent());

        w.write_object("origin", &Point { x: 3.0, y: 4.0 }).unwrap();
        let root = w.store().root();
        assert!(!root.has_attr("origin"));
        assert_eq!(
            root.group("origin").unwrap().attr("x"),
            Some(&AttrValue::Float(3.0))
        );
        w.close().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
