//! Shared group navigation for [`Writer`](crate::Writer) and
//! [`Reader`](crate::Reader), and the object capability traits.

use crate::error::StoreError;
use crate::path::OptionPath;
use crate::reader::Reader;
use crate::writer::Writer;

/// Group navigation over an [`OptionPath`].
pub trait Handler: Sized {
    fn option_path(&self) -> &OptionPath;

    fn option_path_mut(&mut self) -> &mut OptionPath;

    /// Enter the group or value named `name`.
    fn begin(&mut self, name: &str) {
        self.option_path_mut().push(name);
    }

    /// Leave the group or value named `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not the innermost open segment.
    fn end(&mut self, name: &str) {
        self.option_path_mut().pop(name);
    }

    /// Run `f` inside the group `name`.
    ///
    /// The group is left on every exit path, including when `f` fails.
    fn group<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        self.begin(name);
        let result = f(self);
        self.end(name);
        result
    }

    /// Number of open segments.
    fn depth(&self) -> usize {
        self.option_path().len()
    }
}

/// An object that knows how to write itself through a [`Writer`].
///
/// Implementations write their fields relative to the writer's current
/// position, usually with [`Writer::write`] and [`Writer::write_object`].
pub trait Serializable {
    fn serialize(&self, writer: &mut Writer) -> Result<(), StoreError>;
}

/// An object that knows how to restore itself through a [`Reader`].
///
/// Sequence elements additionally need [`Default`] so that the reader can
/// construct fresh instances.
pub trait Deserializable {
    fn deserialize(&mut self, reader: &mut Reader) -> Result<(), StoreError>;
}
