//! Hierarchical serialization of objects into container files.
//!
//! A container is a tree of named [`Group`]s holding attributes (small
//! scalar or list values), array datasets, and sub-groups. A [`Writer`] or
//! [`Reader`] walks that tree with an option path: [`Handler::begin`] /
//! [`Handler::end`] (or the scoped [`Handler::group`]) push and pop group
//! names, and a value is stored as an attribute of the group named by all
//! but the last segment.
//!
//! # File formats
//!
//! Trees are saved as RON or bincode (features `ron` and `bincode`, both on
//! by default) or, with the `hdf5` feature, as HDF5 files readable by other
//! HDF5 tools. The format of an existing file is detected when it is opened.
//!
//! # Conventions
//!
//! - An absent value (`None`) is stored as the empty string. The `Option`
//!   readers decode it back to `None`; a genuinely empty string therefore
//!   also reads as absent.
//! - A sequence of objects is a group whose sub-groups are named by unique
//!   generated identifiers, listed in order by the group's `IDs` attribute.
//!   An absent element is the empty string stored under its identifier; an
//!   absent sequence is the empty string stored under the sequence name.
//!
//! # Example
//!
//! ```no_run
//! use guidata_store::{Deserializable, Handler, Reader, Serializable, StoreError, Writer};
//!
//! #[derive(Default)]
//! struct Peak {
//!     position: f64,
//!     label: Option<String>,
//! }
//!
//! impl Serializable for Peak {
//!     fn serialize(&self, w: &mut Writer) -> Result<(), StoreError> {
//!         w.write("position", &self.position)?;
//!         w.write("label", &self.label)
//!     }
//! }
//!
//! impl Deserializable for Peak {
//!     fn deserialize(&mut self, r: &mut Reader) -> Result<(), StoreError> {
//!         self.position = r.read("position")?;
//!         self.label = r.read("label")?;
//!         Ok(())
//!     }
//! }
//!
//! let peaks = vec![Some(Peak { position: 1.5, label: None }), None];
//! let mut w = Writer::create("peaks.gdc")?;
//! w.write_object_list(Some(peaks.as_slice()), "peaks")?;
//! w.close()?;
//!
//! let mut r = Reader::open("peaks.gdc")?;
//! let restored = r.read_object_list::<Peak>("peaks")?.unwrap_or_default();
//! assert_eq!(restored.len(), 2);
//! # Ok::<(), StoreError>(())
//! ```

mod attr;
mod container;
mod error;
pub mod format;
#[cfg(feature = "hdf5")]
mod h5;
mod handler;
mod path;
mod reader;
mod store;
mod value;
mod writer;

pub use attr::{load_attrs, save_attrs, Attr, AttrBinding, Converter};
pub use container::Group;
pub use error::StoreError;
pub use format::Format;
pub use handler::{Deserializable, Handler, Serializable};
pub use path::OptionPath;
pub use reader::Reader;
pub use store::{Mode, Store};
pub use value::{decode_attr, Array, ArrayData, AttrValue, DType, FromAttr, ToAttr};
pub use writer::Writer;
