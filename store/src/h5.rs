//! HDF5 files as containers.
//!
//! The tree maps one to one onto HDF5: groups to groups, attributes to
//! scalar or one-dimensional attributes, arrays to datasets. Strings are
//! written as variable-length UTF-8. Fixed-length strings written by other
//! tools are read back, up to [`FIXED_STRING_LEN`] bytes each.

use std::path::Path;

use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use hdf5::{Attribute, Dataset, H5Type, Location};

use crate::container::Group;
use crate::error::StoreError;
use crate::value::{Array, ArrayData, AttrValue};

/// Longest fixed-length string read back, in bytes.
pub const FIXED_STRING_LEN: usize = 1024;

type Fixed = FixedAscii<FIXED_STRING_LEN>;
type FixedUtf8 = FixedUnicode<FIXED_STRING_LEN>;

fn h5_error(e: hdf5::Error) -> StoreError {
    StoreError::Format(format!("HDF5: {e}"))
}

pub(crate) fn load(path: &Path) -> Result<Group, StoreError> {
    let file = hdf5::File::open(path).map_err(h5_error)?;
    read_group(&file)
}

pub(crate) fn save(path: &Path, root: &Group) -> Result<(), StoreError> {
    let file = hdf5::File::create(path).map_err(h5_error)?;
    write_group(&file, root)?;
    file.flush().map_err(h5_error)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

fn write_group(target: &hdf5::Group, group: &Group) -> Result<(), StoreError> {
    for name in group.attr_names() {
        if let Some(value) = group.attr(name) {
            write_attr(target, name, value)?;
        }
    }
    for name in group.dataset_names() {
        if let Some(array) = group.dataset(name) {
            write_dataset(target, name, array)?;
        }
    }
    for name in group.group_names() {
        if let Some(child) = group.group(name) {
            let created = target.create_group(name).map_err(h5_error)?;
            write_group(&created, child)?;
        }
    }
    Ok(())
}

fn write_attr(loc: &Location, name: &str, value: &AttrValue) -> Result<(), StoreError> {
    match value {
        AttrValue::Int(v) => scalar_attr(loc, name, v),
        AttrValue::Float(v) => scalar_attr(loc, name, v),
        AttrValue::Str(s) => scalar_attr(loc, name, &unicode(s)?),
        AttrValue::Bytes(b) => {
            let text = VarLenAscii::from_ascii(b)
                .map_err(|e| StoreError::Format(format!("attribute {name}: {e}")))?;
            scalar_attr(loc, name, &text)
        }
        AttrValue::IntList(v) => list_attr(loc, name, v),
        AttrValue::FloatList(v) => list_attr(loc, name, v),
        AttrValue::StrList(v) => {
            let items = v
                .iter()
                .map(|s| unicode(s))
                .collect::<Result<Vec<_>, _>>()?;
            list_attr(loc, name, &items)
        }
    }
}

fn unicode(text: &str) -> Result<VarLenUnicode, StoreError> {
    text.parse::<VarLenUnicode>()
        .map_err(|e| StoreError::Format(format!("string {text:?}: {e}")))
}

fn scalar_attr<T: H5Type>(loc: &Location, name: &str, value: &T) -> Result<(), StoreError> {
    let attr = loc
        .new_attr::<T>()
        .shape(())
        .create(name)
        .map_err(h5_error)?;
    attr.write_scalar(value).map_err(h5_error)
}

fn list_attr<T: H5Type>(loc: &Location, name: &str, values: &[T]) -> Result<(), StoreError> {
    let attr = loc
        .new_attr::<T>()
        .shape(values.len())
        .create(name)
        .map_err(h5_error)?;
    attr.write_raw(values).map_err(h5_error)
}

fn write_dataset(target: &hdf5::Group, name: &str, array: &Array) -> Result<(), StoreError> {
    let shape = array.shape();
    match array.data() {
        ArrayData::U8(v) => dataset(target, name, shape, v),
        ArrayData::I32(v) => dataset(target, name, shape, v),
        ArrayData::I64(v) => dataset(target, name, shape, v),
        ArrayData::F32(v) => dataset(target, name, shape, v),
        ArrayData::F64(v) => dataset(target, name, shape, v),
    }
}

fn dataset<T: H5Type>(
    target: &hdf5::Group,
    name: &str,
    shape: &[usize],
    data: &[T],
) -> Result<(), StoreError> {
    let ds = target
        .new_dataset::<T>()
        .shape(shape.to_vec())
        .create(name)
        .map_err(h5_error)?;
    ds.write_raw(data).map_err(h5_error)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn read_group(source: &hdf5::Group) -> Result<Group, StoreError> {
    let mut group = Group::new();
    for name in source.attr_names().map_err(h5_error)? {
        let attr = source.attr(&name).map_err(h5_error)?;
        let value = read_attr(&attr).map_err(|e| in_object(e, &source.name(), &name))?;
        group.set_attr(name, value);
    }
    for ds in source.datasets().map_err(h5_error)? {
        group.set_dataset(link_name(&ds.name()), read_dataset(&ds)?);
    }
    for child in source.groups().map_err(h5_error)? {
        *group.require_group(&link_name(&child.name())) = read_group(&child)?;
    }
    Ok(group)
}

/// The last segment of an HDF5 object path.
fn link_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_owned()
}

fn in_object(err: StoreError, group: &str, name: &str) -> StoreError {
    match err {
        StoreError::Format(msg) => StoreError::Format(format!("{group}@{name}: {msg}")),
        other => other,
    }
}

fn read_attr(attr: &Attribute) -> Result<AttrValue, StoreError> {
    let descriptor = attr
        .dtype()
        .and_then(|dtype| dtype.to_descriptor())
        .map_err(h5_error)?;
    let scalar = attr.is_scalar();
    let value = match descriptor {
        TypeDescriptor::Boolean if scalar => {
            AttrValue::Int(i64::from(attr.read_scalar::<bool>().map_err(h5_error)?))
        }
        TypeDescriptor::Boolean => AttrValue::IntList(
            attr.read_raw::<bool>()
                .map_err(h5_error)?
                .into_iter()
                .map(i64::from)
                .collect(),
        ),
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) if scalar => {
            AttrValue::Int(attr.read_scalar::<i64>().map_err(h5_error)?)
        }
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            AttrValue::IntList(attr.read_raw::<i64>().map_err(h5_error)?)
        }
        TypeDescriptor::Float(_) if scalar => {
            AttrValue::Float(attr.read_scalar::<f64>().map_err(h5_error)?)
        }
        TypeDescriptor::Float(_) => AttrValue::FloatList(attr.read_raw::<f64>().map_err(h5_error)?),
        TypeDescriptor::VarLenUnicode if scalar => AttrValue::Str(
            attr.read_scalar::<VarLenUnicode>()
                .map_err(h5_error)?
                .as_str()
                .to_owned(),
        ),
        TypeDescriptor::VarLenUnicode => AttrValue::StrList(
            attr.read_raw::<VarLenUnicode>()
                .map_err(h5_error)?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect(),
        ),
        TypeDescriptor::FixedUnicode(_) if scalar => AttrValue::Str(
            attr.read_scalar::<FixedUtf8>()
                .map_err(h5_error)?
                .as_str()
                .to_owned(),
        ),
        TypeDescriptor::FixedUnicode(_) => AttrValue::StrList(
            attr.read_raw::<FixedUtf8>()
                .map_err(h5_error)?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect(),
        ),
        // Byte strings stay bytes; the reader decodes them.
        TypeDescriptor::VarLenAscii if scalar => AttrValue::Bytes(
            attr.read_scalar::<VarLenAscii>()
                .map_err(h5_error)?
                .as_bytes()
                .to_vec(),
        ),
        TypeDescriptor::VarLenAscii => AttrValue::StrList(
            attr.read_raw::<VarLenAscii>()
                .map_err(h5_error)?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect(),
        ),
        TypeDescriptor::FixedAscii(_) if scalar => AttrValue::Bytes(
            attr.read_scalar::<Fixed>()
                .map_err(h5_error)?
                .as_bytes()
                .to_vec(),
        ),
        TypeDescriptor::FixedAscii(_) => AttrValue::StrList(
            attr.read_raw::<Fixed>()
                .map_err(h5_error)?
                .iter()
                .map(|s| s.as_str().to_owned())
                .collect(),
        ),
        other => {
            return Err(StoreError::Format(format!(
                "unsupported attribute type {other:?}"
            )))
        }
    };
    Ok(value)
}

fn read_dataset(ds: &Dataset) -> Result<Array, StoreError> {
    let descriptor = ds
        .dtype()
        .and_then(|dtype| dtype.to_descriptor())
        .map_err(h5_error)?;
    let data = match descriptor {
        TypeDescriptor::Unsigned(IntSize::U1) => {
            ArrayData::U8(ds.read_raw::<u8>().map_err(h5_error)?)
        }
        TypeDescriptor::Boolean => ArrayData::U8(
            ds.read_raw::<bool>()
                .map_err(h5_error)?
                .into_iter()
                .map(u8::from)
                .collect(),
        ),
        TypeDescriptor::Integer(IntSize::U1 | IntSize::U2 | IntSize::U4)
        | TypeDescriptor::Unsigned(IntSize::U2) => {
            ArrayData::I32(ds.read_raw::<i32>().map_err(h5_error)?)
        }
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            ArrayData::I64(ds.read_raw::<i64>().map_err(h5_error)?)
        }
        TypeDescriptor::Float(FloatSize::U4) => {
            ArrayData::F32(ds.read_raw::<f32>().map_err(h5_error)?)
        }
        TypeDescriptor::Float(_) => ArrayData::F64(ds.read_raw::<f64>().map_err(h5_error)?),
        other => {
            return Err(StoreError::Format(format!(
                "dataset {}: unsupported type {other:?}",
                ds.name()
            )))
        }
    };
    Array::with_shape(data, &ds.shape())
}
