//! Attribute values and array datasets stored in a container.
//!
//! [`AttrValue`] is the small, named value attached to a group. [`Array`] is
//! a shaped numeric payload stored as a dataset of its own. The [`ToAttr`] and
//! [`FromAttr`] traits convert between Rust values and attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A value stored as a group attribute.
///
/// The empty string is the absence sentinel: writing `None` stores
/// `Str("")`, and the `Option` readers decode it back to `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
    /// Raw byte string. Decoded to text by the string readers.
    Bytes(Vec<u8>),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    StrList(Vec<String>),
}

impl AttrValue {
    /// The absence sentinel.
    pub fn absent() -> Self {
        AttrValue::Str(String::new())
    }

    /// Whether this value is the absence sentinel.
    pub fn is_absent(&self) -> bool {
        match self {
            AttrValue::Str(s) => s.is_empty(),
            AttrValue::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "str",
            AttrValue::Bytes(_) => "bytes",
            AttrValue::IntList(_) => "int list",
            AttrValue::FloatList(_) => "float list",
            AttrValue::StrList(_) => "str list",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Str(s) => write!(f, "{s:?}"),
            AttrValue::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            AttrValue::IntList(v) => write!(f, "{v:?}"),
            AttrValue::FloatList(v) => write!(f, "{v:?}"),
            AttrValue::StrList(v) => write!(f, "{v:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert a Rust value into the attribute that stores it.
pub trait ToAttr {
    fn to_attr(&self) -> AttrValue;
}

/// Decode an attribute back into a Rust value.
///
/// Returns `None` when the stored value has an incompatible type; the
/// caller turns that into [`StoreError::TypeMismatch`].
pub trait FromAttr: Sized {
    /// Type name used in error messages.
    const KIND: &'static str;

    fn from_attr(value: &AttrValue) -> Option<Self>;
}

/// Decode `value` stored under `name`, reporting a type mismatch on failure.
pub fn decode_attr<T: FromAttr>(name: &str, value: &AttrValue) -> Result<T, StoreError> {
    T::from_attr(value).ok_or_else(|| StoreError::TypeMismatch {
        name: name.to_owned(),
        expected: T::KIND,
        found: value.kind(),
    })
}

impl ToAttr for i64 {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Int(*self)
    }
}

impl ToAttr for i32 {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Int(i64::from(*self))
    }
}

impl ToAttr for u32 {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Int(i64::from(*self))
    }
}

impl ToAttr for f64 {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Float(*self)
    }
}

impl ToAttr for f32 {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Float(f64::from(*self))
    }
}

/// Booleans are stored as their integer encoding.
impl ToAttr for bool {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Int(i64::from(*self))
    }
}

impl ToAttr for str {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Str(self.to_owned())
    }
}

impl ToAttr for String {
    fn to_attr(&self) -> AttrValue {
        AttrValue::Str(self.clone())
    }
}

impl ToAttr for [i64] {
    fn to_attr(&self) -> AttrValue {
        AttrValue::IntList(self.to_vec())
    }
}

impl ToAttr for Vec<i64> {
    fn to_attr(&self) -> AttrValue {
        AttrValue::IntList(self.clone())
    }
}

impl ToAttr for [f64] {
    fn to_attr(&self) -> AttrValue {
        AttrValue::FloatList(self.to_vec())
    }
}

impl ToAttr for Vec<f64> {
    fn to_attr(&self) -> AttrValue {
        AttrValue::FloatList(self.clone())
    }
}

impl ToAttr for [String] {
    fn to_attr(&self) -> AttrValue {
        AttrValue::StrList(self.to_vec())
    }
}

impl ToAttr for Vec<String> {
    fn to_attr(&self) -> AttrValue {
        AttrValue::StrList(self.clone())
    }
}

impl ToAttr for AttrValue {
    fn to_attr(&self) -> AttrValue {
        self.clone()
    }
}

impl<T: ToAttr> ToAttr for Option<T> {
    fn to_attr(&self) -> AttrValue {
        match self {
            Some(value) => value.to_attr(),
            None => AttrValue::absent(),
        }
    }
}

impl<T: ToAttr + ?Sized> ToAttr for &T {
    fn to_attr(&self) -> AttrValue {
        (**self).to_attr()
    }
}

impl FromAttr for i64 {
    const KIND: &'static str = "int";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromAttr for i32 {
    const KIND: &'static str = "int";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl FromAttr for u32 {
    const KIND: &'static str = "int";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl FromAttr for f64 {
    const KIND: &'static str = "float";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromAttr for f32 {
    const KIND: &'static str = "float";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        f64::from_attr(value).map(|v| v as f32)
    }
}

impl FromAttr for bool {
    const KIND: &'static str = "bool";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl FromAttr for String {
    const KIND: &'static str = "str";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Str(s) => Some(s.clone()),
            AttrValue::Bytes(b) => String::from_utf8(b.clone()).ok(),
            _ => None,
        }
    }
}

impl FromAttr for Vec<i64> {
    const KIND: &'static str = "int list";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::IntList(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttr for Vec<f64> {
    const KIND: &'static str = "float list";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::FloatList(v) => Some(v.clone()),
            AttrValue::IntList(v) => Some(v.iter().map(|&x| x as f64).collect()),
            _ => None,
        }
    }
}

impl FromAttr for Vec<String> {
    const KIND: &'static str = "str list";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::StrList(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromAttr for AttrValue {
    const KIND: &'static str = "any";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// The absence sentinel decodes to `None` instead of being converted.
impl<T: FromAttr> FromAttr for Option<T> {
    const KIND: &'static str = T::KIND;

    fn from_attr(value: &AttrValue) -> Option<Self> {
        if value.is_absent() {
            return Some(None);
        }
        T::from_attr(value).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Array datasets
// ---------------------------------------------------------------------------

/// Element type of an [`Array`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    U8,
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::U8 => write!(f, "u8"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

/// Flat element storage of an [`Array`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArrayData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::U8(v) => v.len(),
            ArrayData::I32(v) => v.len(),
            ArrayData::I64(v) => v.len(),
            ArrayData::F32(v) => v.len(),
            ArrayData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::U8(_) => DType::U8,
            ArrayData::I32(_) => DType::I32,
            ArrayData::I64(_) => DType::I64,
            ArrayData::F32(_) => DType::F32,
            ArrayData::F64(_) => DType::F64,
        }
    }
}

impl From<Vec<u8>> for ArrayData {
    fn from(v: Vec<u8>) -> Self {
        ArrayData::U8(v)
    }
}

impl From<Vec<i32>> for ArrayData {
    fn from(v: Vec<i32>) -> Self {
        ArrayData::I32(v)
    }
}

impl From<Vec<i64>> for ArrayData {
    fn from(v: Vec<i64>) -> Self {
        ArrayData::I64(v)
    }
}

impl From<Vec<f32>> for ArrayData {
    fn from(v: Vec<f32>) -> Self {
        ArrayData::F32(v)
    }
}

impl From<Vec<f64>> for ArrayData {
    fn from(v: Vec<f64>) -> Self {
        ArrayData::F64(v)
    }
}

/// A shaped numeric array stored as a dataset under a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Array {
    shape: Vec<usize>,
    data: ArrayData,
}

impl Array {
    /// Create a one-dimensional array.
    pub fn new(data: impl Into<ArrayData>) -> Self {
        let data = data.into();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Create an array with an explicit shape.
    ///
    /// Fails if the product of `shape` does not match the element count.
    pub fn with_shape(data: impl Into<ArrayData>, shape: &[usize]) -> Result<Self, StoreError> {
        let data = data.into();
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(StoreError::Format(format!(
                "shape {shape:?} holds {expected} elements, data has {}",
                data.len()
            )));
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the elements if the array holds `f64`.
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            ArrayData::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Copy the elements, widening every numeric type to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.data {
            ArrayData::U8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            ArrayData::I32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            ArrayData::I64(v) => v.iter().map(|&x| x as f64).collect(),
            ArrayData::F32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            ArrayData::F64(v) => v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sentinel_is_empty_string() {
        assert_eq!(AttrValue::absent(), AttrValue::Str(String::new()));
        assert!(AttrValue::absent().is_absent());
        assert!(!AttrValue::Int(0).is_absent());
        assert!(!AttrValue::Str(" ".into()).is_absent());
    }

    #[test]
    fn bool_is_stored_as_int() {
        assert_eq!(true.to_attr(), AttrValue::Int(1));
        assert_eq!(false.to_attr(), AttrValue::Int(0));
        assert_eq!(bool::from_attr(&AttrValue::Int(1)), Some(true));
    }

    #[test]
    fn none_is_stored_as_sentinel() {
        let v: Option<i64> = None;
        assert!(v.to_attr().is_absent());
        assert_eq!(Some(3i64).to_attr(), AttrValue::Int(3));
    }

    #[test]
    fn optional_readers_decode_sentinel() {
        assert_eq!(Option::<i64>::from_attr(&AttrValue::absent()), Some(None));
        assert_eq!(Option::<f64>::from_attr(&AttrValue::absent()), Some(None));
        assert_eq!(Option::<bool>::from_attr(&AttrValue::absent()), Some(None));
        assert_eq!(
            Option::<i64>::from_attr(&AttrValue::Int(7)),
            Some(Some(7))
        );
    }

    #[test]
    fn bytes_decode_to_text() {
        let v = AttrValue::Bytes(b"hello".to_vec());
        assert_eq!(String::from_attr(&v), Some("hello".to_owned()));
    }

    #[test]
    fn decode_attr_reports_mismatch() {
        let err = decode_attr::<i64>("count", &AttrValue::Str("x".into())).unwrap_err();
        match err {
            StoreError::TypeMismatch {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "count");
                assert_eq!(expected, "int");
                assert_eq!(found, "str");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn int_does_not_fit_i32() {
        assert_eq!(i32::from_attr(&AttrValue::Int(i64::MAX)), None);
    }

    #[test]
    fn array_shape_must_match() {
        let ok = Array::with_shape(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(ok.shape(), &[2, 3]);
        assert_eq!(ok.dtype(), DType::F64);
        assert!(Array::with_shape(vec![1.0f64, 2.0], &[2, 3]).is_err());
    }

    #[test]
    fn array_widening() {
        let a = Array::new(vec![1u8, 2, 255]);
        assert_eq!(a.to_f64_vec(), vec![1.0, 2.0, 255.0]);
        assert!(a.as_f64().is_none());
        assert_eq!(a.dtype().to_string(), "u8");
    }
}
