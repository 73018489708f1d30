//! Field-to-attribute descriptors.
//!
//! An [`Attr`] binds one field of a struct to one attribute of a group, so
//! that a type can list its stored fields once and save or load all of them
//! with [`save_attrs`] / [`load_attrs`].
//!
//! ```
//! use guidata_store::{load_attrs, save_attrs, Attr, AttrBinding, Group};
//!
//! #[derive(Default)]
//! struct Channel {
//!     label: String,
//!     gain: Option<f64>,
//! }
//!
//! let label = Attr::new(
//!     "label",
//!     |c: &Channel| Some(c.label.clone()),
//!     |c: &mut Channel, v: Option<String>| c.label = v.unwrap_or_default(),
//! );
//! let gain = Attr::new(
//!     "gain",
//!     |c: &Channel| c.gain,
//!     |c: &mut Channel, v: Option<f64>| c.gain = v,
//! )
//! .optional();
//! let attrs: [&dyn AttrBinding<Channel>; 2] = [&label, &gain];
//!
//! let mut group = Group::new();
//! save_attrs(&mut group, &Channel { label: "x".into(), gain: None }, &attrs);
//! assert!(!group.has_attr("gain"));
//!
//! let mut restored = Channel::default();
//! load_attrs(&group, &mut restored, &attrs).unwrap();
//! assert_eq!(restored.label, "x");
//! ```

use crate::container::Group;
use crate::error::StoreError;
use crate::reader::Reader;
use crate::value::{AttrValue, FromAttr, ToAttr};
use crate::writer::Writer;

/// A pair of conversions between a field value and its stored attribute.
pub struct Converter<V> {
    pub to_storage: fn(&V) -> AttrValue,
    /// `None` means the stored value cannot be converted.
    pub from_storage: fn(&AttrValue) -> Option<V>,
}

impl<V> Clone for Converter<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Converter<V> {}

impl<V: ToAttr + FromAttr> Converter<V> {
    /// Store the value as-is through its [`ToAttr`] / [`FromAttr`] impls.
    pub fn native() -> Self {
        Self {
            to_storage: V::to_attr,
            from_storage: V::from_attr,
        }
    }
}

/// Binds a field of `S` holding a `V` to a named attribute.
pub struct Attr<S, V> {
    hdf_name: &'static str,
    optional: bool,
    get: fn(&S) -> Option<V>,
    set: fn(&mut S, Option<V>),
    converter: Converter<V>,
}

impl<S, V: ToAttr + FromAttr> Attr<S, V> {
    /// A required attribute stored with the native conversion.
    pub fn new(hdf_name: &'static str, get: fn(&S) -> Option<V>, set: fn(&mut S, Option<V>)) -> Self {
        Self::with_converter(hdf_name, get, set, Converter::native())
    }
}

impl<S, V> Attr<S, V> {
    /// A required attribute stored through `converter`.
    pub fn with_converter(
        hdf_name: &'static str,
        get: fn(&S) -> Option<V>,
        set: fn(&mut S, Option<V>),
        converter: Converter<V>,
    ) -> Self {
        Self {
            hdf_name,
            optional: false,
            get,
            set,
            converter,
        }
    }

    /// Mark the attribute optional: `None` removes it on save and a missing
    /// attribute loads as `None`.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Object-safe view of an [`Attr`], so descriptors of different value types
/// can be listed together.
pub trait AttrBinding<S> {
    fn hdf_name(&self) -> &str;

    /// Store the field of `obj` into `group`.
    fn save(&self, group: &mut Group, obj: &S);

    /// Restore the field of `obj` from `group`.
    fn load(&self, group: &Group, obj: &mut S) -> Result<(), StoreError>;
}

impl<S, V> AttrBinding<S> for Attr<S, V> {
    fn hdf_name(&self) -> &str {
        self.hdf_name
    }

    fn save(&self, group: &mut Group, obj: &S) {
        match (self.get)(obj) {
            Some(value) => {
                group.set_attr(self.hdf_name, (self.converter.to_storage)(&value));
            }
            None if self.optional => {
                group.remove_attr(self.hdf_name);
            }
            None => {
                group.set_attr(self.hdf_name, AttrValue::absent());
            }
        }
    }

    fn load(&self, group: &Group, obj: &mut S) -> Result<(), StoreError> {
        let Some(stored) = group.attr(self.hdf_name) else {
            if self.optional {
                (self.set)(obj, None);
                return Ok(());
            }
            return Err(StoreError::NotFound(format!(
                "Unable to locate attribute {}",
                self.hdf_name
            )));
        };
        if stored.is_absent() {
            (self.set)(obj, None);
            return Ok(());
        }
        match (self.converter.from_storage)(stored) {
            Some(value) => {
                (self.set)(obj, Some(value));
                Ok(())
            }
            None => Err(StoreError::TypeMismatch {
                name: self.hdf_name.to_owned(),
                expected: std::any::type_name::<V>(),
                found: stored.kind(),
            }),
        }
    }
}

/// Save every bound field of `obj` into `group`.
pub fn save_attrs<S>(group: &mut Group, obj: &S, attrs: &[&dyn AttrBinding<S>]) {
    for attr in attrs {
        attr.save(group, obj);
    }
}

/// Load every bound field of `obj` from `group`, stopping at the first
/// missing required attribute.
pub fn load_attrs<S>(group: &Group, obj: &mut S, attrs: &[&dyn AttrBinding<S>]) -> Result<(), StoreError> {
    for attr in attrs {
        attr.load(group, obj)?;
    }
    Ok(())
}

impl Writer {
    /// Save bound fields of `obj` as attributes of the current group.
    pub fn save_attrs<S>(&mut self, obj: &S, attrs: &[&dyn AttrBinding<S>]) {
        save_attrs(self.current_group(), obj, attrs);
    }
}

impl Reader {
    /// Load bound fields of `obj` from attributes of the current group.
    pub fn load_attrs<S>(&self, obj: &mut S, attrs: &[&dyn AttrBinding<S>]) -> Result<(), StoreError> {
        load_attrs(self.current_group()?, obj, attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Signal {
        title: String,
        unit: Option<String>,
        visible: bool,
    }

    fn title() -> Attr<Signal, String> {
        Attr::new(
            "title",
            |s: &Signal| Some(s.title.clone()),
            |s: &mut Signal, v| s.title = v.unwrap_or_default(),
        )
    }

    fn unit() -> Attr<Signal, String> {
        Attr::new("unit", |s: &Signal| s.unit.clone(), |s: &mut Signal, v| s.unit = v).optional()
    }

    /// Stored as "yes"/"no" text.
    fn visible() -> Attr<Signal, bool> {
        Attr::with_converter(
            "visible",
            |s: &Signal| Some(s.visible),
            |s: &mut Signal, v| s.visible = v.unwrap_or(false),
            Converter {
                to_storage: |v: &bool| AttrValue::Str(if *v { "yes" } else { "no" }.into()),
                from_storage: |a: &AttrValue| match a {
                    AttrValue::Str(s) if s == "yes" => Some(true),
                    AttrValue::Str(s) if s == "no" => Some(false),
                    _ => None,
                },
            },
        )
    }

    #[test]
    fn optional_none_removes_attribute() {
        let (t, u) = (title(), unit());
        let attrs: [&dyn AttrBinding<Signal>; 2] = [&t, &u];
        let mut group = Group::new();
        group.set_attr("unit", AttrValue::Str("V".into()));

        save_attrs(&mut group, &Signal::default(), &attrs);
        assert!(!group.has_attr("unit"));
        assert!(group.has_attr("title"));
    }

    #[test]
    fn missing_optional_loads_none() {
        let (t, u) = (title(), unit());
        let attrs: [&dyn AttrBinding<Signal>; 2] = [&t, &u];
        let mut group = Group::new();
        group.set_attr("title", AttrValue::Str("scan".into()));

        let mut signal = Signal {
            unit: Some("stale".into()),
            ..Signal::default()
        };
        load_attrs(&group, &mut signal, &attrs).unwrap();
        assert_eq!(signal.title, "scan");
        assert_eq!(signal.unit, None);
    }

    #[test]
    fn missing_required_is_not_found() {
        let t = title();
        let err = t.load(&Group::new(), &mut Signal::default()).unwrap_err();
        assert!(
            matches!(err, StoreError::NotFound(ref m) if m == "Unable to locate attribute title")
        );
    }

    #[test]
    fn converter_round_trip() {
        let v = visible();
        let mut group = Group::new();
        v.save(
            &mut group,
            &Signal {
                visible: true,
                ..Signal::default()
            },
        );
        assert_eq!(group.attr("visible"), Some(&AttrValue::Str("yes".into())));

        let mut signal = Signal::default();
        v.load(&group, &mut signal).unwrap();
        assert!(signal.visible);
    }

    #[test]
    fn unconvertible_value_is_mismatch() {
        let v = visible();
        let mut group = Group::new();
        group.set_attr("visible", AttrValue::Int(3));
        let err = v.load(&group, &mut Signal::default()).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }
}
