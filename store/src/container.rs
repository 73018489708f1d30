//! The in-memory container tree.
//!
//! A [`Group`] holds named attributes, named array datasets and named
//! sub-groups. Attributes and links live in separate namespaces, so a group
//! may hold an attribute and a sub-group with the same name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{Array, AttrValue};

/// A node of the container tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    attrs: BTreeMap<String, AttrValue>,
    #[serde(default)]
    datasets: BTreeMap<String, Array>,
    #[serde(default)]
    groups: BTreeMap<String, Group>,
}

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Attributes ---

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Set an attribute, returning the previous value if any.
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) -> Option<AttrValue> {
        self.attrs.insert(name.into(), value)
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove(name)
    }

    /// Attribute names in sorted order.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    // --- Datasets ---

    pub fn dataset(&self, name: &str) -> Option<&Array> {
        self.datasets.get(name)
    }

    /// Store an array dataset, replacing any previous one with the same name.
    pub fn set_dataset(&mut self, name: impl Into<String>, array: Array) -> Option<Array> {
        self.datasets.insert(name.into(), array)
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    // --- Sub-groups ---

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.get_mut(name)
    }

    /// Return the named sub-group, creating it if it does not exist.
    pub fn require_group(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_owned()).or_default()
    }

    pub fn remove_group(&mut self, name: &str) -> Option<Group> {
        self.groups.remove(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Walk `segments` down from this group without creating anything.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Group> {
        let mut node = self;
        for segment in segments {
            node = node.groups.get(segment.as_ref())?;
        }
        Some(node)
    }

    /// Walk `segments` down from this group, creating missing groups.
    pub fn require_path<S: AsRef<str>>(&mut self, segments: &[S]) -> &mut Group {
        let mut node = self;
        for segment in segments {
            node = node.require_group(segment.as_ref());
        }
        node
    }

    /// Whether the group holds no attributes, datasets or sub-groups.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.datasets.is_empty() && self.groups.is_empty()
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        for (name, value) in &self.attrs {
            writeln!(f, "{indent}@{name} = {value}")?;
        }
        for (name, array) in &self.datasets {
            writeln!(f, "{indent}{name} [{} {:?}]", array.dtype(), array.shape())?;
        }
        for (name, group) in &self.groups {
            writeln!(f, "{indent}{name}/")?;
            group.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Prints the tree: `@name = value` for attributes, `name [dtype shape]`
/// for datasets and `name/` followed by an indented block for groups.
impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
