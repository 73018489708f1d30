//! The option path: the stack of group names a handler is positioned at.

use std::fmt;

use crate::error::StoreError;

/// Ordered group-name segments identifying the current read/write position.
///
/// The last segment names the value being read or written; the segments
/// before it name the group that holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionPath {
    segments: Vec<String>,
}

impl OptionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        self.segments.push(name.to_owned());
    }

    /// Pop the last segment.
    ///
    /// # Panics
    ///
    /// Panics if the path is empty or its last segment is not `name`:
    /// unbalanced begin/end pairs are a bug in the caller.
    pub fn pop(&mut self, name: &str) {
        match self.segments.pop() {
            Some(last) => assert_eq!(
                last, name,
                "option path mismatch: ended '{name}' while '{last}' was open"
            ),
            None => panic!("option path mismatch: ended '{name}' with no open group"),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The name of the value at the current position.
    pub fn name(&self) -> Result<&str, StoreError> {
        self.segments
            .last()
            .map(String::as_str)
            .ok_or(StoreError::EmptyPath)
    }

    /// Segments of the group holding the current value (all but the last).
    pub fn parent(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_name() {
        let mut path = OptionPath::new();
        path.push("settings");
        path.push("gain");
        assert_eq!(path.name().unwrap(), "gain");
        assert_eq!(path.parent(), &["settings".to_owned()]);
        assert_eq!(path.to_string(), "/settings/gain");
    }

    #[test]
    fn empty_path_has_no_name() {
        let path = OptionPath::new();
        assert!(matches!(path.name(), Err(StoreError::EmptyPath)));
        assert!(path.parent().is_empty());
        assert_eq!(path.to_string(), "/");
    }

    #[test]
    #[should_panic(expected = "option path mismatch")]
    fn mismatched_pop_panics() {
        let mut path = OptionPath::new();
        path.push("a");
        path.pop("b");
    }

    #[test]
    #[should_panic(expected = "no open group")]
    fn pop_on_empty_panics() {
        OptionPath::new().pop("a");
    }
}
