//! Coding paths: the chain of keys and indices leading to a tree node.
//!
//! Paths exist for diagnostics only. They render as RFC 6901 JSON pointers,
//! so `["b", 0, "i"]` prints as `/b/0/i` and the root prints as an empty
//! string.

use std::fmt;

use dict_coder_value::Value;

/// Key under which base representations are stored by default.
pub const BASE_KEY: &str = "super";

/// One step of a [`CodingPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodingKey {
    /// Field name inside a keyed container.
    Name(String),
    /// Position inside an indexed container.
    Index(usize),
}

impl CodingKey {
    pub fn name(&self) -> Option<&str> {
        match self {
            CodingKey::Name(name) => Some(name),
            CodingKey::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            CodingKey::Name(_) => None,
            CodingKey::Index(index) => Some(*index),
        }
    }
}

impl From<&str> for CodingKey {
    fn from(name: &str) -> Self {
        CodingKey::Name(name.to_owned())
    }
}

impl From<String> for CodingKey {
    fn from(name: String) -> Self {
        CodingKey::Name(name)
    }
}

impl From<usize> for CodingKey {
    fn from(index: usize) -> Self {
        CodingKey::Index(index)
    }
}

impl fmt::Display for CodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingKey::Name(name) => f.write_str(&escape_component(name)),
            CodingKey::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Ordered chain of [`CodingKey`]s from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CodingPath(Vec<CodingKey>);

impl CodingPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path one segment deeper. `self` is left untouched.
    pub fn child(&self, key: impl Into<CodingKey>) -> Self {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend_from_slice(&self.0);
        keys.push(key.into());
        Self(keys)
    }

    pub fn keys(&self) -> &[CodingKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&CodingKey> {
        self.0.last()
    }

    /// Walks `root` along this path and returns the node it names.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.0.iter().try_fold(root, |node, key| match key {
            CodingKey::Name(name) => node.get(name),
            CodingKey::Index(index) => node.get_index(*index),
        })
    }
}

impl<K: Into<CodingKey>> FromIterator<K> for CodingPath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.0 {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}
