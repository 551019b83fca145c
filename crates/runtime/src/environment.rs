use indexmap::{map, IndexMap};
use std::fmt;

use crate::value::Value;

/// Handle to an [`Environment`] living in a [`crate::Store`].
///
/// The generation tells a handle to a reclaimed frame apart from one to the
/// frame that later reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl EnvId {
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "env#{}.{}", self.index, self.generation)
    }
}

/// A single frame of bindings plus a reference to the enclosing frame.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    state: IndexMap<String, Value>,
    parent: Option<EnvId>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: EnvId) -> Self {
        Environment {
            state: IndexMap::new(),
            parent: Some(parent),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.state.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.state.contains_key(name)
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.state.insert(name, value);
    }

    pub fn parent(&self) -> Option<EnvId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn values(&self) -> map::Values<'_, String, Value> {
        self.state.values()
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = (&'a String, &'a Value);
    type IntoIter = map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.state.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Environment {
    fn from_iter<T: IntoIterator<Item = (S, Value)>>(iter: T) -> Self {
        Environment {
            state: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
            parent: None,
        }
    }
}
