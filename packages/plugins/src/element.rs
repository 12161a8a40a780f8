//! The rendered output tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One rendered element: a kind, its attributes and child elements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: Map::new(),
            children: Vec::new(),
        }
    }

    /// An element that only groups its children.
    pub fn fragment(children: Vec<Element>) -> Self {
        Self {
            kind: String::new(),
            attrs: Map::new(),
            children,
        }
    }

    pub fn is_fragment(&self) -> bool {
        self.kind.is_empty()
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Map<String, Value>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// Number of elements in this subtree, fragments included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }
}
