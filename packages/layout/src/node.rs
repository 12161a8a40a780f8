//! Node records stored in a layout tree.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier of a node within one snapshot.
pub type NodeId = String;

/// Reserved id of the synthetic root node.
pub const ROOT_ID: &str = "root";

/// Opaque key/value configuration carried by a node.
pub type Props = Map<String, Value>;

/// What kind of component a node renders as.
///
/// The tree store never interprets this beyond [`is_custom`](Self::is_custom);
/// resolving it to something renderable is the rendering layer's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentType {
    /// A component referenced by name, e.g. `"Column"` or `"text"`.
    Named(String),
    /// Any non-string descriptor, passed through untouched.
    Descriptor(Value),
}

impl ComponentType {
    /// The name, if this type is referenced by name.
    pub fn name(&self) -> Option<&str> {
        match self {
            ComponentType::Named(name) => Some(name),
            ComponentType::Descriptor(_) => None,
        }
    }

    /// Whether this type counts as a user-supplied ("custom") component.
    ///
    /// Custom components start with a character whose lowercase form differs
    /// from itself. Digits, symbols and descriptors are never custom.
    pub fn is_custom(&self) -> bool {
        let Some(first) = self.name().and_then(|name| name.chars().next()) else {
            return false;
        };
        !first.to_lowercase().eq(std::iter::once(first))
    }

    pub fn to_value(&self) -> Value {
        match self {
            ComponentType::Named(name) => Value::String(name.clone()),
            ComponentType::Descriptor(value) => value.clone(),
        }
    }

    /// Whether the type carries something (non-empty name, non-null descriptor).
    pub fn is_present(&self) -> bool {
        match self {
            ComponentType::Named(name) => !name.is_empty(),
            ComponentType::Descriptor(value) => !value.is_null(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::Named(name) => write!(f, "{}", name),
            ComponentType::Descriptor(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ComponentType {
    fn from(name: &str) -> Self {
        ComponentType::Named(name.to_string())
    }
}

impl From<String> for ComponentType {
    fn from(name: String) -> Self {
        ComponentType::Named(name)
    }
}

/// A single node of the layout tree.
///
/// Serializes to the raw entry it was read from: unknown fields are carried in
/// `extra`, and optional fields the input spelled out (an empty `children`
/// list, a `null` parent or style) are written back the same way.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RawNode")]
pub struct Node {
    pub id: NodeId,
    pub kind: ComponentType,
    pub props: Props,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub style: Option<Props>,
    /// Fields the store does not interpret.
    pub extra: Props,
    spelling: Spelling,
}

/// Which optional fields a raw entry wrote out even though they carry nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Spelling {
    children: bool,
    null_parent: bool,
    null_style: bool,
}

impl Spelling {
    const STORE: Spelling = Spelling {
        children: true,
        null_parent: false,
        null_style: false,
    };
}

impl Node {
    /// A parentless node with no props or children.
    pub fn new(id: impl Into<NodeId>, kind: impl Into<ComponentType>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            props: Props::new(),
            children: Vec::new(),
            parent: None,
            style: None,
            extra: Props::new(),
            spelling: Spelling::STORE,
        }
    }

    /// The raw JSON entry for this node.
    pub fn to_value(&self) -> Value {
        let mut entry = self.extra.clone();
        entry.insert("id".to_string(), Value::String(self.id.clone()));
        entry.insert("type".to_string(), self.kind.to_value());
        entry.insert("props".to_string(), Value::Object(self.props.clone()));
        if self.spelling.children || !self.children.is_empty() {
            let children = self.children.iter().cloned().map(Value::String).collect();
            entry.insert("children".to_string(), children);
        }
        match &self.parent {
            Some(parent) => {
                entry.insert("parent".to_string(), Value::String(parent.clone()));
            }
            None if self.spelling.null_parent => {
                entry.insert("parent".to_string(), Value::Null);
            }
            None => {}
        }
        match &self.style {
            Some(style) => {
                entry.insert("style".to_string(), Value::Object(style.clone()));
            }
            None if self.spelling.null_style => {
                entry.insert("style".to_string(), Value::Null);
            }
            None => {}
        }
        Value::Object(entry)
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Wire form of a node entry. `Some(None)` marks a field given as `null`.
#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: ComponentType,
    props: Props,
    #[serde(default, deserialize_with = "present")]
    children: Option<Vec<NodeId>>,
    #[serde(default, deserialize_with = "present")]
    parent: Option<Option<NodeId>>,
    #[serde(default, deserialize_with = "present")]
    style: Option<Option<Props>>,
    #[serde(flatten)]
    extra: Props,
}

/// Deserialize a field that was present in the input, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let spelling = Spelling {
            children: raw.children.is_some(),
            null_parent: matches!(raw.parent, Some(None)),
            null_style: matches!(raw.style, Some(None)),
        };
        Self {
            id: raw.id,
            kind: raw.kind,
            props: raw.props,
            children: raw.children.unwrap_or_default(),
            parent: raw.parent.flatten(),
            style: raw.style.flatten(),
            extra: raw.extra,
            spelling,
        }
    }
}

/// An item that has not been placed in a tree yet, so has no id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDraft {
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default)]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Props>,
}

impl NodeDraft {
    pub fn new(kind: impl Into<ComponentType>) -> Self {
        Self {
            kind: kind.into(),
            props: Props::new(),
            style: None,
        }
    }

    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Props) -> Self {
        self.style = Some(style);
        self
    }

    pub(crate) fn into_node(self, id: NodeId, parent: NodeId) -> Node {
        Node {
            id,
            kind: self.kind,
            props: self.props,
            children: Vec::new(),
            parent: Some(parent),
            style: self.style,
            extra: Props::new(),
            spelling: Spelling::STORE,
        }
    }
}

/// What [`insert_or_move`](crate::LayoutState::insert_or_move) should place.
///
/// A draft has no id yet and is inserted; an existing id is moved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Placement {
    Move { id: NodeId },
    Insert(NodeDraft),
}

impl From<NodeDraft> for Placement {
    fn from(draft: NodeDraft) -> Self {
        Placement::Insert(draft)
    }
}

impl From<&Node> for Placement {
    fn from(node: &Node) -> Self {
        Placement::Move {
            id: node.id.clone(),
        }
    }
}
