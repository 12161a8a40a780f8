//! Paths into a node's props, and the helpers that read and write them.
//!
//! A prop path is a sequence of keys separated by `/` or `.`. Numeric
//! components index into arrays; everything else indexes into objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::Props;

/// Errors related to prop path parsing and application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropPathError {
    #[error("prop path is empty")]
    Empty,

    /// A component could not be used against the value it points into.
    #[error("cannot apply '{path}' at component '{component}': {message}")]
    Unreachable {
        path: String,
        component: String,
        message: String,
    },
}

/// A parsed, non-empty path into a props map.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropPath {
    components: Vec<String>,
}

impl PropPath {
    /// Parse a path string.
    ///
    /// Empty components are dropped, so `"a//b/"` and `"a.b"` are the same
    /// path. A path with no components at all is rejected.
    ///
    /// ```rust
    /// use trellis_layout::PropPath;
    ///
    /// let path = PropPath::parse("style.padding/0").unwrap();
    /// assert_eq!(path.len(), 3);
    /// ```
    pub fn parse(s: &str) -> Result<Self, PropPathError> {
        let components: Vec<String> = s
            .split(['/', '.'])
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();
        if components.is_empty() {
            return Err(PropPathError::Empty);
        }
        Ok(Self { components })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.components.iter()
    }

    fn split_last(&self) -> Result<(&[String], &String), PropPathError> {
        self.components
            .split_last()
            .map(|(last, prefix)| (prefix, last))
            .ok_or(PropPathError::Empty)
    }

    fn unreachable(&self, component: &str, message: impl Into<String>) -> PropPathError {
        PropPathError::Unreachable {
            path: self.to_string(),
            component: component.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

impl TryFrom<String> for PropPath {
    type Error = PropPathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PropPath> for String {
    fn from(path: PropPath) -> Self {
        path.to_string()
    }
}

/// Look up the value at `path`, if every component resolves.
pub fn get<'a>(props: &'a Props, path: &PropPath) -> Option<&'a Value> {
    let mut components = path.iter();
    let first = components.next()?;
    let mut cursor = props.get(first)?;
    for component in components {
        cursor = match cursor {
            Value::Object(map) => map.get(component)?,
            Value::Array(arr) => arr.get(component.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cursor)
}

/// Set the value at `path`, creating intermediate objects as needed.
///
/// Array components must be in bounds, or exactly one past the end to push.
pub fn set(props: &mut Props, path: &PropPath, value: Value) -> Result<(), PropPathError> {
    let (prefix, last) = path.split_last()?;
    let container = match prefix.split_first() {
        None => {
            props.insert(last.clone(), value);
            return Ok(());
        }
        Some((first, rest)) => {
            let mut cursor = props
                .entry(first.clone())
                .or_insert_with(|| Value::Object(Props::new()));
            for component in rest {
                cursor = match cursor {
                    Value::Object(map) => map
                        .entry(component.clone())
                        .or_insert_with(|| Value::Object(Props::new())),
                    Value::Array(arr) => {
                        let index = parse_index(path, component)?;
                        arr.get_mut(index)
                            .ok_or_else(|| path.unreachable(component, "array index out of bounds"))?
                    }
                    _ => {
                        return Err(
                            path.unreachable(component, "cannot navigate through a non-container")
                        )
                    }
                };
            }
            cursor
        }
    };

    match container {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(arr) => {
            let index = parse_index(path, last)?;
            #[allow(clippy::comparison_chain)]
            if index < arr.len() {
                arr[index] = value;
            } else if index == arr.len() {
                arr.push(value);
            } else {
                return Err(path.unreachable(last, "array index out of bounds"));
            }
            Ok(())
        }
        _ => Err(path.unreachable(last, "cannot set a child on a non-container")),
    }
}

/// Remove the value at `path`, returning it if it existed.
pub fn remove(props: &mut Props, path: &PropPath) -> Result<Option<Value>, PropPathError> {
    let (prefix, last) = path.split_last()?;
    let container = match prefix.split_first() {
        None => return Ok(props.remove(last)),
        Some((first, rest)) => {
            let Some(mut cursor) = props.get_mut(first) else {
                return Ok(None);
            };
            for component in rest {
                let next = match cursor {
                    Value::Object(map) => map.get_mut(component),
                    Value::Array(arr) => arr.get_mut(parse_index(path, component)?),
                    _ => None,
                };
                match next {
                    Some(next) => cursor = next,
                    None => return Ok(None),
                }
            }
            cursor
        }
    };

    match container {
        Value::Object(map) => Ok(map.remove(last)),
        Value::Array(arr) => {
            let index = parse_index(path, last)?;
            if index < arr.len() {
                Ok(Some(arr.remove(index)))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

fn parse_index(path: &PropPath, component: &str) -> Result<usize, PropPathError> {
    component
        .parse::<usize>()
        .map_err(|e| path.unreachable(component, format!("expected an array index: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("test props must be an object"),
        }
    }

    fn path(s: &str) -> PropPath {
        PropPath::parse(s).unwrap()
    }

    #[test]
    fn parse_normalizes_separators() {
        assert_eq!(path("a/b/c"), path("a.b.c"));
        assert_eq!(path("/a//b/"), path("a.b"));
        assert_eq!(PropPath::parse(""), Err(PropPathError::Empty));
        assert_eq!(PropPath::parse("./"), Err(PropPathError::Empty));
    }

    #[test]
    fn get_nested_value() {
        let p = props(json!({"label": {"text": "Hi", "sizes": [10, 12]}}));
        assert_eq!(get(&p, &path("label.text")), Some(&json!("Hi")));
        assert_eq!(get(&p, &path("label.sizes.1")), Some(&json!(12)));
        assert_eq!(get(&p, &path("label.sizes.7")), None);
        assert_eq!(get(&p, &path("label.text.deeper")), None);
        assert_eq!(get(&p, &path("missing")), None);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut p = Props::new();
        set(&mut p, &path("a.b.c"), json!(1)).unwrap();
        assert_eq!(Value::Object(p), json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn set_into_array() {
        let mut p = props(json!({"items": ["x", "y"]}));
        set(&mut p, &path("items.1"), json!("Y")).unwrap();
        set(&mut p, &path("items.2"), json!("z")).unwrap();
        assert_eq!(Value::Object(p.clone()), json!({"items": ["x", "Y", "z"]}));

        let err = set(&mut p, &path("items.9"), json!("w")).unwrap_err();
        assert!(matches!(err, PropPathError::Unreachable { .. }));
    }

    #[test]
    fn set_through_scalar_fails() {
        let mut p = props(json!({"text": "Hi"}));
        let err = set(&mut p, &path("text.size"), json!(3)).unwrap_err();
        assert!(err.to_string().contains("text.size"));
    }

    #[test]
    fn remove_returns_old_value() {
        let mut p = props(json!({"a": {"b": 1, "c": 2}, "list": [1, 2, 3]}));
        assert_eq!(remove(&mut p, &path("a.b")).unwrap(), Some(json!(1)));
        assert_eq!(remove(&mut p, &path("list.0")).unwrap(), Some(json!(1)));
        assert_eq!(remove(&mut p, &path("nope.x")).unwrap(), None);
        assert_eq!(Value::Object(p), json!({"a": {"c": 2}, "list": [2, 3]}));
    }

    #[test]
    fn serde_as_string() {
        let p: PropPath = serde_json::from_value(json!("style/margin")).unwrap();
        assert_eq!(p, path("style.margin"));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("style.margin"));
    }
}
