//! Normalized hierarchical keys.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A normalized, case-sensitive, `/`-delimited key.
///
/// Keys address nodes in the tree. Normalization drops empty components, so
/// leading and trailing slashes are insignificant: `"/a/b"`, `"a/b"` and
/// `"a/b/"` all address the same node. The empty string and `"/"` both
/// denote the root directory.
///
/// Components are opaque strings; no character validation is performed
/// beyond the `/` separator.
///
/// # Examples
///
/// ```rust
/// use treekv_core::Key;
///
/// let key = Key::parse("/users/alice/");
/// assert_eq!(key.to_string(), "users/alice");
/// assert_eq!(key, Key::parse("users/alice"));
/// assert!(Key::parse("/").is_root());
/// ```
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    pub components: Vec<String>,
}

#[macro_export]
macro_rules! key {
    ($key_string:expr) => {
        $crate::Key::parse($key_string)
    };
    ($($args:tt),*) => {
        compile_error!("Expected 1 argument, got something else")
    };
}

impl Key {
    /// Parse a key string, dropping empty components.
    pub fn parse(s: &str) -> Self {
        Key {
            components: s
                .split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// The root key (no components).
    pub fn root() -> Self {
        Key::default()
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Append all components of `other`.
    pub fn join(&self, other: &Key) -> Key {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Key { components }
    }

    /// Append a single component.
    pub fn child(&self, name: &str) -> Key {
        let mut components = self.components.clone();
        components.push(name.to_owned());
        Key { components }
    }

    /// The key with the last component removed. The root is its own parent.
    pub fn parent(&self) -> Key {
        let mut components = self.components.clone();
        components.pop();
        Key { components }
    }

    /// The last component, if any.
    pub fn last(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// The key formed by the first `n` components.
    pub fn prefix(&self, n: usize) -> Key {
        Key {
            components: self.components[..n.min(self.components.len())].to_vec(),
        }
    }

    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.components.len() >= prefix.components.len()
            && self.components[..prefix.components.len()] == prefix.components[..]
    }

    /// Remove a leading `prefix`, if present; otherwise the key is returned
    /// unchanged.
    pub fn strip_prefix(&self, prefix: &Key) -> Key {
        if self.starts_with(prefix) {
            Key {
                components: self.components[prefix.components.len()..].to_vec(),
            }
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::parse(s)
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Key, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(Key::parse(&s))
    }
}
