//! Attribute sets
//!
//! Requests and grants are both described as flat maps from attribute name
//! to string value. A value of [`WILDCARD`] on the granting side means "any
//! non-empty value"; an absent key means the side does not constrain that
//! field; an empty string is an ordinary literal.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The wildcard sentinel, compared literally
pub const WILDCARD: &str = "*";

/// Canonical attribute names
///
/// Any other name is still a valid attribute; these are the ones the
/// locator grammar and the record stores know about.
pub mod names {
    pub const SCHEME: &str = "scheme";
    pub const ACTION: &str = "action";
    pub const HOST: &str = "host";
    pub const SOURCE_ORGANIZATION: &str = "source_organization";
    pub const SOURCE_REPOSITORY: &str = "source_repository";
    pub const UMBRELLA_ORGANIZATION: &str = "umbrella_organization";
    pub const UMBRELLA_REPOSITORY: &str = "umbrella_repository";
    pub const CONTAINER_NAME: &str = "container_name";
    pub const TARGET: &str = "target";
    pub const ENVIRONMENT_NAME: &str = "environment_name";
    pub const ENVIRONMENT_STAGE: &str = "environment_stage";

    /// All canonical names, in schema order
    pub const CANONICAL: [&str; 11] = [
        SCHEME,
        ACTION,
        HOST,
        SOURCE_ORGANIZATION,
        SOURCE_REPOSITORY,
        UMBRELLA_ORGANIZATION,
        UMBRELLA_REPOSITORY,
        CONTAINER_NAME,
        TARGET,
        ENVIRONMENT_NAME,
        ENVIRONMENT_STAGE,
    ];
}

/// Mapping from attribute name to value
///
/// Keys are unique and kept sorted, so two sets with the same content compare
/// and serialize identically regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, String>);

impl AttributeSet {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an attribute, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Set an attribute only if it is not already present
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether the attribute is present and holds the wildcard sentinel
    pub fn is_wildcard(&self, name: &str) -> bool {
        self.get(name) == Some(WILDCARD)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy every attribute of `other` into this set, overwriting on conflict
    pub fn extend_from(&mut self, other: &AttributeSet) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for AttributeSet {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for AttributeSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl IntoIterator for AttributeSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = AttributeSet::new().with("target", "cmd").with("host", "h");
        let b = AttributeSet::new().with("host", "h").with("target", "cmd");
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_string_is_present() {
        let set = AttributeSet::from([("target", "")]);
        assert!(set.contains("target"));
        assert_eq!(set.get("target"), Some(""));
        assert!(!set.is_wildcard("target"));
        assert_eq!(set.get("host"), None);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut set = AttributeSet::from([("target", "cmd")]);
        set.insert_if_absent("target", "all_up");
        set.insert_if_absent("host", "h");
        assert_eq!(set.get("target"), Some("cmd"));
        assert_eq!(set.get("host"), Some("h"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let set = AttributeSet::from([("target", "*"), ("action", "pull")]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"action":"pull","target":"*"}"#);

        let back: AttributeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert!(back.is_wildcard("target"));
    }

    #[test]
    fn test_display() {
        let set = AttributeSet::from([("target", "cmd"), ("action", "pull")]);
        assert_eq!(set.to_string(), r#"{action: "pull", target: "cmd"}"#);
    }
}
