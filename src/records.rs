//! Requested and granted records
//!
//! Both record kinds pair a resource attribute set with a declared
//! relationship attribute set. They are plain immutable values; stores key
//! them by a hash of their full content.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::attributes::AttributeSet;
use crate::core::GrantResult;

/// Prefix for the requester's declared attributes in the flat form
pub const REQUEST_PREFIX: &str = "request_";

/// Prefix for the grantor's declared attributes in the flat form
pub const GRANT_PREFIX: &str = "grant_";

const DESCRIPTION: &str = "description";
const DESTINATION_PATH: &str = "destination_path";
const EXPOSE_PATH: &str = "expose_path";

/// A request to act on a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requested {
    /// What is being acted upon
    #[serde(default)]
    pub resource: AttributeSet,

    /// The relationship the requester expects to be granted
    #[serde(default)]
    pub declared: AttributeSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the requester wants the resource placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
}

/// A grant allowing access to a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Granted {
    /// What may be acted upon
    #[serde(default)]
    pub resource: AttributeSet,

    /// The relationship the grantor is willing to allow
    #[serde(default)]
    pub declared: AttributeSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the grantor exposes the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expose_path: Option<String>,
}

impl Requested {
    /// Create a request for a resource with no declared relationship
    pub fn new(resource: AttributeSet) -> Self {
        Self {
            resource,
            ..Self::default()
        }
    }

    pub fn with_declared(mut self, declared: AttributeSet) -> Self {
        self.declared = declared;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_destination_path(mut self, path: impl Into<String>) -> Self {
        self.destination_path = Some(path.into());
        self
    }

    /// Build from a single map where declared attributes carry `request_`
    ///
    /// Empty values count as absent.
    pub fn from_flat(flat: &AttributeSet) -> Self {
        let mut parts = split_flat(flat, REQUEST_PREFIX);
        Self {
            description: parts.take_meta(DESCRIPTION),
            destination_path: parts.take_meta(DESTINATION_PATH),
            resource: parts.resource,
            declared: parts.declared,
        }
    }

    /// Inverse of [`Requested::from_flat`]
    pub fn to_flat(&self) -> AttributeSet {
        join_flat(
            &self.resource,
            &self.declared,
            REQUEST_PREFIX,
            [
                (DESCRIPTION, self.description.as_deref()),
                (DESTINATION_PATH, self.destination_path.as_deref()),
            ],
        )
    }

    /// Hex SHA-256 of the record's canonical JSON
    pub fn content_key(&self) -> GrantResult<String> {
        content_key(self)
    }
}

impl Granted {
    /// Create a grant for a resource with no declared relationship
    pub fn new(resource: AttributeSet) -> Self {
        Self {
            resource,
            ..Self::default()
        }
    }

    pub fn with_declared(mut self, declared: AttributeSet) -> Self {
        self.declared = declared;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_expose_path(mut self, path: impl Into<String>) -> Self {
        self.expose_path = Some(path.into());
        self
    }

    /// Build from a single map where declared attributes carry `grant_`
    ///
    /// Empty values count as absent.
    pub fn from_flat(flat: &AttributeSet) -> Self {
        let mut parts = split_flat(flat, GRANT_PREFIX);
        Self {
            description: parts.take_meta(DESCRIPTION),
            expose_path: parts.take_meta(EXPOSE_PATH),
            resource: parts.resource,
            declared: parts.declared,
        }
    }

    /// Inverse of [`Granted::from_flat`]
    pub fn to_flat(&self) -> AttributeSet {
        join_flat(
            &self.resource,
            &self.declared,
            GRANT_PREFIX,
            [
                (DESCRIPTION, self.description.as_deref()),
                (EXPOSE_PATH, self.expose_path.as_deref()),
            ],
        )
    }

    /// Hex SHA-256 of the record's canonical JSON
    pub fn content_key(&self) -> GrantResult<String> {
        content_key(self)
    }
}

fn content_key<T: Serialize>(record: &T) -> GrantResult<String> {
    // attribute sets are sorted maps, so the JSON is canonical
    let bytes = serde_json::to_vec(record)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

struct FlatParts {
    resource: AttributeSet,
    declared: AttributeSet,
}

impl FlatParts {
    fn take_meta(&mut self, name: &str) -> Option<String> {
        self.resource.remove(name)
    }
}

fn split_flat(flat: &AttributeSet, prefix: &str) -> FlatParts {
    let mut parts = FlatParts {
        resource: AttributeSet::new(),
        declared: AttributeSet::new(),
    };
    for (name, value) in flat.iter().filter(|(_, value)| !value.is_empty()) {
        match name.strip_prefix(prefix) {
            Some(declared) if !declared.is_empty() => {
                parts.declared.insert(declared, value);
            }
            _ => {
                parts.resource.insert(name, value);
            }
        }
    }
    parts
}

fn join_flat<const N: usize>(
    resource: &AttributeSet,
    declared: &AttributeSet,
    prefix: &str,
    meta: [(&str, Option<&str>); N],
) -> AttributeSet {
    let mut flat = resource.clone();
    for (name, value) in declared.iter() {
        flat.insert(format!("{prefix}{name}"), value);
    }
    for (name, value) in meta {
        if let Some(value) = value {
            flat.insert(name, value);
        }
    }
    flat
}
