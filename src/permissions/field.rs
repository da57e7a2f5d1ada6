//! Per-field matching rule
//!
//! One requested value against one granted value. Everything else in the
//! crate (the set-level passes, SQL pushdown) is built on [`Admits`], so the
//! wildcard rules live in exactly one place.

use crate::attributes::WILDCARD;

/// Which comparison a field takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// What is being acted upon; only the grantor may relax a field
    Resource,
    /// The declared trust relationship; either side may relax a field
    Relationship,
}

/// The set of granted values that authorize a given requested value
///
/// A granted field that is absent is never evaluated, so absence is always
/// admitted and is not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admits<'a> {
    /// Every granted value
    Any,
    /// No granted value at all
    Nothing,
    /// Only the wildcard
    Wildcard,
    /// Only this literal
    Exact(&'a str),
    /// This literal or the wildcard
    ExactOrWildcard(&'a str),
}

impl<'a> Admits<'a> {
    /// Derive the admitted granted values for a requested field value
    pub fn for_requested(requested: Option<&'a str>, pass: Pass) -> Self {
        match (requested, pass) {
            (Some(WILDCARD), Pass::Relationship) => Admits::Any,
            // a grantor may relax its own declared field whatever the requester said
            (None, Pass::Relationship) => Admits::Wildcard,
            (Some(value), Pass::Relationship) => Admits::ExactOrWildcard(value),
            (None, Pass::Resource) => Admits::Nothing,
            // the wildcard grants "anything", and an empty request is not anything
            (Some(""), Pass::Resource) => Admits::Exact(""),
            (Some(value), Pass::Resource) => Admits::ExactOrWildcard(value),
        }
    }

    /// Check a granted value against this set
    pub fn granted(&self, granted: &str) -> bool {
        match *self {
            Admits::Any => true,
            Admits::Nothing => false,
            Admits::Wildcard => granted == WILDCARD,
            Admits::Exact(value) => granted == value,
            Admits::ExactOrWildcard(value) => granted == value || granted == WILDCARD,
        }
    }
}

/// Resource field rule
///
/// A wildcard grant accepts any present, non-empty requested value; any other
/// grant requires byte-exact equality.
pub fn field_matches(requested: Option<&str>, granted: &str) -> bool {
    Admits::for_requested(requested, Pass::Resource).granted(granted)
}

/// Relationship field rule
///
/// Either side may relax a field: a requester declaring the wildcard accepts
/// whatever the grantor declared, and a grantor declaring the wildcard accepts
/// whatever the requester declared, including nothing or an empty value.
pub fn relationship_field_matches(requested: Option<&str>, granted: &str) -> bool {
    Admits::for_requested(requested, Pass::Relationship).granted(granted)
}
