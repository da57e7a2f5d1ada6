//! Locator decoding
//!
//! ```text
//! locator://<org>-<repo>_<env>-<stage>_...-<target>?<key>=<value>&...
//! ```
//!
//! The path is read positionally and best-effort; query pairs are decoded as
//! form-urlencoded data and always win over path-derived values.

use std::collections::HashSet;

use url::form_urlencoded;

use crate::attributes::{names, AttributeSet};
use crate::core::{GrantError, GrantResult};

/// Literal prefix every decodable locator starts with
pub const LOCATOR_SCHEME: &str = "locator://";

/// Decode a locator into an attribute set
///
/// Anything without the `locator://` prefix decodes to an empty set.
pub fn decode(locator: &str) -> AttributeSet {
    let Some(rest) = locator.strip_prefix(LOCATOR_SCHEME) else {
        return AttributeSet::new();
    };

    let (path, query) = split_query(rest);
    let mut attributes = decode_path(path);
    if let Some(query) = query {
        apply_query(&mut attributes, query);
    }
    attributes
}

/// Decode, rejecting unrecognized schemes and locators that carry nothing
pub fn decode_strict(locator: &str) -> GrantResult<AttributeSet> {
    if !locator.starts_with(LOCATOR_SCHEME) {
        return Err(GrantError::invalid_locator(format!(
            "expected {LOCATOR_SCHEME} prefix: {locator:?}"
        )));
    }

    let attributes = decode(locator);
    if attributes.is_empty() {
        return Err(GrantError::invalid_locator(format!(
            "no attributes in {locator:?}"
        )));
    }
    Ok(attributes)
}

/// Split on the first `?`
pub(crate) fn split_query(rest: &str) -> (&str, Option<&str>) {
    match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    }
}

/// Overlay query pairs onto `attributes`
///
/// The first occurrence of a repeated key is the one that counts.
pub(crate) fn apply_query(attributes: &mut AttributeSet, query: &str) {
    let mut seen = HashSet::new();
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }
        attributes.insert(name.into_owned(), value.into_owned());
    }
}

fn decode_path(path: &str) -> AttributeSet {
    let mut attributes = AttributeSet::new();
    let mut segments = path.splitn(3, '_');

    if let Some(umbrella) = segments.next() {
        let mut tokens = umbrella.split('-');
        set_token(&mut attributes, names::UMBRELLA_ORGANIZATION, tokens.next());
        set_token(&mut attributes, names::UMBRELLA_REPOSITORY, tokens.next());
    }

    if let Some(environment) = segments.next() {
        let (name, stage) = match environment.split_once('-') {
            Some((name, stage)) => (name, Some(stage)),
            None => (environment, None),
        };
        set_token(&mut attributes, names::ENVIRONMENT_NAME, Some(name));
        set_token(&mut attributes, names::ENVIRONMENT_STAGE, stage);
    }

    if let Some(tail) = segments.next() {
        set_token(&mut attributes, names::TARGET, tail.rsplit('-').next());
    }

    attributes
}

fn set_token(attributes: &mut AttributeSet, name: &str, token: Option<&str>) {
    // an empty token leaves the attribute absent, not empty
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        attributes.insert(name, token);
    }
}
