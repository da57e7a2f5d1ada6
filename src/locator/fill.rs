//! Filling a request from a host-style locator
//!
//! ```text
//! //<host>/<container path>?<key>=<value>&...
//! ```
//!
//! The locator describes the resource side of a request; whatever the caller
//! already declared about the relationship is left alone.

use crate::attributes::names;
use crate::core::{GrantError, GrantResult};
use crate::records::Requested;

use super::decoder::{apply_query, split_query, LOCATOR_SCHEME};

const NETWORK_PATH_PREFIX: &str = "//";

/// Overlay the resource attributes carried by `locator` onto `requested`
///
/// Sets `host` from the first path segment and `container_name` from the rest
/// of the path, then applies every query pair. Source organization and
/// repository default to the umbrella ones.
///
/// A `locator://` prefix is accepted too, but its path is not decoded
/// positionally as [`decode`](super::decode) does: the whole first segment
/// becomes `host`, and only the query contributes the named attributes.
pub fn fill_requested(locator: &str, requested: Requested) -> GrantResult<Requested> {
    let rest = locator
        .strip_prefix(LOCATOR_SCHEME)
        .or_else(|| locator.strip_prefix(NETWORK_PATH_PREFIX))
        .ok_or_else(|| GrantError::invalid_locator(format!("expected //host form: {locator:?}")))?;

    let (path, query) = split_query(rest);
    let (host, container) = path.split_once('/').unwrap_or((path, ""));
    if host.is_empty() {
        return Err(GrantError::invalid_locator(format!("missing host: {locator:?}")));
    }

    let mut requested = requested;
    let resource = &mut requested.resource;
    resource.insert(names::HOST, host);
    if !container.is_empty() {
        resource.insert(names::CONTAINER_NAME, container);
    }
    if let Some(query) = query {
        apply_query(resource, query);
    }

    for (umbrella, source) in [
        (names::UMBRELLA_ORGANIZATION, names::SOURCE_ORGANIZATION),
        (names::UMBRELLA_REPOSITORY, names::SOURCE_REPOSITORY),
    ] {
        if let Some(value) = resource.get(umbrella).map(str::to_owned) {
            resource.insert_if_absent(source, value);
        }
    }

    tracing::debug!("Filled request from locator: {}", requested.resource);
    Ok(requested)
}
