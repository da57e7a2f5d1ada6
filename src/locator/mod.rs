//! Locators
//!
//! A locator is a structured identifier string naming a resource. This module
//! turns locators into attribute sets and tests them against grants.
//!
//! - `decode` is permissive: an unrecognized string yields an empty set
//! - `decode_strict` reports the same cases as errors
//! - `fill_requested` reads the `//host/container?query` form into a request

mod decoder;
mod fill;
mod matcher;

pub use decoder::{decode, decode_strict, LOCATOR_SCHEME};
pub use fill::fill_requested;
pub use matcher::locator_authorizes;
