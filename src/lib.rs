//! Wildcard grant matching for cross-repository operations
//!
//! Answers "may this requester act on this resource under this relationship?"
//! by comparing a requested attribute set with granted ones.

pub mod attributes;
pub mod core;
pub mod locator;
pub mod permissions;
pub mod records;
pub mod resolver;
pub mod store;

// Optional components
pub mod config;
pub mod logging;
pub mod pushdown;

pub use crate::attributes::{AttributeSet, WILDCARD};
pub use crate::core::{GrantError, GrantResult};
pub use crate::records::{Granted, Requested};
