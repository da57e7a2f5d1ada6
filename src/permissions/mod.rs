//! Permission matching
//!
//! Decides whether a requested attribute set is authorized by a granted one.
//!
//! - **Field rule**: a granted `*` accepts any non-empty requested value,
//!   anything else needs byte-exact equality, an absent granted field is not
//!   evaluated.
//! - **Resource pass**: the field rule over every attribute the grant sets.
//! - **Relationship pass**: over declared attributes, where either side may
//!   relax a field by declaring `*`, even one the other side left undeclared.
//!
//! ## Example
//!
//! ```rust
//! use sync_grants::attributes::AttributeSet;
//! use sync_grants::permissions::{matches, relationship_matches};
//!
//! let requested = AttributeSet::from([("target", "cmd")]);
//! assert!(matches(&requested, &AttributeSet::from([("target", "*")])));
//! assert!(!matches(&requested, &AttributeSet::from([("target", "all_up")])));
//!
//! assert!(relationship_matches(
//!     &AttributeSet::from([("scheme", "*")]),
//!     &AttributeSet::from([("scheme", "image")]),
//! ));
//! ```

mod field;
mod matcher;

pub use field::{field_matches, relationship_field_matches, Admits, Pass};
pub use matcher::{authorized, first_mismatch, matches, relationship_matches};
