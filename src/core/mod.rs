//! Core types shared across the crate
//!
//! - `GrantError` / `GrantResult` - Error types

pub mod error;

pub use error::{GrantError, GrantResult};
