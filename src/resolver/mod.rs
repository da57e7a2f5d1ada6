//! Batch resolution of requests against grants
//!
//! - Free functions evaluate lists against in-hand candidates (iterators or
//!   streams)
//! - `GrantResolver` fetches candidates from a [`RecordStore`](crate::store::RecordStore)

mod batch;
mod service;

pub use batch::{
    filter_matching_requests, resolve_grants_for, resolve_grants_from_stream,
    resolve_requests_for, resolve_requests_from_stream,
};
pub use service::GrantResolver;
