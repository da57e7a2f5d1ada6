//! Record stores
//!
//! The matcher never owns records; it reads candidates from a store. A store
//! upserts records keyed by their content hash, so saving the same record
//! twice leaves one copy.
//!
//! - `MemoryStore`: in-process, insertion ordered
//! - `JsonLinesStore`: one JSON record per line, one file per record kind

mod jsonl;
mod memory;

pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::core::GrantResult;
use crate::records::{Granted, Requested};

/// Trait for record store implementations
///
/// A record saved before a read call must be visible to that read call. Read
/// failures are returned as errors, never as empty lists.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All granted records, each once
    async fn granted(&self) -> GrantResult<Vec<Granted>>;

    /// All requested records, each once
    async fn requested(&self) -> GrantResult<Vec<Requested>>;

    /// Upsert a granted record, returning its content key
    async fn save_granted(&self, granted: Granted) -> GrantResult<String>;

    /// Upsert a requested record, returning its content key
    async fn save_requested(&self, requested: Requested) -> GrantResult<String>;

    /// Store name for logging and debugging
    fn name(&self) -> &str;
}
