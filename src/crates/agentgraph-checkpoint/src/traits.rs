//! The [`CheckpointStore`] trait - the persistence seam between the executor
//! and whatever backend holds thread state.
//!
//! The contract is deliberately small (spec-style `save`/`load`): the
//! executor snapshots after each completed step and on suspension, loads on
//! invocation of a known thread, and never relies on history. Backends may
//! keep history internally; only the latest snapshot is observable through
//! this trait.
//!
//! # Implementing a Backend
//!
//! ```rust,ignore
//! use agentgraph_checkpoint::{CheckpointStore, ExecutionState, Result};
//! use async_trait::async_trait;
//!
//! struct SqliteCheckpointStore { conn: rusqlite::Connection }
//!
//! #[async_trait]
//! impl CheckpointStore for SqliteCheckpointStore {
//!     async fn save(&self, thread_id: &str, state: ExecutionState) -> Result<()> {
//!         let blob = serde_json::to_string(&state)?;
//!         // UPSERT keyed by thread_id ...
//!         Ok(())
//!     }
//!
//!     async fn load(&self, thread_id: &str) -> Result<Option<ExecutionState>> {
//!         // SELECT latest row for thread_id ...
//!         Ok(None)
//!     }
//!
//!     async fn delete(&self, thread_id: &str) -> Result<()> { Ok(()) }
//!
//!     async fn list_threads(&self) -> Result<Vec<String>> { Ok(vec![]) }
//! }
//! ```
//!
//! # Durability Expectations
//!
//! A suspended thread's snapshot must remain loadable indefinitely: there is
//! no TTL in this contract. Eviction is always explicit (`delete`) or an
//! external policy layered on top of a backend.

use crate::checkpoint::{ExecutionState, ThreadId};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence backend for per-thread execution state.
///
/// Implementations must be `Send + Sync`; the executor shares one store
/// across all threads via `Arc<dyn CheckpointStore>`.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist the latest state for `thread_id`, replacing any prior
    /// snapshot for that thread.
    async fn save(&self, thread_id: &str, state: ExecutionState) -> Result<()>;

    /// Load the latest state for `thread_id`, or `None` if the thread has
    /// never been checkpointed.
    async fn load(&self, thread_id: &str) -> Result<Option<ExecutionState>>;

    /// Remove all state for `thread_id`. Removing an unknown thread is not
    /// an error.
    async fn delete(&self, thread_id: &str) -> Result<()>;

    /// List the thread ids currently holding a snapshot.
    async fn list_threads(&self) -> Result<Vec<ThreadId>>;
}
