//! In-memory checkpoint store - the reference [`CheckpointStore`] backend.
//!
//! Stores the latest [`Checkpoint`] per thread in an
//! `Arc<RwLock<HashMap<ThreadId, Checkpoint>>>`. Cloning the store shares
//! the underlying map, so a store handed to several compiled graphs behaves
//! like one logical store.
//!
//! Suitable for development, tests, and single-process deployments; all data
//! is lost on restart. Checkpoints are never evicted automatically: a
//! suspended thread stays resumable until [`delete`](CheckpointStore::delete)
//! or [`clear`](InMemoryCheckpointStore::clear) is called.
//!
//! # Example
//!
//! ```rust
//! use agentgraph_checkpoint::{CheckpointStore, ExecutionState, InMemoryCheckpointStore};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryCheckpointStore::new();
//!
//! store
//!     .save("thread-1", ExecutionState::new(json!({"messages": []}), "chatbot"))
//!     .await?;
//!
//! let loaded = store.load("thread-1").await?.expect("saved above");
//! assert_eq!(loaded.next_node, "chatbot");
//! # Ok(())
//! # }
//! ```

use crate::checkpoint::{Checkpoint, ExecutionState, ThreadId};
use crate::error::{CheckpointError, Result};
use crate::traits::CheckpointStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Storage = Arc<RwLock<HashMap<ThreadId, Checkpoint>>>;

/// Thread-safe in-memory checkpoint storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckpointStore {
    storage: Storage,
}

impl InMemoryCheckpointStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads currently holding a snapshot.
    pub async fn thread_count(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Drop every snapshot. Useful between tests.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    /// Latest full checkpoint (including id and timestamp) for a thread.
    pub async fn checkpoint(&self, thread_id: &str) -> Option<Checkpoint> {
        self.storage.read().await.get(thread_id).cloned()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save(&self, thread_id: &str, state: ExecutionState) -> Result<()> {
        if thread_id.is_empty() {
            return Err(CheckpointError::Invalid(
                "thread_id must not be empty".to_string(),
            ));
        }
        let checkpoint = Checkpoint::new(thread_id, state);
        self.storage
            .write()
            .await
            .insert(thread_id.to_string(), checkpoint);
        Ok(())
    }

    async fn load(&self, thread_id: &str) -> Result<Option<ExecutionState>> {
        Ok(self
            .storage
            .read()
            .await
            .get(thread_id)
            .map(|cp| cp.state.clone()))
    }

    async fn delete(&self, thread_id: &str) -> Result<()> {
        self.storage.write().await.remove(thread_id);
        Ok(())
    }

    async fn list_threads(&self) -> Result<Vec<ThreadId>> {
        Ok(self.storage.read().await.keys().cloned().collect())
    }
}
