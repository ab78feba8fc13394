//! Thread-state inspection and manual updates.
//!
//! Both operations require the graph to have been compiled with a
//! checkpointer; they read and write the same snapshots the run loop uses.

use super::CompiledGraph;
use crate::error::{GraphError, Result};
use agentgraph_checkpoint::CheckpointStore;
use serde_json::Value;
use std::sync::Arc;

impl CompiledGraph {
    /// Current state values for a thread, or `None` if it was never run.
    pub async fn get_state(&self, thread_id: &str) -> Result<Option<Value>> {
        let store = self.store()?;
        Ok(store.load(thread_id).await?.map(|state| state.values))
    }

    /// Apply a manual partial update to a thread's state, through the same
    /// schema merge the run loop uses. The thread must already have a
    /// checkpoint; a suspended thread keeps its pending interrupt.
    pub async fn update_state(&self, thread_id: &str, update: Value) -> Result<()> {
        let store = self.store()?;
        let _guard = self.thread_locks.acquire(thread_id).await;

        let mut state = store.load(thread_id).await?.ok_or_else(|| {
            GraphError::execution(format!("no checkpoint exists for thread '{thread_id}'"))
        })?;
        self.graph.schema.apply(&mut state.values, &update)?;
        store.save(thread_id, state).await?;
        Ok(())
    }

    fn store(&self) -> Result<&Arc<dyn CheckpointStore>> {
        self.checkpointer.as_ref().ok_or_else(|| {
            GraphError::configuration("this graph was compiled without a checkpointer")
        })
    }
}
