//! # agentgraph-checkpoint - State Persistence for Graph Execution
//!
//! **Trait-based checkpoint abstractions and an in-memory reference
//! implementation** for persisting and restoring the execution state of a
//! conversation thread. Checkpoints are what make a graph run resumable:
//! after every successfully completed step the executor snapshots the live
//! state, and a suspended (human-in-the-loop) thread can be picked up again
//! at any later time; there is no expiry enforced here.
//!
//! ## Core Concepts
//!
//! ### ExecutionState
//!
//! [`ExecutionState`] is the unit of persistence: the JSON state values, the
//! identifier of the node to run next, an optional [`PendingInterrupt`]
//! describing what the thread is waiting on, and the ordered resume log that
//! replays answers into a re-run node.
//!
//! ### CheckpointStore
//!
//! The [`CheckpointStore`] trait is the persistence seam:
//!
//! - **`save()`** - persist the latest state for a thread (overwrites)
//! - **`load()`** - fetch the latest state, or `None` for a fresh thread
//! - **`delete()`** - explicit eviction (the store never evicts on its own)
//!
//! [`InMemoryCheckpointStore`] is the reference implementation. Durable
//! backends (SQLite, Postgres, Redis, ...) implement the same trait
//! externally; application code does not change:
//!
//! ```rust,ignore
//! // Development
//! let store = InMemoryCheckpointStore::new();
//!
//! // Production
//! let store = PostgresCheckpointStore::connect("postgres://...").await?;
//!
//! // Either way:
//! let compiled = graph.compile_with_checkpointer(Arc::new(store))?;
//! ```
//!
//! ### Serialization
//!
//! Stores that persist bytes rather than structured rows can use the
//! [`SerializerProtocol`] with the provided [`JsonSerializer`] (readable) or
//! [`BincodeSerializer`] (compact) implementations.
//!
//! ## Concurrency
//!
//! A checkpoint read-modify-write for one thread is a critical section. The
//! executor in `agentgraph-core` serializes runs per thread id; the store
//! itself only guarantees that individual `save`/`load` calls are atomic.
//! Different thread ids are fully independent.
//!
//! ## See Also
//!
//! - `agentgraph-core` - the graph executor that drives this crate
//! - [`ExecutionState`] - the persisted snapshot
//! - [`InMemoryCheckpointStore`] - reference backend

pub mod checkpoint;
pub mod error;
pub mod memory;
pub mod serializer;
pub mod traits;

pub use checkpoint::{Checkpoint, ExecutionState, PendingInterrupt, ThreadId};
pub use error::{CheckpointError, Result};
pub use memory::InMemoryCheckpointStore;
pub use serializer::{BincodeSerializer, JsonSerializer, SerializerProtocol};
pub use traits::CheckpointStore;
