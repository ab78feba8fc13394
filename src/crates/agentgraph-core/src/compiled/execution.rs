//! The run loop: sequential node execution with checkpointing and
//! suspension.
//!
//! # Algorithm
//!
//! 1. Resolve the starting [`ExecutionState`]: load the thread's checkpoint
//!    and merge the new input, or build a fresh state from schema defaults.
//! 2. Loop: if the current node is END, persist and return
//!    [`RunOutcome::Complete`]. Otherwise run the node function on the
//!    current state.
//! 3. An interrupt persists the state (with its pending payload) and returns
//!    [`RunOutcome::Interrupted`]. Any other node error aborts the step
//!    *without* writing a checkpoint - the previous step's snapshot stays
//!    valid and the same invocation can be retried.
//! 4. Merge the partial update through the schema, route to the next node
//!    (static edge, or router key resolved through the branch table), then
//!    persist and continue.
//!
//! # Guarantees
//!
//! - **Ordering**: node executions for one thread are strictly sequential;
//!   a per-thread lock serializes whole runs against the same thread id.
//! - **Determinism**: identical input and identical collaborator outputs
//!   reproduce the same node sequence.
//! - **Checkpoint integrity**: configuration and state-invariant failures
//!   never leave a partial write behind; checkpoints are written only after
//!   a node's merge and routing both succeed (or at a suspension point).

use super::{CompiledGraph, RunConfig, RunOutcome};
use crate::error::{GraphError, NodeError, Result};
use crate::graph::{Edge, END, START};
use crate::interrupt::NodeContext;
use agentgraph_checkpoint::{ExecutionState, PendingInterrupt};
use serde_json::Value;

impl CompiledGraph {
    /// Run to completion (or first suspension) with default configuration.
    pub async fn invoke(&self, input: Value) -> Result<RunOutcome> {
        self.invoke_with_config(input, RunConfig::default()).await
    }

    /// Run with explicit configuration.
    ///
    /// With a `thread_id` and a checkpoint store, a prior thread is
    /// continued: its checkpointed values are loaded, the new input is
    /// merged on top, and the walk starts again from START's successor -
    /// this is how multi-turn conversations accumulate history. A suspended
    /// thread must be continued via [`resume`](Self::resume) instead.
    #[tracing::instrument(skip_all, fields(thread_id = config.thread_id.as_deref().unwrap_or("-")))]
    pub async fn invoke_with_config(&self, input: Value, config: RunConfig) -> Result<RunOutcome> {
        let _guard = match &config.thread_id {
            Some(thread_id) => Some(self.thread_locks.acquire(thread_id).await),
            None => None,
        };

        let state = self.load_or_init(&config, input).await?;
        self.run_loop(state, &config).await
    }

    /// Resume a suspended thread with the external answer it was waiting on.
    ///
    /// The interrupted node re-runs from the top; its `interrupt()` calls
    /// replay previously logged answers in order and the injected `value` is
    /// consumed by the call site that suspended. Execution then continues to
    /// completion or the next suspension.
    pub async fn resume(&self, thread_id: &str, value: Value) -> Result<RunOutcome> {
        self.resume_with_config(thread_id, value, RunConfig::thread(thread_id))
            .await
    }

    /// [`resume`](Self::resume) with an explicit configuration (e.g. a
    /// custom recursion limit). `config.thread_id` is overridden to
    /// `thread_id`.
    #[tracing::instrument(skip_all, fields(thread_id))]
    pub async fn resume_with_config(
        &self,
        thread_id: &str,
        value: Value,
        mut config: RunConfig,
    ) -> Result<RunOutcome> {
        config.thread_id = Some(thread_id.to_string());
        let _guard = self.thread_locks.acquire(thread_id).await;

        let store = self.checkpointer.as_ref().ok_or_else(|| {
            GraphError::configuration("resume requires a graph compiled with a checkpointer")
        })?;
        let mut state = store.load(thread_id).await?.ok_or_else(|| {
            GraphError::execution(format!("no checkpoint exists for thread '{thread_id}'"))
        })?;
        if state.pending_interrupt.is_none() {
            return Err(GraphError::execution(format!(
                "thread '{thread_id}' has no pending interrupt to resume"
            )));
        }

        state.resume_log.push(value);
        state.pending_interrupt = None;
        self.run_loop(state, &config).await
    }

    async fn load_or_init(&self, config: &RunConfig, input: Value) -> Result<ExecutionState> {
        if let (Some(store), Some(thread_id)) = (&self.checkpointer, &config.thread_id) {
            if let Some(mut state) = store.load(thread_id).await? {
                if state.pending_interrupt.is_some() {
                    return Err(GraphError::execution(format!(
                        "thread '{thread_id}' is suspended; continue it with resume()"
                    )));
                }
                state.resume_log.clear();
                if state.next_node == END {
                    // Prior run finished: merge the new input and walk again
                    // from START (multi-turn conversation).
                    tracing::debug!(step = state.step, "continuing thread with new input");
                    self.graph.schema.apply(&mut state.values, &input)?;
                    state.next_node = START.to_string();
                } else {
                    // Prior run aborted mid-walk (collaborator failure): the
                    // checkpoint already contains the merged input, so retry
                    // from the failed step without re-applying it.
                    tracing::debug!(
                        step = state.step,
                        next = %state.next_node,
                        "retrying thread from last checkpoint"
                    );
                }
                return Ok(state);
            }
        }
        let values = self.graph.schema.initial(&input)?;
        Ok(ExecutionState::new(values, START))
    }

    async fn run_loop(&self, mut state: ExecutionState, config: &RunConfig) -> Result<RunOutcome> {
        let mut executed: usize = 0;

        loop {
            let current = state.next_node.clone();

            if current == END {
                self.persist(config, &state).await?;
                tracing::info!(step = state.step, "run complete");
                return Ok(RunOutcome::Complete(state.values));
            }

            if current == START {
                state.next_node = self.route(START, &state.values)?;
                continue;
            }

            if executed >= config.recursion_limit {
                return Err(GraphError::execution(format!(
                    "recursion limit of {} node executions exceeded",
                    config.recursion_limit
                )));
            }

            let node = self.graph.node(&current).ok_or_else(|| {
                GraphError::configuration(format!("node '{current}' is not registered"))
            })?;

            let ctx = NodeContext::new(
                current.clone(),
                config.thread_id.clone(),
                state.step,
                state.resume_log.clone(),
            );

            tracing::debug!(node = %current, step = state.step, "executing node");
            let partial = match (node.executor)(ctx, state.values.clone()).await {
                Ok(partial) => partial,
                Err(NodeError::Interrupt { payload }) => {
                    return self.suspend(config, state, &current, payload).await;
                }
                Err(NodeError::Collaborator(message)) => {
                    return Err(GraphError::collaborator(current, message));
                }
                Err(NodeError::Configuration(message)) => {
                    return Err(GraphError::configuration(format!(
                        "node '{current}': {message}"
                    )));
                }
                Err(NodeError::StateInvariant(message)) => {
                    return Err(GraphError::StateInvariant(format!(
                        "node '{current}': {message}"
                    )));
                }
            };

            self.graph.schema.apply(&mut state.values, &partial)?;
            state.resume_log.clear();

            let next = self.route(&current, &state.values)?;
            tracing::debug!(node = %current, next = %next, "routed");

            state.next_node = next;
            state.step += 1;
            executed += 1;
            self.persist(config, &state).await?;
        }
    }

    /// Resolve the successor of `from` against the just-merged state.
    fn route(&self, from: &str, values: &Value) -> Result<String> {
        match self.graph.edge(from) {
            None => Err(GraphError::configuration(format!(
                "node '{from}' has no outgoing edge"
            ))),
            Some(Edge::Direct(to)) => Ok(to.clone()),
            Some(Edge::Conditional { router, branches }) => {
                let key = router(values);
                branches.get(&key).cloned().ok_or_else(|| {
                    GraphError::configuration(format!(
                        "router for '{from}' returned key '{key}' which is not in its branch table"
                    ))
                })
            }
        }
    }

    async fn suspend(
        &self,
        config: &RunConfig,
        mut state: ExecutionState,
        node: &str,
        payload: Value,
    ) -> Result<RunOutcome> {
        let (Some(store), Some(thread_id)) = (&self.checkpointer, &config.thread_id) else {
            return Err(GraphError::execution(format!(
                "node '{node}' interrupted, but interrupts require a checkpointer and a thread_id"
            )));
        };

        let pending = PendingInterrupt {
            node: node.to_string(),
            payload,
            interrupt_index: state.resume_log.len(),
        };
        state.next_node = node.to_string();
        state.pending_interrupt = Some(pending.clone());
        store.save(thread_id, state).await?;

        tracing::info!(node = %node, "run suspended awaiting resume");
        Ok(RunOutcome::Interrupted(pending))
    }

    async fn persist(&self, config: &RunConfig, state: &ExecutionState) -> Result<()> {
        if let (Some(store), Some(thread_id)) = (&self.checkpointer, &config.thread_id) {
            store.save(thread_id, state.clone()).await?;
        }
        Ok(())
    }
}
