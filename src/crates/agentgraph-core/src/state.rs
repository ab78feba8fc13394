//! State schema and merge policies.
//!
//! Graph state is a JSON object threaded through every node. Nodes return
//! *partial* updates - objects containing only the fields they changed - and
//! the schema decides how each field folds into the existing state:
//!
//! | Policy | Behavior | Use case |
//! |--------|----------|----------|
//! | [`MergePolicy::Overwrite`] | New value replaces old | Scalars, status fields |
//! | [`MergePolicy::Append`] | Elements concatenate, order kept, duplicates kept | Message history, logs |
//!
//! Every field a node writes must be declared up front; an update naming an
//! undeclared field is a state-invariant violation, not a silent insert. A
//! partial update that *omits* a field leaves the prior value untouched.
//!
//! # Example
//!
//! ```rust
//! use agentgraph_core::state::{MergePolicy, StateSchema};
//! use serde_json::json;
//!
//! let schema = StateSchema::new()
//!     .field("messages", MergePolicy::Append)
//!     .field("status", MergePolicy::Overwrite);
//!
//! let mut state = schema.initial(&json!({"status": "thinking"})).unwrap();
//! assert_eq!(state["messages"], json!([]));
//!
//! schema
//!     .apply(&mut state, &json!({"messages": ["hello"], "status": "done"}))
//!     .unwrap();
//! schema.apply(&mut state, &json!({"messages": ["world"]})).unwrap();
//!
//! assert_eq!(state["messages"], json!(["hello", "world"]));
//! assert_eq!(state["status"], "done"); // untouched by the second update
//! ```

use crate::error::{GraphError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// How a new value for a field folds into the existing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// New value replaces the old one.
    Overwrite,
    /// New elements concatenate onto the existing sequence. A non-array
    /// update appends as a single element. Never deduplicates.
    Append,
}

impl MergePolicy {
    /// Merge `update` into `current` under this policy.
    pub fn merge(&self, current: Option<&Value>, update: &Value) -> Result<Value> {
        match self {
            MergePolicy::Overwrite => Ok(update.clone()),
            MergePolicy::Append => match (current, update) {
                (Some(Value::Array(curr)), Value::Array(upd)) => {
                    let mut merged = curr.clone();
                    merged.extend_from_slice(upd);
                    Ok(Value::Array(merged))
                }
                (None | Some(Value::Null), Value::Array(upd)) => Ok(Value::Array(upd.clone())),
                (Some(Value::Array(curr)), single) => {
                    let mut merged = curr.clone();
                    merged.push(single.clone());
                    Ok(Value::Array(merged))
                }
                (None | Some(Value::Null), single) => Ok(Value::Array(vec![single.clone()])),
                (Some(other), _) => Err(GraphError::StateInvariant(format!(
                    "append policy requires an array, found {other}"
                ))),
            },
        }
    }

    /// Short policy name, for logging.
    pub fn name(&self) -> &str {
        match self {
            MergePolicy::Overwrite => "overwrite",
            MergePolicy::Append => "append",
        }
    }
}

/// Declared state shape: field name → merge policy.
#[derive(Debug, Clone, Default)]
pub struct StateSchema {
    fields: HashMap<String, MergePolicy>,
}

impl StateSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its merge policy.
    pub fn field(mut self, name: impl Into<String>, policy: MergePolicy) -> Self {
        self.fields.insert(name.into(), policy);
        self
    }

    /// The policy declared for `name`, if any.
    pub fn policy(&self, name: &str) -> Option<MergePolicy> {
        self.fields.get(name).copied()
    }

    /// Declared field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Build the starting state: append fields default to `[]`, then the
    /// input is merged through the declared policies.
    pub fn initial(&self, input: &Value) -> Result<Value> {
        let mut state = Value::Object(serde_json::Map::new());
        if let Some(obj) = state.as_object_mut() {
            for (name, policy) in &self.fields {
                if *policy == MergePolicy::Append {
                    obj.insert(name.clone(), Value::Array(Vec::new()));
                }
            }
        }
        self.apply(&mut state, input)?;
        Ok(state)
    }

    /// Merge a partial update into `state` field-by-field.
    ///
    /// Errors with [`GraphError::StateInvariant`] if the update is not an
    /// object or names a field absent from the schema.
    pub fn apply(&self, state: &mut Value, update: &Value) -> Result<()> {
        let update_obj = update.as_object().ok_or_else(|| {
            GraphError::StateInvariant(format!("state update must be an object, found {update}"))
        })?;
        let state_obj = state.as_object_mut().ok_or_else(|| {
            GraphError::StateInvariant("state must be an object".to_string())
        })?;

        for (name, new_value) in update_obj {
            let policy = self.fields.get(name).ok_or_else(|| {
                GraphError::StateInvariant(format!(
                    "field '{name}' is not declared in the state schema"
                ))
            })?;
            let merged = policy.merge(state_obj.get(name), new_value)?;
            state_obj.insert(name.clone(), merged);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn schema() -> StateSchema {
        StateSchema::new()
            .field("messages", MergePolicy::Append)
            .field("total", MergePolicy::Overwrite)
    }

    #[test]
    fn overwrite_replaces() {
        let mut state = json!({"messages": [], "total": 1.0});
        schema().apply(&mut state, &json!({"total": 2.5})).unwrap();
        assert_eq!(state["total"], json!(2.5));
    }

    #[test]
    fn omitted_field_is_untouched() {
        let mut state = json!({"messages": [], "total": 1.0});
        schema()
            .apply(&mut state, &json!({"messages": ["a"]}))
            .unwrap();
        assert_eq!(state["total"], json!(1.0));
    }

    #[test]
    fn append_preserves_order_and_duplicates() {
        let mut state = json!({"messages": ["a"]});
        schema()
            .apply(&mut state, &json!({"messages": ["b", "a"]}))
            .unwrap();
        assert_eq!(state["messages"], json!(["a", "b", "a"]));
    }

    #[test]
    fn append_single_value_wraps() {
        let mut state = json!({"messages": ["a"]});
        schema().apply(&mut state, &json!({"messages": "b"})).unwrap();
        assert_eq!(state["messages"], json!(["a", "b"]));
    }

    #[test]
    fn undeclared_field_is_an_invariant_error() {
        let mut state = json!({"messages": []});
        let err = schema()
            .apply(&mut state, &json!({"surprise": 1}))
            .unwrap_err();
        assert!(matches!(err, GraphError::StateInvariant(_)));
    }

    #[test]
    fn append_onto_non_array_is_an_invariant_error() {
        let schema = StateSchema::new().field("log", MergePolicy::Append);
        let mut state = json!({"log": "not-an-array"});
        let err = schema.apply(&mut state, &json!({"log": ["x"]})).unwrap_err();
        assert!(matches!(err, GraphError::StateInvariant(_)));
    }

    #[test]
    fn initial_defaults_append_fields_to_empty() {
        let state = schema().initial(&json!({"total": 3.0})).unwrap();
        assert_eq!(state["messages"], json!([]));
        assert_eq!(state["total"], json!(3.0));
    }

    proptest! {
        #[test]
        fn append_never_drops_or_reorders(
            existing in proptest::collection::vec(0i64..100, 0..8),
            update in proptest::collection::vec(0i64..100, 0..8),
        ) {
            let schema = StateSchema::new().field("log", MergePolicy::Append);
            let mut state = json!({"log": existing.clone()});
            schema.apply(&mut state, &json!({"log": update.clone()})).unwrap();

            let merged: Vec<i64> = state["log"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_i64().unwrap())
                .collect();
            let mut expected = existing;
            expected.extend(update);
            prop_assert_eq!(merged, expected);
        }
    }
}
