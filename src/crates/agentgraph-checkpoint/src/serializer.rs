//! Serialization protocols for byte-oriented checkpoint backends.
//!
//! The in-memory store keeps structured values, but file/blob/KV backends
//! persist bytes. [`SerializerProtocol`] decouples the wire format from the
//! store: [`JsonSerializer`] is the default and handles [`ExecutionState`]
//! directly (JSON is self-describing, which `serde_json::Value` fields
//! require on decode); [`BincodeSerializer`] suits compact encoding of
//! concrete, fully-typed records.
//!
//! [`ExecutionState`]: crate::checkpoint::ExecutionState

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Encode/decode checkpoint data to and from bytes.
pub trait SerializerProtocol: Send + Sync {
    /// Serialize a value into bytes.
    fn dumps<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize a value from bytes.
    fn loads<T: for<'de> Deserialize<'de>>(&self, data: &[u8]) -> Result<T>;

    /// Short format name, for logging and store metadata.
    fn name(&self) -> &str;
}

/// Human-readable JSON encoding (default).
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer;

impl SerializerProtocol for JsonSerializer {
    fn dumps<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn loads<T: for<'de> Deserialize<'de>>(&self, data: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(data)?)
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Compact binary encoding. Not self-describing: decoding requires the exact
/// type that was encoded, so it is unsuitable for free-form
/// `serde_json::Value` payloads.
#[derive(Debug, Clone, Default)]
pub struct BincodeSerializer;

impl SerializerProtocol for BincodeSerializer {
    fn dumps<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn loads<T: for<'de> Deserialize<'de>>(&self, data: &[u8]) -> Result<T> {
        Ok(bincode::deserialize(data)?)
    }

    fn name(&self) -> &str {
        "bincode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{ExecutionState, PendingInterrupt};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct StoredRow {
        thread_id: String,
        step: u64,
    }

    #[test]
    fn json_round_trips_execution_state() {
        let serializer = JsonSerializer;
        let mut state = ExecutionState::new(
            json!({"messages": [{"role": "user", "content": "hi"}], "total": 91800.0}),
            "tools",
        );
        state.pending_interrupt = Some(PendingInterrupt {
            node: "tools".into(),
            payload: json!("Approve?"),
            interrupt_index: 1,
        });
        state.resume_log = vec![json!("yes")];
        state.step = 7;

        let bytes = serializer.dumps(&state).unwrap();
        let restored: ExecutionState = serializer.loads(&bytes).unwrap();
        assert_eq!(restored.next_node, "tools");
        assert_eq!(restored.step, 7);
        assert_eq!(restored.resume_log, vec![json!("yes")]);
        assert_eq!(restored.pending_interrupt.unwrap().interrupt_index, 1);
    }

    #[test]
    fn bincode_round_trips_typed_rows() {
        let serializer = BincodeSerializer;
        let row = StoredRow {
            thread_id: "t1".into(),
            step: 42,
        };
        let bytes = serializer.dumps(&row).unwrap();
        let restored: StoredRow = serializer.loads(&bytes).unwrap();
        assert_eq!(row, restored);
    }

    #[test]
    fn serializer_names() {
        assert_eq!(JsonSerializer.name(), "json");
        assert_eq!(BincodeSerializer.name(), "bincode");
    }
}
