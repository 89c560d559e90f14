//! Snapshot encoders

use serde::Serialize;
use thiserror::Error;

use crate::types::Payload;

/// Errors raised while encoding a snapshot
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns a snapshot into a transmittable payload
///
/// Encoders are pure: no shared state and no I/O.
pub trait SnapshotEncoder<S>: Send + 'static {
    fn encode(&self, snapshot: &S) -> Result<Payload, EncodeError>;
}

/// Encodes any serializable snapshot as compact JSON text
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl<S: Serialize> SnapshotEncoder<S> for JsonEncoder {
    fn encode(&self, snapshot: &S) -> Result<Payload, EncodeError> {
        Ok(serde_json::to_string(snapshot)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackerSnapshot;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_encoder_emits_snapshot() {
        let snapshot = TrackerSnapshot {
            tick: 9,
            captured_at_ms: 1,
            users: Vec::new(),
        };
        let payload = JsonEncoder.encode(&snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["tick"], 9);
        assert_eq!(value["users"], serde_json::json!([]));
    }

    #[test]
    fn test_json_encoder_reports_failure() {
        // Non-string map keys cannot be represented in JSON
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        let err = JsonEncoder.encode(&map).unwrap_err();
        assert!(matches!(err, EncodeError::Json(_)));
    }
}
