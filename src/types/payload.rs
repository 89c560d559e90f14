//! Encoded snapshot payload

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Encoded form of one snapshot, shared by every subscriber of a tick
///
/// Cloning is a reference-count bump, so one broadcast hands the same text
/// to every connection without copying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload(Arc<str>);

impl Payload {
    /// Borrow the payload text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the payload in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Payload {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
