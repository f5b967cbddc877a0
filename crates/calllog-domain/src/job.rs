//! Job module - identifies one batch run over a CSV file

use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Identifier for one batch run, printed in the sync log header and the report
///
/// Ids are UUIDv7, so logs written by successive runs sort in the order the
/// runs started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new id for a run starting now
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl Serialize for JobId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
