//! Dataset container
//!
//! A dataset is created once per add, immutable afterwards, and borrowed
//! read-only by the engine for the duration of one query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::DatasetKind;
use super::record::Record;

/// An identified, kind-tagged, ordered collection of records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    id: String,
    kind: DatasetKind,
    records: Vec<Record>,
    added_at: DateTime<Utc>,
}

impl Dataset {
    /// Creates a dataset stamped with the current time
    pub fn new(id: impl Into<String>, kind: DatasetKind, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            kind,
            records,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// True if every record is of the dataset's kind
    pub fn records_match_kind(&self) -> bool {
        self.records.iter().all(|record| record.kind() == self.kind)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id.clone(),
            kind: self.kind,
            num_rows: self.records.len(),
        }
    }
}

/// Listing entry for a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub kind: DatasetKind,
    #[serde(rename = "numRows")]
    pub num_rows: usize,
}

/// Returns true if `id` may name a dataset.
///
/// Ids are non-empty and not whitespace-only. They never contain an
/// underscore, since the underscore separates the id from the field name in
/// queries. An id also names the dataset's file, so path separators, `..`
/// and control characters are rejected.
pub fn is_valid_id(id: &str) -> bool {
    !id.trim().is_empty()
        && !id.contains(['_', '/', '\\'])
        && !id.contains("..")
        && !id.chars().any(char::is_control)
}
