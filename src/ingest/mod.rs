//! Ingestion subsystem for insightdb
//!
//! Builds datasets from raw uploaded bytes. The query engine never sees
//! archives or partially populated rows, only finished records.
//!
//! Uploads are zip archives (tar is also accepted). Sections come from JSON
//! course files under `courses/`; rooms come from the `index.htm` building
//! table and the linked building pages.
//!
//! # Design Principles
//!
//! - Row defects are local: a bad row is dropped, the load continues
//! - Container defects are fatal: a broken archive fails the whole add
//! - A dataset with zero valid rows is never created

mod archive;
mod errors;
mod rooms;
mod sections;

#[cfg(test)]
pub(crate) mod fixtures;

pub use archive::ArchiveFiles;
pub use errors::{IngestError, IngestResult};
pub use rooms::{parse_rooms, BUILDINGS_DIR, INDEX_FILE};
pub use sections::{parse_course_file, parse_sections, OVERALL_YEAR};

use crate::dataset::{Dataset, DatasetKind, Record};

/// Builds a dataset of `kind` named `id` from raw `content`
pub fn build_dataset(id: &str, kind: DatasetKind, content: &[u8]) -> IngestResult<Dataset> {
    let records: Vec<Record> = match kind {
        DatasetKind::Sections => parse_sections(content)?
            .into_iter()
            .map(Record::from)
            .collect(),
        DatasetKind::Rooms => parse_rooms(content)?.into_iter().map(Record::from).collect(),
    };
    Ok(Dataset::new(id, kind, records))
}
