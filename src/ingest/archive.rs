//! Uploaded archive contents
//!
//! Zip (detected by its signature) and tar are both read into one flat view
//! of regular files keyed by normalized `/`-separated paths. A leading `./`
//! is dropped; entries that would escape the archive root are skipped.

use std::collections::BTreeSet;
use std::io::{Cursor, Read};
use std::path::{Component, Path};

use super::errors::{IngestError, IngestResult};

const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_ARCHIVE: &[u8] = b"PK\x05\x06";

/// Regular files of an archive, in archive order
#[derive(Debug, Default)]
pub struct ArchiveFiles {
    files: Vec<(String, Vec<u8>)>,
    dirs: BTreeSet<String>,
}

impl ArchiveFiles {
    /// Reads `content` as a zip archive, or as a tar archive otherwise
    pub fn read(content: &[u8]) -> IngestResult<Self> {
        if content.starts_with(ZIP_LOCAL_HEADER) || content.starts_with(ZIP_EMPTY_ARCHIVE) {
            Self::read_zip(content)
        } else {
            Self::read_tar(content)
        }
    }

    fn read_zip(content: &[u8]) -> IngestResult<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(content))
            .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;

        let mut files = ArchiveFiles::default();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;
            let Some(path) = entry.enclosed_name().and_then(normalize) else {
                continue;
            };

            if entry.is_dir() {
                files.insert_dir(&path);
                continue;
            }
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;
            files.insert_file(path, bytes);
        }
        Ok(files)
    }

    fn read_tar(content: &[u8]) -> IngestResult<Self> {
        let mut archive = tar::Archive::new(content);
        let entries = archive
            .entries()
            .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;

        let mut files = ArchiveFiles::default();
        for entry in entries {
            let mut entry = entry.map_err(|e| IngestError::InvalidArchive(e.to_string()))?;
            let raw_path = entry
                .path()
                .map_err(|e| IngestError::InvalidArchive(e.to_string()))?
                .into_owned();
            let Some(path) = normalize(&raw_path) else {
                continue;
            };

            let entry_type = entry.header().entry_type();
            if entry_type.is_dir() {
                files.insert_dir(&path);
                continue;
            }
            if !entry_type.is_file() {
                continue;
            }
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;
            files.insert_file(path, bytes);
        }
        Ok(files)
    }

    fn insert_file(&mut self, path: String, bytes: Vec<u8>) {
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.insert_dir(parent);
        }
        self.files.push((path, bytes));
    }

    fn insert_dir(&mut self, path: &str) {
        let mut prefix = String::new();
        for part in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            self.dirs.insert(prefix.clone());
        }
    }

    /// Contents of the file at `path`
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// True if `dir` exists, explicitly or as the parent of some file
    pub fn has_dir(&self, dir: &str) -> bool {
        self.dirs.contains(dir)
    }

    /// Every file anywhere beneath `dir`
    pub fn files_under<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = (&'a str, &'a [u8])> {
        self.files.iter().filter_map(move |(path, bytes)| {
            path.strip_prefix(dir)
                .filter(|rest| rest.starts_with('/'))
                .map(|_| (path.as_str(), bytes.as_slice()))
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// `/`-joined normal components, or `None` for paths leaving the root
fn normalize(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
