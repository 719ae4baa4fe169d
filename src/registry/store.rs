//! On-disk dataset files
//!
//! One JSON file per dataset: `<data_dir>/<id>.json`. Writes go to a
//! temporary sibling first, are fsynced, then renamed into place, so a crash
//! never leaves a half-written dataset file behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::dataset::{is_valid_id, Dataset};

use super::errors::{RegistryError, RegistryResult};

const DATASET_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// Directory of persisted datasets
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    /// Opens `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> RegistryResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            RegistryError::Io(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, DATASET_EXTENSION))
    }

    /// Reads every persisted dataset. Leftover temporary files are ignored.
    pub fn load_all(&self) -> RegistryResult<Vec<Dataset>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            RegistryError::Io(format!(
                "Failed to read data directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut datasets = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(DATASET_EXTENSION)
            {
                continue;
            }

            let content = fs::read(&path).map_err(|e| {
                RegistryError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let dataset: Dataset = serde_json::from_slice(&content).map_err(|e| {
                RegistryError::Serialization(format!(
                    "Corrupt dataset file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            if !is_valid_id(dataset.id()) {
                return Err(RegistryError::Serialization(format!(
                    "Dataset file {} has invalid id '{}'",
                    path.display(),
                    dataset.id()
                )));
            }
            if !dataset.records_match_kind() {
                return Err(RegistryError::Serialization(format!(
                    "Dataset file {} holds records that are not {}",
                    path.display(),
                    dataset.kind()
                )));
            }
            datasets.push(dataset);
        }

        Ok(datasets)
    }

    /// Persists `dataset` atomically
    pub fn save(&self, dataset: &Dataset) -> RegistryResult<()> {
        let json = serde_json::to_vec(dataset)?;
        let final_path = self.path_for(dataset.id());
        let temp_path = self
            .dir
            .join(format!("{}.{}", dataset.id(), TEMP_EXTENSION));

        let mut file = File::create(&temp_path).map_err(|e| {
            RegistryError::Io(format!("Failed to create {}: {}", temp_path.display(), e))
        })?;
        file.write_all(&json).map_err(|e| {
            RegistryError::Io(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().map_err(|e| {
            RegistryError::Io(format!("Failed to fsync {}: {}", temp_path.display(), e))
        })?;
        drop(file);

        fs::rename(&temp_path, &final_path).map_err(|e| {
            RegistryError::Io(format!(
                "Failed to move {} into place: {}",
                final_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Deletes the file for `id`. A missing file is not an error.
    pub fn delete(&self, id: &str) -> RegistryResult<()> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RegistryError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }
}
