//! Dataset registry
//!
//! Owns every loaded dataset. Datasets are handed out as `Arc<Dataset>` so a
//! query keeps its snapshot alive even if the id is removed mid-flight.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::dataset::{is_valid_id, Dataset, DatasetKind, DatasetSummary};
use crate::validator::DatasetKindLookup;

use super::errors::{RegistryError, RegistryResult};
use super::store::DatasetStore;

/// Loaded datasets, optionally backed by a data directory
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    datasets: HashMap<String, Arc<Dataset>>,
    store: Option<DatasetStore>,
}

impl DatasetRegistry {
    /// Registry with no persistence
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens `data_dir` and loads every dataset persisted there
    pub fn open(data_dir: impl AsRef<Path>) -> RegistryResult<Self> {
        let store = DatasetStore::open(data_dir.as_ref())?;
        let mut datasets = HashMap::new();
        for dataset in store.load_all()? {
            datasets.insert(dataset.id().to_string(), Arc::new(dataset));
        }
        Ok(Self {
            datasets,
            store: Some(store),
        })
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.store.as_ref().map(DatasetStore::dir)
    }

    /// Adds `dataset`, returning all loaded ids (sorted).
    ///
    /// The dataset is persisted before it becomes visible.
    pub fn add(&mut self, dataset: Dataset) -> RegistryResult<Vec<String>> {
        let id = dataset.id().to_string();
        if !is_valid_id(&id) {
            return Err(RegistryError::InvalidId(id));
        }
        if self.datasets.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }

        if let Some(store) = &self.store {
            store.save(&dataset)?;
        }
        self.datasets.insert(id, Arc::new(dataset));

        Ok(self.ids())
    }

    /// Removes `id` from memory and disk, returning the id
    pub fn remove(&mut self, id: &str) -> RegistryResult<String> {
        if !is_valid_id(id) {
            return Err(RegistryError::InvalidId(id.to_string()));
        }
        if !self.datasets.contains_key(id) {
            return Err(RegistryError::NotFound(id.to_string()));
        }

        if let Some(store) = &self.store {
            store.delete(id)?;
        }
        self.datasets.remove(id);

        Ok(id.to_string())
    }

    /// Summaries of all loaded datasets, sorted by id
    pub fn list(&self) -> Vec<DatasetSummary> {
        let mut summaries: Vec<DatasetSummary> =
            self.datasets.values().map(|d| d.summary()).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    pub fn load(&self, id: &str) -> RegistryResult<Arc<Dataset>> {
        self.datasets
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.datasets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.datasets.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl DatasetKindLookup for DatasetRegistry {
    fn kind_of(&self, id: &str) -> Option<DatasetKind> {
        self.datasets.get(id).map(|d| d.kind())
    }
}
