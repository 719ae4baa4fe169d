//! InsightService: the one object every outer surface talks to
//!
//! Lock discipline:
//! - add / remove hold the registry write lock for the registry mutation
//! - queries hold the read lock only to validate and resolve the dataset,
//!   then run against the `Arc<Dataset>` snapshot with no lock held

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use uuid::Uuid;

use crate::dataset::{is_valid_id, DatasetKind, DatasetSummary};
use crate::executor::{QueryExecutor, ResultRow};
use crate::ingest;
use crate::observability::{
    log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot, ObservationScope,
};
use crate::registry::{DatasetRegistry, RegistryError};
use crate::validator::QueryValidator;

use super::errors::{ApiError, ApiResult, ErrorKind};

/// Thread-safe façade over registry, ingestion and query engine
#[derive(Debug)]
pub struct InsightService {
    registry: RwLock<DatasetRegistry>,
    metrics: MetricsRegistry,
}

impl InsightService {
    pub fn new(registry: DatasetRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Service with no persistence
    pub fn in_memory() -> Self {
        Self::new(DatasetRegistry::in_memory())
    }

    /// Service backed by `data_dir`, with every persisted dataset loaded
    pub fn open(data_dir: impl AsRef<Path>) -> ApiResult<Self> {
        let data_dir = data_dir.as_ref();
        let registry = DatasetRegistry::open(data_dir)?;
        log_event_with_fields(
            Event::RegistryOpened,
            &[
                ("data_dir", &data_dir.display().to_string()),
                ("datasets", &registry.len().to_string()),
            ],
        );
        Ok(Self::new(registry))
    }

    /// Ingests `content` as a dataset of `kind` named `id`.
    ///
    /// Returns the ids of all loaded datasets.
    pub fn add_dataset(
        &self,
        id: &str,
        content: &[u8],
        kind: DatasetKind,
    ) -> ApiResult<Vec<String>> {
        let result = self.try_add_dataset(id, content, kind);
        match &result {
            Ok(_) => self.metrics.increment_datasets_added(),
            Err(err) => {
                self.metrics.increment_datasets_rejected();
                log_event_with_fields(
                    Event::DatasetRejected,
                    &[("id", id), ("code", err.code()), ("reason", err.message())],
                );
            }
        }
        result
    }

    fn try_add_dataset(
        &self,
        id: &str,
        content: &[u8],
        kind: DatasetKind,
    ) -> ApiResult<Vec<String>> {
        // Cheap checks first so a bad id never pays for ingestion
        if !is_valid_id(id) {
            return Err(RegistryError::InvalidId(id.to_string()).into());
        }
        if self.read_registry()?.contains(id) {
            return Err(RegistryError::AlreadyExists(id.to_string()).into());
        }

        let scope = ObservationScope::with_fields(
            "DATASET_INGEST",
            &[("id", id), ("kind", kind.as_str())],
        );
        let dataset = match ingest::build_dataset(id, kind, content) {
            Ok(dataset) => {
                scope.complete_with_fields(&[("rows", &dataset.len().to_string())]);
                dataset
            }
            Err(err) => {
                scope.fail(&err.to_string());
                return Err(err.into());
            }
        };

        let rows = dataset.len().to_string();
        let ids = self.write_registry()?.add(dataset)?;
        log_event_with_fields(
            Event::DatasetAdded,
            &[("id", id), ("kind", kind.as_str()), ("rows", &rows)],
        );
        Ok(ids)
    }

    /// Unloads and deletes dataset `id`, returning the id
    pub fn remove_dataset(&self, id: &str) -> ApiResult<String> {
        let removed = self.write_registry()?.remove(id)?;
        self.metrics.increment_datasets_removed();
        log_event_with_fields(Event::DatasetRemoved, &[("id", &removed)]);
        Ok(removed)
    }

    /// Summaries of every loaded dataset, sorted by id
    pub fn list_datasets(&self) -> ApiResult<Vec<DatasetSummary>> {
        Ok(self.read_registry()?.list())
    }

    /// Validates and runs `raw` against the dataset it addresses
    pub fn perform_query(&self, raw: &Value) -> ApiResult<Vec<ResultRow>> {
        let query_id = Uuid::new_v4().to_string();

        let resolved = {
            let registry = self.read_registry()?;
            QueryValidator::new(&*registry)
                .validate(raw)
                .map_err(ApiError::from)
                .and_then(|query| {
                    let dataset = registry.load(&query.dataset_id)?;
                    Ok((query, dataset))
                })
        };

        let outcome = resolved.and_then(|(query, dataset)| {
            QueryExecutor::execute(&dataset, &query)
                .map(|rows| (query.dataset_id, rows))
                .map_err(ApiError::from)
        });

        match outcome {
            Ok((dataset_id, rows)) => {
                self.metrics.record_query_executed(rows.len());
                log_event_with_fields(
                    Event::QueryExecuted,
                    &[
                        ("query_id", &query_id),
                        ("dataset", &dataset_id),
                        ("rows", &rows.len().to_string()),
                    ],
                );
                Ok(rows)
            }
            Err(err) => {
                let event = if err.kind() == ErrorKind::ResultTooLarge {
                    self.metrics.increment_queries_too_large();
                    Event::QueryTooLarge
                } else {
                    self.metrics.increment_queries_rejected();
                    Event::QueryRejected
                };
                log_event_with_fields(
                    event,
                    &[
                        ("query_id", &query_id),
                        ("code", err.code()),
                        ("reason", err.message()),
                    ],
                );
                Err(err)
            }
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn read_registry(&self) -> ApiResult<RwLockReadGuard<'_, DatasetRegistry>> {
        self.registry
            .read()
            .map_err(|_| ApiError::internal("Dataset registry lock poisoned"))
    }

    fn write_registry(&self) -> ApiResult<RwLockWriteGuard<'_, DatasetRegistry>> {
        self.registry
            .write()
            .map_err(|_| ApiError::internal("Dataset registry lock poisoned"))
    }
}
