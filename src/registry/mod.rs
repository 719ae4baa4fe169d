//! Dataset Registry subsystem for insightdb
//!
//! Keeps loaded datasets in memory and, when opened on a data directory,
//! mirrors them to one JSON file each.
//!
//! # Design Principles
//!
//! - Persist before visible: an add that fails to write leaves no trace
//! - Immutable datasets, shared by `Arc`
//! - Ids are validated at the door

mod errors;
mod registry;
mod store;

pub use errors::{RegistryError, RegistryResult};
pub use registry::DatasetRegistry;
pub use store::DatasetStore;
