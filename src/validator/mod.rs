//! Query Validator subsystem for insightdb
//!
//! Turns a raw JSON query into a typed [`Query`](crate::query::Query), or
//! reports the first rule it breaks.
//!
//! # Design Principles
//!
//! - Pure: no side effects, deterministic outcome
//! - Fail fast: rules are checked in a fixed order, first violation wins
//! - Typed output: fields resolve to enum values once, here

mod dataset_id;
mod pattern;
mod validator;

pub use dataset_id::{derive_dataset_id, prefix_of};
pub use pattern::parse_pattern;
pub use validator::{DatasetKindLookup, QueryValidator};
