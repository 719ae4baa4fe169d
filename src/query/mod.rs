//! Query model for insightdb
//!
//! Wire format (JSON):
//!
//! ```text
//! { "WHERE": <filter>,
//!   "OPTIONS": { "COLUMNS": [..], "ORDER"?: "<key>" | {"dir": "UP"|"DOWN", "keys": [..]} },
//!   "TRANSFORMATIONS"?: { "GROUP": [..], "APPLY": [{ "<applyKey>": {"<OP>": "<field>"} }] } }
//! ```
//!
//! A query value is built fresh per request, validated, evaluated and dropped.

mod ast;
mod errors;

pub use ast::{
    ApplyOp, ApplyRule, ColumnKey, Filter, Order, Pattern, Query, SortDirection, Transformations,
};
pub use errors::{QueryError, QueryErrorCode, QueryResult, Severity};
