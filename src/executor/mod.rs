//! Query Executor subsystem for insightdb
//!
//! Consumes validated queries and produces deterministic result rows.
//!
//! # Execution Flow (strict order)
//!
//! 1. Filter records by WHERE
//! 2. GROUP / APPLY when TRANSFORMATIONS is present
//! 3. Project onto COLUMNS
//! 4. Enforce the result-size cap on the final row set
//! 5. Apply ORDER (if specified)
//!
//! # Invariants
//!
//! - Deterministic execution
//! - Datasets are only ever borrowed, never mutated
//! - No partial results: a query either returns every row or fails

mod decimal;
mod executor;
mod filters;
mod projector;
mod result;
mod sorter;
mod transform;

pub use decimal::{Decimal, DecimalError};
pub use executor::{QueryExecutor, MAX_RESULT_ROWS};
pub use filters::FilterEvaluator;
pub use projector::{Projector, RowSource};
pub use result::{CellValue, ResultRow};
pub use sorter::ResultSorter;
pub use transform::{GroupRow, Transformer};
