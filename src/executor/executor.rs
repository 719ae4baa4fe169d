//! Query executor for insightdb
//!
//! Execution flow (strict order):
//! 1. Validate the raw query against the dataset
//! 2. Filter records by WHERE
//! 3. GROUP / APPLY (if TRANSFORMATIONS is present)
//! 4. Project onto COLUMNS
//! 5. Reject the final row set if it exceeds the cap
//! 6. Sort (if ORDER is present)

use serde_json::Value;

use crate::dataset::{Dataset, Record};
use crate::query::{Query, QueryError, QueryResult};
use crate::validator::QueryValidator;

use super::filters::FilterEvaluator;
use super::projector::Projector;
use super::result::ResultRow;
use super::sorter::ResultSorter;
use super::transform::Transformer;

/// Maximum number of rows a query may return
pub const MAX_RESULT_ROWS: usize = 5000;

/// Runs queries against a single borrowed dataset
pub struct QueryExecutor;

impl QueryExecutor {
    /// Validates `raw` against `dataset` and executes it.
    ///
    /// A query whose field prefixes name any other dataset is invalid.
    pub fn evaluate(dataset: &Dataset, raw: &Value) -> QueryResult<Vec<ResultRow>> {
        let query = QueryValidator::new(dataset).validate(raw)?;
        Self::execute(dataset, &query)
    }

    /// Executes an already validated query.
    ///
    /// Deterministic: same query + same dataset = same rows, same order.
    pub fn execute(dataset: &Dataset, query: &Query) -> QueryResult<Vec<ResultRow>> {
        if query.dataset_id != dataset.id() || query.kind != dataset.kind() {
            return Err(QueryError::invalid(format!(
                "Query addresses dataset '{}' but was run against '{}'",
                query.dataset_id,
                dataset.id()
            )));
        }

        // Step 2
        let records: Vec<&Record> = dataset.iter().collect();
        let matched = FilterEvaluator::evaluate(&records, &query.filter);

        // Steps 3-4
        let projector = Projector::new(&query.dataset_id, &query.columns);
        let mut rows = match &query.transformations {
            Some(transformations) => {
                let groups = Transformer::transform(&matched, transformations);
                projector.project_all(groups.iter())
            }
            None => projector.project_all(matched.iter().copied()),
        };

        // Step 5
        if rows.len() > MAX_RESULT_ROWS {
            return Err(QueryError::too_large(rows.len(), MAX_RESULT_ROWS));
        }

        // Step 6
        if let Some(order) = &query.order {
            ResultSorter::sort(&mut rows, order, &query.columns);
        }

        Ok(rows)
    }
}
