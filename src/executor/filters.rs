//! Filter evaluation for query execution
//!
//! Evaluates a [`Filter`] tree over a record set. Composite operators work on
//! sets: AND narrows progressively, OR unions matches taken from the original
//! input, NOT takes the complement within the input. Output always preserves
//! input order.

use std::collections::HashSet;

use crate::dataset::Record;
use crate::query::Filter;

/// Evaluates filters against records
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Returns the subsequence of `records` matching `filter`
    pub fn evaluate<'r>(records: &[&'r Record], filter: &Filter) -> Vec<&'r Record> {
        match filter {
            Filter::All => records.to_vec(),
            Filter::And(children) => {
                let mut current = records.to_vec();
                for child in children {
                    if current.is_empty() {
                        break;
                    }
                    current = Self::evaluate(&current, child);
                }
                current
            }
            Filter::Or(children) => {
                // Identity, not equality: two equal records are still two rows
                let mut matched: HashSet<*const Record> = HashSet::new();
                for child in children {
                    matched.extend(
                        Self::evaluate(records, child)
                            .into_iter()
                            .map(|r| r as *const Record),
                    );
                }
                records
                    .iter()
                    .copied()
                    .filter(|r| matched.contains(&(*r as *const Record)))
                    .collect()
            }
            Filter::Not(inner) => {
                let excluded: HashSet<*const Record> = Self::evaluate(records, inner)
                    .into_iter()
                    .map(|r| r as *const Record)
                    .collect();
                records
                    .iter()
                    .copied()
                    .filter(|r| !excluded.contains(&(*r as *const Record)))
                    .collect()
            }
            leaf => records
                .iter()
                .copied()
                .filter(|r| Self::matches(r, leaf))
                .collect(),
        }
    }

    /// Checks a single record against `filter`
    pub fn matches(record: &Record, filter: &Filter) -> bool {
        match filter {
            Filter::All => true,
            Filter::And(children) => children.iter().all(|f| Self::matches(record, f)),
            Filter::Or(children) => children.iter().any(|f| Self::matches(record, f)),
            Filter::Not(inner) => !Self::matches(record, inner),
            Filter::Lt(field, bound) => record.number(*field).is_some_and(|v| v < *bound),
            Filter::Gt(field, bound) => record.number(*field).is_some_and(|v| v > *bound),
            Filter::Eq(field, bound) => record.number(*field).is_some_and(|v| v == *bound),
            Filter::Is(field, pattern) => record.text(*field).is_some_and(|v| pattern.matches(v)),
        }
    }
}
