//! Result sorting for query execution
//!
//! Multi-key order compares keys in sequence, the first differing key
//! decides. DOWN inverts each key comparison, so ties keep their input order
//! in both directions.

use std::cmp::Ordering;

use crate::query::{ColumnKey, Order, SortDirection};

use super::result::ResultRow;

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts `rows` (projected onto `columns`) according to `order`.
    ///
    /// Sort is stable and deterministic.
    pub fn sort(rows: &mut [ResultRow], order: &Order, columns: &[ColumnKey]) {
        let positions: Vec<usize> = order
            .keys
            .iter()
            .filter_map(|key| columns.iter().position(|c| c == key))
            .collect();

        rows.sort_by(|a, b| {
            let ordering = Self::compare(a, b, &positions);
            match order.direction {
                SortDirection::Up => ordering,
                SortDirection::Down => ordering.reverse(),
            }
        });
    }

    fn compare(a: &ResultRow, b: &ResultRow, positions: &[usize]) -> Ordering {
        for &position in positions {
            let ordering = match (a.at(position), b.at(position)) {
                (Some(x), Some(y)) => x.compare(y),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
