//! Column projection
//!
//! Copies only the requested columns out of a record or a group row, under
//! their output names.

use crate::dataset::Record;
use crate::query::ColumnKey;

use super::result::{CellValue, ResultRow};
use super::transform::GroupRow;

/// Anything a column can be read from
pub trait RowSource {
    fn cell(&self, key: &ColumnKey) -> Option<CellValue>;
}

impl RowSource for Record {
    fn cell(&self, key: &ColumnKey) -> Option<CellValue> {
        match key {
            ColumnKey::Field(field) => self.value(*field).map(CellValue::from),
            ColumnKey::Apply(_) => None,
        }
    }
}

impl RowSource for GroupRow {
    fn cell(&self, key: &ColumnKey) -> Option<CellValue> {
        match key {
            ColumnKey::Field(field) => self.group_value(*field).cloned(),
            ColumnKey::Apply(name) => self.apply_value(name).cloned(),
        }
    }
}

/// Projects rows onto COLUMNS
pub struct Projector<'q> {
    columns: &'q [ColumnKey],
    names: Vec<String>,
}

impl<'q> Projector<'q> {
    pub fn new(dataset_id: &str, columns: &'q [ColumnKey]) -> Self {
        let names = columns.iter().map(|c| c.output_name(dataset_id)).collect();
        Self { columns, names }
    }

    pub fn project<R: RowSource + ?Sized>(&self, source: &R) -> ResultRow {
        let mut row = ResultRow::with_capacity(self.columns.len());
        for (column, name) in self.columns.iter().zip(&self.names) {
            if let Some(value) = source.cell(column) {
                row.push(name.clone(), value);
            }
        }
        row
    }

    pub fn project_all<'r, R, I>(&self, sources: I) -> Vec<ResultRow>
    where
        R: RowSource + ?Sized + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        sources.into_iter().map(|s| self.project(s)).collect()
    }
}
