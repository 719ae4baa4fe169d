//! Result types for query execution

use std::cmp::Ordering;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dataset::FieldValue;

/// A single output value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Number(_) => None,
            CellValue::Text(s) => Some(s),
        }
    }

    /// Numbers compare numerically, numbers before text. Text compares by
    /// UTF-16 code units, so astral characters sort below U+E000..U+FFFF.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CellValue::Text(a), CellValue::Text(b)) => a.encode_utf16().cmp(b.encode_utf16()),
            (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
            (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl From<FieldValue<'_>> for CellValue {
    fn from(value: FieldValue<'_>) -> Self {
        match value {
            FieldValue::Number(n) => CellValue::Number(n),
            FieldValue::Text(s) => CellValue::Text(s.to_string()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => {
                // Integral values go out as JSON integers
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// A single row in the result set, columns in COLUMNS order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    cells: Vec<(String, CellValue)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: CellValue) {
        self.cells.push((name.into(), value));
    }

    /// Returns the value of the column named `name`
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Returns the value at column position `index`
    pub fn at(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
