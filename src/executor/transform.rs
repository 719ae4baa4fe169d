//! GROUP / APPLY
//!
//! Partitions matched records by their GROUP values and reduces each group to
//! one synthetic row. Groups come out in first-seen order.

use std::collections::{HashMap, HashSet};

use crate::dataset::{Field, FieldValue, Record};
use crate::query::{ApplyOp, ApplyRule, Transformations};

use super::decimal::Decimal;
use super::result::CellValue;

/// Digits kept by AVG and SUM
const AGGREGATE_SCALE: u32 = 2;

/// Hashable form of one field value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Number(u64),
    Text(String),
}

impl KeyPart {
    fn of(value: Option<FieldValue<'_>>) -> Option<KeyPart> {
        Some(match value? {
            // Fold -0.0 into 0.0 so they group together
            FieldValue::Number(n) => KeyPart::Number((n + 0.0).to_bits()),
            FieldValue::Text(s) => KeyPart::Text(s.to_string()),
        })
    }
}

/// One synthetic row: GROUP values followed by APPLY results
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    group: Vec<(Field, CellValue)>,
    apply: Vec<(String, CellValue)>,
    size: usize,
}

impl GroupRow {
    pub fn group_value(&self, field: Field) -> Option<&CellValue> {
        self.group
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value)
    }

    pub fn apply_value(&self, key: &str) -> Option<&CellValue> {
        self.apply
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Number of records in the group
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Runs GROUP then APPLY over matched records
pub struct Transformer;

impl Transformer {
    pub fn transform(records: &[&Record], transformations: &Transformations) -> Vec<GroupRow> {
        Self::partition(records, &transformations.group)
            .into_iter()
            .map(|members| Self::reduce(&members, transformations))
            .collect()
    }

    /// Splits `records` into groups keyed on `group` values, in first-seen order
    pub fn partition<'r>(records: &[&'r Record], group: &[Field]) -> Vec<Vec<&'r Record>> {
        let mut index: HashMap<Vec<KeyPart>, usize> = HashMap::new();
        let mut groups: Vec<Vec<&'r Record>> = Vec::new();

        for record in records {
            let Some(key) = group
                .iter()
                .map(|field| KeyPart::of(record.value(*field)))
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };

            match index.get(&key) {
                Some(&slot) => groups[slot].push(*record),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![*record]);
                }
            }
        }

        groups
    }

    fn reduce(members: &[&Record], transformations: &Transformations) -> GroupRow {
        let representative = members[0];
        let group = transformations
            .group
            .iter()
            .filter_map(|field| {
                representative
                    .value(*field)
                    .map(|value| (*field, CellValue::from(value)))
            })
            .collect();

        let apply = transformations
            .apply
            .iter()
            .map(|rule| (rule.key.clone(), Self::aggregate(members, rule)))
            .collect();

        GroupRow {
            group,
            apply,
            size: members.len(),
        }
    }

    fn aggregate(members: &[&Record], rule: &ApplyRule) -> CellValue {
        let numbers = || numeric_values(members, rule.field);

        let value = match rule.op {
            ApplyOp::Count => {
                let distinct: HashSet<KeyPart> = members
                    .iter()
                    .filter_map(|r| KeyPart::of(r.value(rule.field)))
                    .collect();
                distinct.len() as f64
            }
            ApplyOp::Max => numbers().fold(f64::NEG_INFINITY, f64::max),
            ApplyOp::Min => numbers().fold(f64::INFINITY, f64::min),
            ApplyOp::Sum => exact_sum(numbers())
                .and_then(|sum| sum.round(AGGREGATE_SCALE).ok())
                .map(Decimal::to_f64)
                .unwrap_or_else(|| round_f64(numbers().sum())),
            ApplyOp::Avg => {
                let count = numbers().count();
                exact_sum(numbers())
                    .and_then(|sum| sum.div_round(count as i128, AGGREGATE_SCALE).ok())
                    .map(Decimal::to_f64)
                    .unwrap_or_else(|| round_f64(numbers().sum::<f64>() / count as f64))
            }
        };

        CellValue::Number(value)
    }
}

fn numeric_values<'r>(members: &'r [&'r Record], field: Field) -> impl Iterator<Item = f64> + 'r {
    members.iter().filter_map(move |r| r.number(field))
}

fn exact_sum(mut values: impl Iterator<Item = f64>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        Decimal::from_f64(v).and_then(|d| acc.checked_add(d)).ok()
    })
}

/// Fallback when the exact path overflows
fn round_f64(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
