//! Query validator
//!
//! Checks a raw JSON query against the query grammar and the field vocabulary
//! of the addressed dataset kind, producing a typed [`Query`].
//!
//! Rules are checked in a fixed order and the first violation wins:
//!
//! 1. Top-level keys are {WHERE, OPTIONS} or {WHERE, OPTIONS, TRANSFORMATIONS}
//! 2. All field references share one dataset id, and that id is known
//! 3. WHERE has 0 or 1 keys; AND/OR are non-empty arrays; NOT nests a filter
//! 4. LT/GT/EQ compare one numeric field against a number
//! 5. IS compares one text field against a well-formed wildcard pattern
//! 6. COLUMNS is non-empty and each entry is a field (or GROUP/APPLY key)
//! 7. ORDER keys appear in COLUMNS
//! 8. GROUP and APPLY are well-formed and type-correct

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::dataset::{Dataset, DatasetKind, Field};
use crate::query::{
    ApplyOp, ApplyRule, ColumnKey, Filter, Order, Query, QueryError, QueryResult, SortDirection,
    Transformations,
};

use super::dataset_id::derive_dataset_id;
use super::pattern::parse_pattern;

/// Resolves a dataset id to its kind (read-only)
pub trait DatasetKindLookup {
    /// Returns the kind of the loaded dataset `id`, or `None` if it is not loaded
    fn kind_of(&self, id: &str) -> Option<DatasetKind>;
}

impl DatasetKindLookup for Dataset {
    fn kind_of(&self, id: &str) -> Option<DatasetKind> {
        (self.id() == id).then(|| self.kind())
    }
}

/// Validates raw queries against a kind lookup.
///
/// Validation is pure: no side effects, same input gives the same outcome.
pub struct QueryValidator<'a, L: DatasetKindLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: DatasetKindLookup + ?Sized> QueryValidator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Validates `raw`, returning the typed query or the first broken rule
    pub fn validate(&self, raw: &Value) -> QueryResult<Query> {
        let query = raw
            .as_object()
            .ok_or_else(|| QueryError::invalid("Query must be a JSON object"))?;

        // Rule 1
        check_top_level_keys(query)?;

        // Rule 2
        let dataset_id = derive_dataset_id(query)?;
        let kind = self
            .lookup
            .kind_of(&dataset_id)
            .ok_or_else(|| QueryError::dataset_not_loaded(&dataset_id))?;

        let scope = FieldScope {
            dataset_id: &dataset_id,
            kind,
        };

        // Rules 3-5
        let filter = scope.parse_where(&query["WHERE"])?;

        // Rules 6-7
        let options = query["OPTIONS"]
            .as_object()
            .ok_or_else(|| QueryError::invalid("OPTIONS must be an object"))?;
        let raw_transformations = query.get("TRANSFORMATIONS");
        let transform_keys = raw_transformations.map(raw_transformation_keys);
        let raw_columns = scope.check_columns(options, transform_keys.as_ref())?;
        let raw_order = check_order(options, &raw_columns)?;

        // Rule 8
        let transformations = raw_transformations
            .map(|t| scope.parse_transformations(t))
            .transpose()?;

        let columns = raw_columns
            .iter()
            .map(|c| scope.column_key(c, transformations.as_ref()))
            .collect::<QueryResult<Vec<_>>>()?;

        let order = raw_order
            .map(|(direction, keys)| -> QueryResult<Order> {
                let keys = keys
                    .iter()
                    .map(|k| scope.column_key(k, transformations.as_ref()))
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(Order { direction, keys })
            })
            .transpose()?;

        Ok(Query {
            dataset_id,
            kind,
            filter,
            columns,
            order,
            transformations,
        })
    }
}

fn check_top_level_keys(query: &Map<String, Value>) -> QueryResult<()> {
    for key in query.keys() {
        if !matches!(key.as_str(), "WHERE" | "OPTIONS" | "TRANSFORMATIONS") {
            return Err(QueryError::invalid(format!(
                "Invalid key '{}' in query",
                key
            )));
        }
    }
    if !query.contains_key("WHERE") {
        return Err(QueryError::invalid("Query is missing WHERE"));
    }
    if !query.contains_key("OPTIONS") {
        return Err(QueryError::invalid("Query is missing OPTIONS"));
    }
    Ok(())
}

/// GROUP and APPLY key names as written, without validating them
fn raw_transformation_keys(transformations: &Value) -> HashSet<String> {
    let mut keys = HashSet::new();
    if let Some(group) = transformations.get("GROUP").and_then(Value::as_array) {
        keys.extend(group.iter().filter_map(Value::as_str).map(str::to_string));
    }
    if let Some(apply) = transformations.get("APPLY").and_then(Value::as_array) {
        for rule in apply.iter().filter_map(Value::as_object) {
            keys.extend(rule.keys().cloned());
        }
    }
    keys
}

type RawOrder<'q> = (SortDirection, Vec<&'q str>);

fn check_order<'q>(
    options: &'q Map<String, Value>,
    columns: &[&'q str],
) -> QueryResult<Option<RawOrder<'q>>> {
    let Some(order) = options.get("ORDER") else {
        return Ok(None);
    };

    let in_columns = |key: &str| -> QueryResult<()> {
        if columns.contains(&key) {
            Ok(())
        } else {
            Err(QueryError::invalid(format!(
                "ORDER key '{}' must be in COLUMNS",
                key
            )))
        }
    };

    match order {
        Value::String(key) => {
            in_columns(key)?;
            Ok(Some((SortDirection::Up, vec![key.as_str()])))
        }
        Value::Object(body) => {
            for key in body.keys() {
                if key != "dir" && key != "keys" {
                    return Err(QueryError::invalid(format!(
                        "Invalid key '{}' in ORDER",
                        key
                    )));
                }
            }
            let direction = match body.get("dir").and_then(Value::as_str) {
                Some("UP") => SortDirection::Up,
                Some("DOWN") => SortDirection::Down,
                _ => return Err(QueryError::invalid("ORDER dir must be either UP or DOWN")),
            };
            let keys = body
                .get("keys")
                .and_then(Value::as_array)
                .filter(|keys| !keys.is_empty())
                .ok_or_else(|| QueryError::invalid("ORDER keys must be a non-empty array"))?;

            let mut out = Vec::with_capacity(keys.len());
            for key in keys {
                let key = key
                    .as_str()
                    .ok_or_else(|| QueryError::invalid("ORDER keys must be strings"))?;
                in_columns(key)?;
                out.push(key);
            }
            Ok(Some((direction, out)))
        }
        _ => Err(QueryError::invalid("Invalid ORDER type")),
    }
}

/// Field resolution within one dataset id and kind
struct FieldScope<'s> {
    dataset_id: &'s str,
    kind: DatasetKind,
}

impl FieldScope<'_> {
    /// Resolves `<id>_<field>` to a field of this scope's kind
    fn resolve(&self, reference: &str) -> QueryResult<Field> {
        reference
            .split_once('_')
            .filter(|(prefix, _)| *prefix == self.dataset_id)
            .and_then(|(_, bare)| Field::parse(self.kind, bare))
            .ok_or_else(|| {
                QueryError::invalid(format!(
                    "Invalid key '{}' for {} dataset '{}'",
                    reference, self.kind, self.dataset_id
                ))
            })
    }

    fn parse_where(&self, value: &Value) -> QueryResult<Filter> {
        let body = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("WHERE must be an object"))?;
        match body.len() {
            0 => Ok(Filter::All),
            1 => self.parse_filter(value),
            _ => Err(QueryError::invalid("WHERE should only have 1 key")),
        }
    }

    fn parse_filter(&self, value: &Value) -> QueryResult<Filter> {
        let body = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("Filter must be an object"))?;
        if body.len() != 1 {
            return Err(QueryError::invalid(format!(
                "Filter should have exactly 1 key, has {}",
                body.len()
            )));
        }
        let (op, operand) = body
            .iter()
            .next()
            .ok_or_else(|| QueryError::invalid("Filter should have exactly 1 key"))?;

        match op.as_str() {
            "AND" | "OR" => {
                let children = operand
                    .as_array()
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        QueryError::invalid(format!("{} must be a non-empty array", op))
                    })?;
                let children = children
                    .iter()
                    .map(|c| self.parse_filter(c))
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(if op == "AND" {
                    Filter::And(children)
                } else {
                    Filter::Or(children)
                })
            }
            "NOT" => Ok(Filter::Not(Box::new(self.parse_filter(operand)?))),
            "LT" | "GT" | "EQ" => {
                let (field, bound) = self.comparison_body(op, operand)?;
                if !field.is_numeric() {
                    return Err(QueryError::invalid(format!(
                        "{} requires a numeric field, got '{}'",
                        op,
                        field.qualified(self.dataset_id)
                    )));
                }
                let bound = bound.as_f64().ok_or_else(|| {
                    QueryError::invalid(format!("{} value must be a number", op))
                })?;
                Ok(match op.as_str() {
                    "LT" => Filter::Lt(field, bound),
                    "GT" => Filter::Gt(field, bound),
                    _ => Filter::Eq(field, bound),
                })
            }
            "IS" => {
                let (field, pattern) = self.comparison_body(op, operand)?;
                if field.is_numeric() {
                    return Err(QueryError::invalid(format!(
                        "IS requires a text field, got '{}'",
                        field.qualified(self.dataset_id)
                    )));
                }
                let pattern = pattern
                    .as_str()
                    .ok_or_else(|| QueryError::invalid("IS value must be a string"))?;
                let pattern = parse_pattern(pattern).ok_or_else(|| {
                    QueryError::invalid(format!(
                        "Asterisks may only appear at the start or end of '{}'",
                        pattern
                    ))
                })?;
                Ok(Filter::Is(field, pattern))
            }
            other => Err(QueryError::invalid(format!(
                "Invalid filter key '{}'",
                other
            ))),
        }
    }

    /// Body of LT/GT/EQ/IS: an object with exactly one field key
    fn comparison_body<'v>(&self, op: &str, operand: &'v Value) -> QueryResult<(Field, &'v Value)> {
        let body = operand
            .as_object()
            .filter(|b| b.len() == 1)
            .ok_or_else(|| QueryError::invalid(format!("{} must be an object with 1 key", op)))?;
        let (key, value) = body
            .iter()
            .next()
            .ok_or_else(|| QueryError::invalid(format!("{} must be an object with 1 key", op)))?;
        Ok((self.resolve(key)?, value))
    }

    fn check_columns<'q>(
        &self,
        options: &'q Map<String, Value>,
        transform_keys: Option<&HashSet<String>>,
    ) -> QueryResult<Vec<&'q str>> {
        for key in options.keys() {
            if key != "COLUMNS" && key != "ORDER" {
                return Err(QueryError::invalid(format!(
                    "Invalid key '{}' in OPTIONS",
                    key
                )));
            }
        }

        let columns = options
            .get("COLUMNS")
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| QueryError::invalid("COLUMNS must be a non-empty array"))?;

        let mut out = Vec::with_capacity(columns.len());
        for column in columns {
            let column = column
                .as_str()
                .ok_or_else(|| QueryError::invalid("COLUMNS entries must be strings"))?;
            match transform_keys {
                None => {
                    self.resolve(column)?;
                }
                Some(keys) => {
                    if !keys.contains(column) {
                        return Err(QueryError::invalid(format!(
                            "COLUMNS key '{}' must be in GROUP or APPLY",
                            column
                        )));
                    }
                }
            }
            // A repeated column is projected once, at its first position
            if !out.contains(&column) {
                out.push(column);
            }
        }
        Ok(out)
    }

    fn parse_transformations(&self, value: &Value) -> QueryResult<Transformations> {
        let body = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS must be an object"))?;
        for key in body.keys() {
            if key != "GROUP" && key != "APPLY" {
                return Err(QueryError::invalid(format!(
                    "Invalid key '{}' in TRANSFORMATIONS",
                    key
                )));
            }
        }
        let (Some(group), Some(apply)) = (body.get("GROUP"), body.get("APPLY")) else {
            return Err(QueryError::invalid(
                "TRANSFORMATIONS must have GROUP and APPLY",
            ));
        };

        let group_keys = group
            .as_array()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| QueryError::invalid("GROUP must be a non-empty array"))?;
        let mut group = Vec::with_capacity(group_keys.len());
        let mut group_names = HashSet::new();
        for key in group_keys {
            let key = key
                .as_str()
                .ok_or_else(|| QueryError::invalid("GROUP entries must be strings"))?;
            group.push(self.resolve(key)?);
            group_names.insert(key);
        }

        let rules = apply
            .as_array()
            .ok_or_else(|| QueryError::invalid("APPLY must be an array"))?;
        let mut apply = Vec::with_capacity(rules.len());
        let mut seen = HashSet::new();
        for rule in rules {
            let rule = self.parse_apply_rule(rule, &group_names)?;
            if !seen.insert(rule.key.clone()) {
                return Err(QueryError::invalid(format!(
                    "Duplicate APPLY key '{}'",
                    rule.key
                )));
            }
            apply.push(rule);
        }

        Ok(Transformations { group, apply })
    }

    fn parse_apply_rule(&self, rule: &Value, group_names: &HashSet<&str>) -> QueryResult<ApplyRule> {
        let (key, body) = rule
            .as_object()
            .filter(|r| r.len() == 1)
            .and_then(|r| r.iter().next())
            .ok_or_else(|| QueryError::invalid("APPLY rule should only have 1 key"))?;

        if key.is_empty() {
            return Err(QueryError::invalid("APPLY key must not be empty"));
        }
        if key.contains('_') {
            return Err(QueryError::invalid(format!(
                "APPLY key '{}' must not contain an underscore",
                key
            )));
        }
        if group_names.contains(key.as_str()) || Field::parse(self.kind, key).is_some() {
            return Err(QueryError::invalid(format!(
                "APPLY key '{}' collides with a field name",
                key
            )));
        }

        let (token, target) = body
            .as_object()
            .filter(|b| b.len() == 1)
            .and_then(|b| b.iter().next())
            .ok_or_else(|| QueryError::invalid("APPLY body should only have 1 key"))?;

        let op = ApplyOp::parse(token).ok_or_else(|| {
            QueryError::invalid(format!("Invalid transformation operator '{}'", token))
        })?;
        let target = target
            .as_str()
            .ok_or_else(|| QueryError::invalid(format!("{} target must be a field key", token)))?;
        let field = self.resolve(target)?;

        if op.requires_numeric() && !field.is_numeric() {
            return Err(QueryError::invalid(format!(
                "{} requires a numeric field, got '{}'",
                token, target
            )));
        }

        Ok(ApplyRule {
            key: key.clone(),
            op,
            field,
        })
    }

    /// Types a COLUMNS/ORDER entry already checked by rules 6-8
    fn column_key(
        &self,
        name: &str,
        transformations: Option<&Transformations>,
    ) -> QueryResult<ColumnKey> {
        if let Some(t) = transformations {
            if t.apply_index(name).is_some() {
                return Ok(ColumnKey::Apply(name.to_string()));
            }
        }
        self.resolve(name).map(ColumnKey::Field)
    }
}
