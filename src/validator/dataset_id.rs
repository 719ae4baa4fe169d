//! Implicit dataset id derivation
//!
//! A query never names its dataset directly. Every field reference carries
//! the id as a prefix (`<id>_<field>`), and all of them must agree.

use serde_json::{Map, Value};

use crate::dataset::is_valid_id;
use crate::query::{QueryError, QueryResult};

/// Derives the dataset id shared by every field reference in `query`.
///
/// Scans filter bodies, COLUMNS, ORDER, GROUP and APPLY source fields.
/// Strings without an underscore are apply-key candidates and are skipped.
/// Malformed structure is skipped here and rejected by later rules.
pub fn derive_dataset_id(query: &Map<String, Value>) -> QueryResult<String> {
    let mut references = Vec::new();

    if let Some(filter) = query.get("WHERE") {
        collect_filter_refs(filter, &mut references);
    }

    if let Some(Value::Object(options)) = query.get("OPTIONS") {
        if let Some(Value::Array(columns)) = options.get("COLUMNS") {
            references.extend(columns.iter().filter_map(Value::as_str));
        }
        match options.get("ORDER") {
            Some(Value::String(key)) => references.push(key.as_str()),
            Some(Value::Object(order)) => {
                if let Some(Value::Array(keys)) = order.get("keys") {
                    references.extend(keys.iter().filter_map(Value::as_str));
                }
            }
            _ => {}
        }
    }

    if let Some(Value::Object(transformations)) = query.get("TRANSFORMATIONS") {
        if let Some(Value::Array(group)) = transformations.get("GROUP") {
            references.extend(group.iter().filter_map(Value::as_str));
        }
        if let Some(Value::Array(apply)) = transformations.get("APPLY") {
            for rule in apply.iter().filter_map(Value::as_object) {
                for body in rule.values().filter_map(Value::as_object) {
                    references.extend(body.values().filter_map(Value::as_str));
                }
            }
        }
    }

    let mut dataset_id: Option<&str> = None;
    for prefix in references.iter().filter_map(|r| prefix_of(r)) {
        match dataset_id {
            None => dataset_id = Some(prefix),
            Some(existing) if existing != prefix => {
                return Err(QueryError::invalid(format!(
                    "Query references more than one dataset ('{}' and '{}')",
                    existing, prefix
                )));
            }
            Some(_) => {}
        }
    }

    let id = dataset_id
        .ok_or_else(|| QueryError::invalid("Query does not reference any dataset"))?;

    if !is_valid_id(id) {
        return Err(QueryError::invalid(format!("Invalid dataset id '{}'", id)));
    }

    Ok(id.to_string())
}

/// Returns the dataset prefix of a field reference, if it has one
pub fn prefix_of(reference: &str) -> Option<&str> {
    reference.split_once('_').map(|(prefix, _)| prefix)
}

fn collect_filter_refs<'a>(filter: &'a Value, out: &mut Vec<&'a str>) {
    let Some(filter) = filter.as_object() else {
        return;
    };

    for (op, body) in filter {
        match op.as_str() {
            "AND" | "OR" => {
                if let Value::Array(children) = body {
                    for child in children {
                        collect_filter_refs(child, out);
                    }
                }
            }
            "NOT" => collect_filter_refs(body, out),
            "LT" | "GT" | "EQ" | "IS" => {
                if let Value::Object(comparison) = body {
                    out.extend(comparison.keys().map(String::as_str));
                }
            }
            _ => {}
        }
    }
}
