//! End-to-end query scenarios against an in-memory sections dataset

use insightdb::dataset::{Dataset, DatasetKind, Record, Section};
use insightdb::executor::{QueryExecutor, MAX_RESULT_ROWS};
use insightdb::query::QueryErrorCode;
use serde_json::{json, Value};

fn section(uuid: &str, dept: &str, id: &str, avg: f64, year: f64) -> Record {
    Record::Section(Section {
        dept: dept.to_string(),
        id: id.to_string(),
        instructor: "smith, jane".to_string(),
        title: format!("{} {}", dept, id),
        uuid: uuid.to_string(),
        avg,
        pass: 40.0,
        fail: 2.0,
        audit: 0.0,
        year,
    })
}

fn sections() -> Dataset {
    Dataset::new(
        "sections",
        DatasetKind::Sections,
        vec![
            section("1", "cpsc", "310", 97.5, 2015.0),
            section("2", "cpsc", "110", 85.0, 2016.0),
            section("3", "math", "100", 92.0, 2015.0),
            section("4", "math", "200", 97.5, 1900.0),
            section("5", "adhe", "329", 93.33, 2014.0),
            section("6", "adhe", "329", 90.02, 2016.0),
            section("7", "biol", "112", 70.125, 2015.0),
            section("8", "biol", "112", 70.13, 2015.0),
        ],
    )
}

fn run(query: Value) -> Value {
    let rows = QueryExecutor::evaluate(&sections(), &query).unwrap();
    serde_json::to_value(rows).unwrap()
}

#[test]
fn simple_filter_sorted_ascending_keeps_ties_in_input_order() {
    let result = run(json!({
        "WHERE": {"GT": {"sections_avg": 97}},
        "OPTIONS": {"COLUMNS": ["sections_dept", "sections_avg"], "ORDER": "sections_avg"}
    }));
    assert_eq!(
        result,
        json!([
            {"sections_dept": "cpsc", "sections_avg": 97.5},
            {"sections_dept": "math", "sections_avg": 97.5}
        ])
    );
}

#[test]
fn repeated_columns_project_one_key() {
    let query = json!({
        "WHERE": {"IS": {"sections_uuid": "3"}},
        "OPTIONS": {
            "COLUMNS": ["sections_avg", "sections_dept", "sections_avg"],
            "ORDER": {"dir": "DOWN", "keys": ["sections_dept", "sections_avg"]}
        }
    });
    let rows = QueryExecutor::evaluate(&sections(), &query).unwrap();
    let text = serde_json::to_string(&rows).unwrap();
    assert_eq!(text, r#"[{"sections_avg":92,"sections_dept":"math"}]"#);
}

#[test]
fn and_with_wildcard_narrows() {
    let result = run(json!({
        "WHERE": {"AND": [{"IS": {"sections_dept": "ad*"}}, {"GT": {"sections_avg": 91}}]},
        "OPTIONS": {"COLUMNS": ["sections_uuid", "sections_id"]}
    }));
    assert_eq!(result, json!([{"sections_uuid": "5", "sections_id": "329"}]));
}

#[test]
fn or_unions_without_duplicates_in_input_order() {
    let result = run(json!({
        "WHERE": {"OR": [{"GT": {"sections_avg": 95}}, {"IS": {"sections_dept": "*th"}}]},
        "OPTIONS": {"COLUMNS": ["sections_uuid"]}
    }));
    assert_eq!(
        result,
        json!([{"sections_uuid": "1"}, {"sections_uuid": "3"}, {"sections_uuid": "4"}])
    );
}

#[test]
fn not_is_the_complement() {
    let result = run(json!({
        "WHERE": {"NOT": {"LT": {"sections_avg": 90.02}}},
        "OPTIONS": {"COLUMNS": ["sections_uuid"], "ORDER": "sections_uuid"}
    }));
    let uuids: Vec<&str> = result
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["sections_uuid"].as_str().unwrap())
        .collect();
    assert_eq!(uuids, vec!["1", "3", "4", "5", "6"]);
}

#[test]
fn empty_where_returns_every_record() {
    let result = run(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_year"]}
    }));
    assert_eq!(result.as_array().unwrap().len(), 8);
    assert_eq!(result[3], json!({"sections_year": 1900}));
}

#[test]
fn grouped_down_order_breaks_ties_on_later_keys() {
    let result = run(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["sections_dept", "maxAvg", "n"],
            "ORDER": {"dir": "DOWN", "keys": ["maxAvg", "sections_dept"]}
        },
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [
                {"maxAvg": {"MAX": "sections_avg"}},
                {"n": {"COUNT": "sections_uuid"}}
            ]
        }
    }));
    assert_eq!(
        result,
        json!([
            {"sections_dept": "math", "maxAvg": 97.5, "n": 2},
            {"sections_dept": "cpsc", "maxAvg": 97.5, "n": 2},
            {"sections_dept": "adhe", "maxAvg": 93.33, "n": 2},
            {"sections_dept": "biol", "maxAvg": 70.13, "n": 2}
        ])
    );
}

#[test]
fn sum_and_avg_round_exact_decimals_half_up() {
    let result = run(json!({
        "WHERE": {"IS": {"sections_dept": "biol"}},
        "OPTIONS": {"COLUMNS": ["sections_dept", "total", "mean", "low"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [
                {"total": {"SUM": "sections_avg"}},
                {"mean": {"AVG": "sections_avg"}},
                {"low": {"MIN": "sections_avg"}}
            ]
        }
    }));
    assert_eq!(
        result,
        json!([{"sections_dept": "biol", "total": 140.26, "mean": 70.13, "low": 70.125}])
    );
}

#[test]
fn count_counts_distinct_values() {
    let result = run(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_id", "years"], "ORDER": "sections_id"},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_id"],
            "APPLY": [{"years": {"COUNT": "sections_year"}}]
        }
    }));
    assert_eq!(result[0], json!({"sections_id": "100", "years": 1}));
    assert_eq!(result[2], json!({"sections_id": "112", "years": 1}));
    assert_eq!(result[5], json!({"sections_id": "329", "years": 2}));
}

#[test]
fn grouping_with_no_matches_is_empty() {
    let result = run(json!({
        "WHERE": {"GT": {"sections_avg": 100}},
        "OPTIONS": {"COLUMNS": ["sections_dept", "c"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"c": {"COUNT": "sections_uuid"}}]
        }
    }));
    assert_eq!(result, json!([]));
}

#[test]
fn too_many_rows_rejected() {
    let records = (0..MAX_RESULT_ROWS + 1)
        .map(|i| section(&i.to_string(), "cpsc", "110", 80.0, 2015.0))
        .collect();
    let big = Dataset::new("sections", DatasetKind::Sections, records);

    let query = json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_uuid"]}});
    let err = QueryExecutor::evaluate(&big, &query).unwrap_err();
    assert_eq!(err.code(), QueryErrorCode::InsightResultTooLarge);
    assert_eq!(err.row_count(), Some(MAX_RESULT_ROWS + 1));

    let grouped = json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": []
        }
    });
    let rows = QueryExecutor::evaluate(&big, &grouped).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn malformed_queries_rejected() {
    let dataset = sections();
    let rejected = [
        json!({"WHERE": {}}),
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": []}}),
        json!({"WHERE": {"GT": {"sections_avg": 90}}, "OPTIONS": {"COLUMNS": ["rooms_seats"]}}),
        json!({"WHERE": {"IS": {"sections_avg": "9*"}}, "OPTIONS": {"COLUMNS": ["sections_avg"]}}),
        json!({"WHERE": {"IS": {"sections_dept": "c*s*"}}, "OPTIONS": {"COLUMNS": ["sections_dept"]}}),
        json!({"WHERE": {"AND": []}, "OPTIONS": {"COLUMNS": ["sections_dept"]}}),
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_dept"], "ORDER": "sections_avg"}}),
        json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["sections_nope"]}}),
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_avg"]},
            "TRANSFORMATIONS": {"GROUP": ["sections_dept"], "APPLY": []}
        }),
        json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "s"]},
            "TRANSFORMATIONS": {"GROUP": ["sections_dept"], "APPLY": [{"s": {"SUM": "sections_title"}}]}
        }),
    ];

    for query in rejected {
        let err = QueryExecutor::evaluate(&dataset, &query).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::InsightQueryInvalid, "{}", query);
    }
}

#[test]
fn query_for_another_dataset_rejected() {
    let query = json!({"WHERE": {}, "OPTIONS": {"COLUMNS": ["ubc_dept"]}});
    let err = QueryExecutor::evaluate(&sections(), &query).unwrap_err();
    assert_eq!(err.code(), QueryErrorCode::InsightQueryInvalid);
}

#[test]
fn evaluation_is_deterministic() {
    let query = json!({
        "WHERE": {"OR": [{"EQ": {"sections_year": 2015}}, {"IS": {"sections_dept": "adhe"}}]},
        "OPTIONS": {
            "COLUMNS": ["sections_dept", "avgAvg"],
            "ORDER": {"dir": "UP", "keys": ["avgAvg"]}
        },
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"avgAvg": {"AVG": "sections_avg"}}]
        }
    });
    let dataset = sections();
    let first = QueryExecutor::evaluate(&dataset, &query).unwrap();
    let second = QueryExecutor::evaluate(&dataset, &query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn adhe_329_sections_above_90_ascending() {
    let mut records: Vec<Record> = [90.82, 96.11, 90.02, 93.33, 92.54]
        .iter()
        .enumerate()
        .map(|(i, avg)| section(&format!("a{}", i), "adhe", "329", *avg, 2015.0))
        .collect();
    records.push(section("b0", "adhe", "329", 89.5, 2015.0));
    records.push(section("b1", "adhe", "330", 95.0, 2015.0));
    records.push(section("b2", "cpsc", "329", 95.0, 2015.0));
    let dataset = Dataset::new("sections", DatasetKind::Sections, records);

    let rows = QueryExecutor::evaluate(
        &dataset,
        &json!({
            "WHERE": {"AND": [
                {"GT": {"sections_avg": 90}},
                {"IS": {"sections_dept": "adhe"}},
                {"IS": {"sections_id": "329"}}
            ]},
            "OPTIONS": {"COLUMNS": ["sections_dept", "sections_avg"], "ORDER": "sections_avg"}
        }),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(rows).unwrap(),
        json!([
            {"sections_dept": "adhe", "sections_avg": 90.02},
            {"sections_dept": "adhe", "sections_avg": 90.82},
            {"sections_dept": "adhe", "sections_avg": 92.54},
            {"sections_dept": "adhe", "sections_avg": 93.33},
            {"sections_dept": "adhe", "sections_avg": 96.11}
        ])
    );
}

#[test]
fn cpsc_courses_by_average_descending() {
    let dataset = Dataset::new(
        "sections",
        DatasetKind::Sections,
        vec![
            section("1", "cpsc", "110", 70.0, 2015.0),
            section("2", "cpsc", "310", 80.0, 2015.0),
            section("3", "cpsc", "110", 75.0, 2016.0),
            section("4", "cpsc", "210", 90.0, 2015.0),
            section("5", "cpsc", "310", 81.0, 2016.0),
            section("6", "math", "100", 99.0, 2015.0),
        ],
    );

    let rows = QueryExecutor::evaluate(
        &dataset,
        &json!({
            "WHERE": {"IS": {"sections_dept": "cpsc"}},
            "OPTIONS": {
                "COLUMNS": ["sections_dept", "sections_id", "overallAvg"],
                "ORDER": {"dir": "DOWN", "keys": ["overallAvg"]}
            },
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept", "sections_id"],
                "APPLY": [{"overallAvg": {"AVG": "sections_avg"}}]
            }
        }),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(rows).unwrap(),
        json!([
            {"sections_dept": "cpsc", "sections_id": "210", "overallAvg": 90},
            {"sections_dept": "cpsc", "sections_id": "310", "overallAvg": 80.5},
            {"sections_dept": "cpsc", "sections_id": "110", "overallAvg": 72.5}
        ])
    );
}
