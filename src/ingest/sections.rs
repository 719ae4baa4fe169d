//! Sections ingestion
//!
//! Input is a zip (or tar) archive. Every regular file under the top-level
//! `courses/` directory holds `{"result": [...]}`, one object per section.

use serde_json::{Map, Value};

use crate::dataset::{DatasetKind, Section};

use super::archive::ArchiveFiles;
use super::errors::{IngestError, IngestResult};

const COURSES_DIR: &str = "courses";

/// Year recorded for the aggregate "overall" row of a course
pub const OVERALL_YEAR: f64 = 1900.0;

/// Parses every valid section out of a courses archive
pub fn parse_sections(content: &[u8]) -> IngestResult<Vec<Section>> {
    let archive = ArchiveFiles::read(content)?;
    if !archive.has_dir(COURSES_DIR) {
        return Err(IngestError::MissingCourses);
    }

    let mut sections = Vec::new();
    for (_, bytes) in archive.files_under(COURSES_DIR) {
        // Not UTF-8: not a course file
        let Ok(text) = std::str::from_utf8(bytes) else {
            continue;
        };
        sections.extend(parse_course_file(text));
    }

    if sections.is_empty() {
        return Err(IngestError::Empty(DatasetKind::Sections));
    }
    Ok(sections)
}

/// Valid sections of one course file. Malformed files yield nothing.
pub fn parse_course_file(text: &str) -> Vec<Section> {
    let Ok(document) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    let Some(results) = document.get("result").and_then(Value::as_array) else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(Value::as_object)
        .filter_map(section_from_result)
        .collect()
}

fn section_from_result(row: &Map<String, Value>) -> Option<Section> {
    let year = if row.get("Section").and_then(Value::as_str) == Some("overall") {
        OVERALL_YEAR
    } else {
        number_or_numeric_string(row.get("Year")?)?
    };

    Some(Section {
        dept: row.get("Subject")?.as_str()?.to_string(),
        id: row.get("Course")?.as_str()?.to_string(),
        instructor: row.get("Professor")?.as_str()?.to_string(),
        title: row.get("Title")?.as_str()?.to_string(),
        uuid: string_or_number(row.get("id")?)?,
        avg: row.get("Avg")?.as_f64()?,
        pass: row.get("Pass")?.as_f64()?,
        fail: row.get("Fail")?.as_f64()?,
        audit: row.get("Audit")?.as_f64()?,
        year,
    })
}

fn string_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_or_numeric_string(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::{tar_archive, zip_archive};
    use serde_json::json;

    fn result_row(uuid: Value, year: Value, section: &str) -> Value {
        json!({
            "Subject": "cpsc", "Course": "310", "Professor": "holmes, reid",
            "Title": "intr sftwr eng", "id": uuid, "Avg": 78.42, "Pass": 120,
            "Fail": 3, "Audit": 0, "Year": year, "Section": section
        })
    }

    #[test]
    fn test_parses_course_files() {
        let course = json!({"result": [
            result_row(json!(1234), json!("2015"), "101"),
            result_row(json!("5678"), json!(2016), "overall"),
        ]})
        .to_string();
        let content = zip_archive(&[("courses/CPSC310", &course)]);

        let sections = parse_sections(&content).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].uuid, "1234");
        assert_eq!(sections[0].year, 2015.0);
        assert_eq!(sections[0].avg, 78.42);
        assert_eq!(sections[1].uuid, "5678");
        assert_eq!(sections[1].year, OVERALL_YEAR);
    }

    #[test]
    fn test_rows_with_missing_fields_are_discarded() {
        let mut broken = result_row(json!(1), json!(2015), "101");
        broken.as_object_mut().unwrap().remove("Professor");
        let mut mistyped = result_row(json!(2), json!(2015), "101");
        mistyped["Avg"] = json!("high");

        let course = json!({"result": [
            broken,
            mistyped,
            result_row(json!(3), json!(2015), "101"),
        ]})
        .to_string();

        let sections = parse_course_file(&course);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].uuid, "3");
    }

    #[test]
    fn test_invalid_json_files_skipped() {
        let course = json!({"result": [result_row(json!(9), json!(2010), "1")]}).to_string();
        let content = zip_archive(&[
            ("courses/BAD", "not json at all"),
            ("courses/GOOD", &course),
        ]);
        assert_eq!(parse_sections(&content).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_courses_dir() {
        let content = zip_archive(&[("other/CPSC310", "{}")]);
        assert_eq!(
            parse_sections(&content).unwrap_err(),
            IngestError::MissingCourses
        );
    }

    #[test]
    fn test_no_valid_sections() {
        let content = zip_archive(&[("courses/EMPTY", r#"{"result": []}"#)]);
        assert_eq!(
            parse_sections(&content).unwrap_err(),
            IngestError::Empty(DatasetKind::Sections)
        );
    }

    #[test]
    fn test_leading_dot_path() {
        let course = json!({"result": [result_row(json!(9), json!(2010), "1")]}).to_string();
        let content = tar_archive(&[("./courses/X", &course)]);
        assert_eq!(parse_sections(&content).unwrap().len(), 1);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = parse_sections(b"definitely not an archive, far too short").unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidArchive(_) | IngestError::MissingCourses
        ));
    }
}
