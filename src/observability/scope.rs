//! ObservationScope: BEGIN / COMPLETE / FAILED logging around one operation
//!
//! ```ignore
//! let scope = ObservationScope::with_fields("DATASET_INGEST", &[("id", "ubc")]);
//! match ingest() {
//!     Ok(n) => scope.complete_with_fields(&[("rows", &n.to_string())]),
//!     Err(e) => scope.fail(&e.to_string()),
//! }
//! ```
//!
//! A scope dropped without either logs `{name}_INCOMPLETE` at WARN.

use std::time::Instant;

use super::logger::Logger;

pub struct ObservationScope {
    name: String,
    fields: Vec<(String, String)>,
    started: Instant,
    finished: bool,
}

impl ObservationScope {
    /// Logs `{name}_BEGIN`
    pub fn new(name: &str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Logs `{name}_BEGIN` with `fields`; they are repeated on every later line
    pub fn with_fields(name: &str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Logs `{name}_COMPLETE` with the scope fields, elapsed time and `extra`
    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms();
        let mut fields = self.borrowed_fields();
        fields.push(("elapsed_ms", elapsed.as_str()));
        fields.extend_from_slice(extra);
        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }

    /// Logs `{name}_FAILED` at ERROR
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        let mut fields = self.borrowed_fields();
        fields.push(("reason", reason));
        Logger::error(&format!("{}_FAILED", self.name), &fields);
    }

    fn elapsed_ms(&self) -> String {
        self.started.elapsed().as_millis().to_string()
    }

    fn borrowed_fields(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            let mut fields = self.borrowed_fields();
            fields.push(("reason", "scope dropped without completion"));
            Logger::warn(&format!("{}_INCOMPLETE", self.name), &fields);
        }
    }
}
