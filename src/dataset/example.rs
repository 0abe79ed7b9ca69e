//! Typed view over a single dataset record.

use serde_json::{Map, Value};

use crate::error::DatasetError;

/// Directory name used when a record has no `uid`.
pub const UNKNOWN_UID: &str = "unknown_uid";

/// The fields of a record the exporters read.
///
/// Missing fields take lenient defaults (empty lists, empty strings); fields
/// present with the wrong JSON type are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Position of the record in its file (0-based).
    pub index: usize,
    /// Rendered uid; `None` when missing or null.
    pub uid: Option<String>,
    /// HTML table strings.
    pub tables: Vec<String>,
    /// Free-text paragraphs, including `## Table k ##` markers.
    pub paragraphs: Vec<String>,
    /// `qa.question`
    pub question: String,
    /// `qa.answer`, kept as whatever JSON value the dataset uses.
    pub answer: Value,
}

impl Example {
    /// Builds the typed view of the record at `index`.
    pub fn from_record(index: usize, record: &Value) -> Result<Self, DatasetError> {
        let obj = record
            .as_object()
            .ok_or(DatasetError::NotAnObject { index })?;

        let uid = match obj.get("uid") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                return Err(invalid(index, "uid", format!("expected string or number, got {other}")))
            }
        };

        let tables = string_list(index, obj, "tables")?;
        let paragraphs = string_list(index, obj, "paragraphs")?;

        let (question, answer) = match obj.get("qa") {
            None | Some(Value::Null) => (String::new(), Value::String(String::new())),
            Some(Value::Object(qa)) => {
                let question = match qa.get("question") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(_) => return Err(invalid(index, "qa.question", "expected a string")),
                };
                let answer = qa
                    .get("answer")
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                (question, answer)
            }
            Some(_) => return Err(invalid(index, "qa", "expected an object")),
        };

        Ok(Self {
            index,
            uid,
            tables,
            paragraphs,
            question,
            answer,
        })
    }

    /// The uid, or `fallback` when the record has none.
    pub fn uid_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.uid.as_deref().unwrap_or(fallback)
    }
}

fn string_list(index: usize, obj: &Map<String, Value>, field: &str) -> Result<Vec<String>, DatasetError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(invalid(index, field, format!("element {i} is not a string"))),
            })
            .collect(),
        Some(_) => Err(invalid(index, field, "expected an array of strings")),
    }
}

fn invalid(index: usize, field: &str, reason: impl Into<String>) -> DatasetError {
    DatasetError::InvalidField {
        index,
        field: field.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let record = json!({
            "uid": "abc-1",
            "tables": ["<table></table>"],
            "paragraphs": ["## Table 0 ##", "Revenue grew."],
            "qa": {"question": "What was revenue?", "answer": 12.5},
            "table_description": {}
        });
        let example = Example::from_record(3, &record).unwrap();
        assert_eq!(example.index, 3);
        assert_eq!(example.uid.as_deref(), Some("abc-1"));
        assert_eq!(example.tables.len(), 1);
        assert_eq!(example.paragraphs[1], "Revenue grew.");
        assert_eq!(example.question, "What was revenue?");
        assert_eq!(example.answer, json!(12.5));
    }

    #[test]
    fn test_missing_fields_default() {
        let example = Example::from_record(0, &json!({})).unwrap();
        assert_eq!(example.uid, None);
        assert!(example.tables.is_empty());
        assert!(example.paragraphs.is_empty());
        assert_eq!(example.question, "");
        assert_eq!(example.answer, json!(""));
        assert_eq!(example.uid_or(UNKNOWN_UID), "unknown_uid");
    }

    #[test]
    fn test_numeric_uid_rendered() {
        let example = Example::from_record(0, &json!({"uid": 42})).unwrap();
        assert_eq!(example.uid.as_deref(), Some("42"));
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = Example::from_record(5, &json!({"tables": "nope"})).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidField { index: 5, ref field, .. } if field == "tables"));

        let err = Example::from_record(1, &json!({"paragraphs": ["ok", 3]})).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidField { ref field, .. } if field == "paragraphs"));

        let err = Example::from_record(2, &json!([1, 2])).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject { index: 2 }));
    }
}
