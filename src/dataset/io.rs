//! Reading, renumbering and writing dataset files.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::Example;
use crate::error::DatasetError;

/// Loads a dataset file as raw JSON records.
pub fn load_records(path: &Path) -> Result<Vec<Value>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(records) => {
            if let Some(index) = records.iter().position(|r| !r.is_object()) {
                return Err(DatasetError::NotAnObject { index });
            }
            tracing::debug!(path = %path.display(), records = records.len(), "Loaded dataset");
            Ok(records)
        }
        _ => Err(DatasetError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}

/// Loads a dataset file and builds the typed view of every record.
pub fn load_examples(path: &Path) -> Result<Vec<Example>, DatasetError> {
    load_records(path)?
        .iter()
        .enumerate()
        .map(|(index, record)| Example::from_record(index, record))
        .collect()
}

/// Rewrites every record's `uid` to its 1-based position, as a string.
///
/// Existing `uid` keys keep their position in the object; records without
/// one get it appended.
pub fn renumber_uids(records: &mut [Value]) -> usize {
    let mut renumbered = 0;
    for (idx, record) in records.iter_mut().enumerate() {
        if let Some(obj) = record.as_object_mut() {
            obj.insert("uid".to_string(), Value::String((idx + 1).to_string()));
            renumbered += 1;
        }
    }
    renumbered
}

/// Writes records back with two-space indentation.
pub fn save_records(records: &[Value], path: &Path) -> Result<(), DatasetError> {
    write_pretty_json(records, path)
}

/// Serializes any value as pretty JSON with unescaped non-ASCII text.
pub fn write_pretty_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_renumber_keeps_key_order() {
        let mut records = vec![
            json!({"pre": 1, "uid": "x-9", "post": 2}),
            json!({"uid": 7}),
            json!({"no_uid": true}),
        ];
        assert_eq!(renumber_uids(&mut records), 3);

        let keys: Vec<&str> = records[0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["pre", "uid", "post"]);
        assert_eq!(records[0]["uid"], json!("1"));
        assert_eq!(records[1]["uid"], json!("2"));
        assert_eq!(records[2]["uid"], json!("3"));
    }

    #[test]
    fn test_save_and_load_preserves_unicode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/data.json");
        let records = vec![json!({"uid": "1", "paragraphs": ["€ 5 million"]})];

        save_records(&records, &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("€ 5 million"));
        assert!(raw.contains("\n  {"));

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_rewrite_keeps_numbers_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.json");
        fs::write(
            &path,
            r#"[{"uid": "a", "qa": {"answer": 123456789012345678901234567890, "ratio": 0.10000000000000000555}}]"#,
        )
        .unwrap();

        let mut records = load_records(&path).unwrap();
        renumber_uids(&mut records);
        save_records(&records, &path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("123456789012345678901234567890"));
        assert!(raw.contains("0.10000000000000000555"));
        assert!(raw.contains("\"uid\": \"1\""));
    }

    #[test]
    fn test_non_array_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("obj.json");
        fs::write(&path, r#"{"uid": "1"}"#).unwrap();
        assert!(matches!(load_records(&path), Err(DatasetError::NotAnArray { .. })));
    }

    #[test]
    fn test_non_object_record_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.json");
        fs::write(&path, r#"[{"uid": "1"}, "oops"]"#).unwrap();
        assert!(matches!(
            load_records(&path),
            Err(DatasetError::NotAnObject { index: 1 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_records(Path::new("/nonexistent/dataset.json"));
        assert!(matches!(result, Err(DatasetError::Read { .. })));
    }
}
