//! GRP task files for the evaluation harness.
//!
//! Each dataset record becomes one flat task entry pointing at the workbooks
//! exported for it. Field order in the written JSON follows [`GrpEntry`].

mod spreadsheets;
mod title;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ForgeConfig;
use crate::dataset::{write_pretty_json, Example};
use crate::error::ExportError;

pub use spreadsheets::gather_spreadsheets;
pub use title::derive_title;

/// One task in a GRP file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrpEntry {
    pub task_id: String,
    pub title: String,
    pub spreadsheets: Vec<String>,
    pub prompt: String,
    pub answer: Value,
    pub expected_output_file: Vec<String>,
    pub feedback: String,
}

/// Builds the GRP entry for one example.
pub fn build_entry(example: &Example, config: &ForgeConfig) -> Result<GrpEntry, ExportError> {
    let uid = example.uid_or("").trim();
    let spreadsheets = gather_spreadsheets(&config.xlsx_dir, &config.folder_prefix, uid)?;
    let title = derive_title(
        &example.paragraphs,
        &example.question,
        uid,
        config.title_max_words,
    );

    if spreadsheets.is_empty() {
        tracing::debug!(uid = %uid, "No spreadsheets found for task");
    }

    Ok(GrpEntry {
        task_id: format!("{}{}", config.task_id_prefix, uid),
        title,
        spreadsheets,
        prompt: example.question.clone(),
        answer: example.answer.clone(),
        expected_output_file: Vec::new(),
        feedback: String::new(),
    })
}

/// Builds the GRP entries for every example, in input order.
pub fn build_grp(examples: &[Example], config: &ForgeConfig) -> Result<Vec<GrpEntry>, ExportError> {
    let entries = examples
        .iter()
        .map(|example| build_entry(example, config))
        .collect::<Result<Vec<_>, _>>()?;

    let with_sheets = entries.iter().filter(|e| !e.spreadsheets.is_empty()).count();
    tracing::info!(
        entries = entries.len(),
        with_spreadsheets = with_sheets,
        "Built GRP entries"
    );
    Ok(entries)
}

/// Writes GRP entries as a pretty-printed JSON array.
pub fn write_grp(entries: &[GrpEntry], path: &Path) -> Result<(), ExportError> {
    write_pretty_json(entries, path)?;
    tracing::info!(path = %path.display(), entries = entries.len(), "Wrote GRP file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> ForgeConfig {
        ForgeConfig {
            xlsx_dir: dir.to_path_buf(),
            ..ForgeConfig::default()
        }
    }

    #[test]
    fn test_entry_fields() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Train_12")).unwrap();
        fs::write(dir.path().join("Train_12/table0.xlsx"), b"x").unwrap();

        let example = Example::from_record(
            0,
            &json!({
                "uid": " 12 ",
                "paragraphs": ["Table 1: Operating income"],
                "qa": {"question": "What is the change?", "answer": 3.5}
            }),
        )
        .unwrap();

        let entry = build_entry(&example, &config_for(dir.path())).unwrap();
        assert_eq!(entry.task_id, "Test 12");
        assert_eq!(entry.title, "Table 1: Operating income");
        assert_eq!(entry.spreadsheets.len(), 1);
        assert!(entry.spreadsheets[0].ends_with("Train_12/table0.xlsx"));
        assert_eq!(entry.prompt, "What is the change?");
        assert_eq!(entry.answer, json!(3.5));
        assert!(entry.expected_output_file.is_empty());
        assert_eq!(entry.feedback, "");
    }

    #[test]
    fn test_entry_key_order() {
        let entry = GrpEntry {
            task_id: "Test 1".to_string(),
            title: "t".to_string(),
            spreadsheets: vec![],
            prompt: "p".to_string(),
            answer: json!("a"),
            expected_output_file: vec![],
            feedback: String::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec![
                "task_id",
                "title",
                "spreadsheets",
                "prompt",
                "answer",
                "expected_output_file",
                "feedback"
            ]
        );
    }

    #[test]
    fn test_missing_uid_entry() {
        let dir = TempDir::new().unwrap();
        let example = Example::from_record(0, &json!({})).unwrap();
        let entry = build_entry(&example, &config_for(dir.path())).unwrap();
        assert_eq!(entry.task_id, "Test ");
        assert_eq!(entry.title, "Task ");
        assert_eq!(entry.answer, json!(""));
    }

    #[test]
    fn test_write_grp_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train_GRP.json");
        let examples = vec![Example::from_record(0, &json!({"uid": "1"})).unwrap()];
        let entries = build_grp(&examples, &config_for(dir.path())).unwrap();

        write_grp(&entries, &path).unwrap();
        let loaded: Vec<GrpEntry> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, entries);
    }
}
