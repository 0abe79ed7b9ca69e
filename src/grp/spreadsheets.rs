//! Locating the exported workbooks of a record.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::ExportError;

/// Lists the `.xlsx` files directly inside `base_dir/<folder_prefix><uid>`.
///
/// Paths are rendered relative to however `base_dir` was given and sorted.
/// A missing folder yields an empty list.
pub fn gather_spreadsheets(
    base_dir: &Path,
    folder_prefix: &str,
    uid: &str,
) -> Result<Vec<String>, ExportError> {
    let folder = base_dir.join(format!("{folder_prefix}{uid}"));
    if !folder.exists() {
        return Ok(Vec::new());
    }

    let mut sheets = Vec::new();
    for entry in WalkDir::new(&folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ExportError::Scan {
            path: folder.clone(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "xlsx") {
            sheets.push(path.to_string_lossy().into_owned());
        }
    }

    sheets.sort();
    Ok(sheets)
}
