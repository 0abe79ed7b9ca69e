//! Table descriptions carried in paragraph text.
//!
//! Paragraphs contain markers such as `## Table 0 ##`; the paragraphs that
//! follow a marker, up to the next marker, describe that table.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Longest string a worksheet cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

static TABLE_MARKER: OnceLock<Regex> = OnceLock::new();
static INVALID_XL_CHARS: OnceLock<Regex> = OnceLock::new();

fn table_marker() -> &'static Regex {
    TABLE_MARKER.get_or_init(|| {
        Regex::new(r"##\s*Table\s*(\d+)\s*##").expect("Invalid regex for table markers")
    })
}

fn invalid_xl_chars() -> &'static Regex {
    INVALID_XL_CHARS.get_or_init(|| {
        Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f]").expect("Invalid regex for control characters")
    })
}

/// Returns the table index named by the first marker in `paragraph`.
pub fn table_marker_index(paragraph: &str) -> Option<usize> {
    table_marker()
        .captures(paragraph)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Maps each marked table index to its description text.
///
/// Text before the first marker is not attributed to any table. When the
/// same index is marked twice, the later block wins.
pub fn extract_descriptions<S: AsRef<str>>(paragraphs: &[S]) -> BTreeMap<usize, String> {
    let starts: Vec<(usize, usize)> = paragraphs
        .iter()
        .enumerate()
        .filter_map(|(pos, para)| table_marker_index(para.as_ref()).map(|idx| (idx, pos)))
        .collect();

    let mut descriptions = BTreeMap::new();
    for (i, &(table_idx, start_pos)) in starts.iter().enumerate() {
        let end_pos = starts
            .get(i + 1)
            .map_or(paragraphs.len(), |&(_, pos)| pos);
        let text = paragraphs[start_pos + 1..end_pos]
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n");
        descriptions.insert(table_idx, text.trim().to_string());
    }
    descriptions
}

/// Removes control characters a worksheet cell cannot hold and clips the
/// result to [`MAX_CELL_CHARS`].
pub fn sanitize_for_excel(text: &str) -> String {
    let cleaned = invalid_xl_chars().replace_all(text, "");
    match cleaned.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => cleaned[..cut].to_string(),
        None => cleaned.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_variants() {
        assert_eq!(table_marker_index("## Table 0 ##"), Some(0));
        assert_eq!(table_marker_index("##Table12##"), Some(12));
        assert_eq!(table_marker_index("see ## Table 3 ## below"), Some(3));
        assert_eq!(table_marker_index("Table 3"), None);
        assert_eq!(table_marker_index("## Table x ##"), None);
    }

    #[test]
    fn test_descriptions_split_on_markers() {
        let paragraphs = vec![
            "Intro text.",
            "## Table 0 ##",
            "First line.",
            "Second line.",
            "## Table 1 ##",
            "  Only line.  ",
        ];
        let desc = extract_descriptions(&paragraphs);
        assert_eq!(desc.len(), 2);
        assert_eq!(desc[&0], "First line.\nSecond line.");
        assert_eq!(desc[&1], "Only line.");
    }

    #[test]
    fn test_marker_with_no_following_text() {
        let paragraphs = vec!["## Table 0 ##", "## Table 1 ##"];
        let desc = extract_descriptions(&paragraphs);
        assert_eq!(desc[&0], "");
        assert_eq!(desc[&1], "");
    }

    #[test]
    fn test_repeated_index_keeps_last() {
        let paragraphs = vec!["## Table 0 ##", "old", "## Table 0 ##", "new"];
        let desc = extract_descriptions(&paragraphs);
        assert_eq!(desc.len(), 1);
        assert_eq!(desc[&0], "new");
    }

    #[test]
    fn test_no_markers() {
        let paragraphs: Vec<String> = vec!["plain".to_string()];
        assert!(extract_descriptions(&paragraphs).is_empty());
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_excel("a\x00b\x0bc\td\ne\x1f"), "abc\td\ne");
    }

    #[test]
    fn test_sanitize_clips_long_text() {
        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(sanitize_for_excel(&long).chars().count(), MAX_CELL_CHARS);
    }
}
