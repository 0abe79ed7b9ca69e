//! Short human-readable task titles.

/// Picks a title for a task from its paragraphs.
///
/// Blank paragraphs and `##` markers are ignored. The first paragraph that
/// reads like a table caption ("Table ...", but not a table of contents) is
/// used as-is; otherwise the first paragraph is cut to `max_words` words.
/// With no usable paragraph the question is used, then `Task <uid>`.
pub fn derive_title<S: AsRef<str>>(
    paragraphs: &[S],
    question: &str,
    uid: &str,
    max_words: usize,
) -> String {
    let mut first_non_empty: Option<&str> = None;

    for para in paragraphs {
        let text = para.as_ref().trim();
        if text.is_empty() || text.starts_with("##") {
            continue;
        }
        if first_non_empty.is_none() {
            first_non_empty = Some(text);
        }
        let lower = text.to_lowercase();
        if lower.starts_with("table ") && !lower.contains("table of contents") {
            return text.to_string();
        }
    }

    if let Some(text) = first_non_empty {
        return text
            .split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" ");
    }

    if question.is_empty() {
        format!("Task {uid}")
    } else {
        question.to_string()
    }
}
