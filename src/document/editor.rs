//! Targeted section edits inside a full day-document.
//!
//! Day files are hand-edited between runs, so every edit here is
//! line-oriented and header-exact: a recognized section is located by its
//! exact header line and runs until the next heading. Everything outside the
//! touched sections is copied through line for line. Edited documents are
//! always newline-terminated.

use crate::document::headers::{is_heading, SectionHeaders};

/// Replace the task section (and any abandoned section) with `section`.
///
/// `section` is normally the output of
/// [`serialize_tasks`](crate::document::serialize_tasks), which already
/// carries the abandoned block, so every existing abandoned section is
/// dropped. When the document has no task header, `section` is appended at
/// the end. Applying the same replacement twice yields the same document.
pub fn replace_task_section(content: &str, section: &str, headers: &SectionHeaders) -> String {
    splice_section(
        content,
        section,
        |line| headers.is_task(line),
        |line| headers.is_abandoned(line),
    )
}

/// Replace the summary section body with the trimmed `summary`, appending a
/// new summary section at the end if none exists.
pub fn replace_summary_section(content: &str, summary: &str, headers: &SectionHeaders) -> String {
    let block = format!("{}\n\n{}", headers.summary, summary.trim());
    splice_section(content, &block, |line| headers.is_summary(line), |_| false)
}

/// Literal text of the task and abandoned sections, headers included.
///
/// Used as the compact payload sent along with an update instruction.
/// Returns an empty string when neither section exists.
pub fn extract_task_section(content: &str, headers: &SectionHeaders) -> String {
    let mut result = Vec::new();
    let mut in_section = false;

    for line in content.lines() {
        if headers.is_task(line) || headers.is_abandoned(line) {
            in_section = true;
            result.push(line);
        } else if is_heading(line) {
            in_section = false;
        } else if in_section {
            result.push(line);
        }
    }

    result.join("\n")
}

/// Put `block` where the first `is_target` section was, dropping its body,
/// any later `is_target` sections and every `is_dropped` section. Appends
/// `block` if no target header exists.
fn splice_section(
    content: &str,
    block: &str,
    is_target: impl Fn(&str) -> bool,
    is_dropped: impl Fn(&str) -> bool,
) -> String {
    let block = block.trim_end_matches(['\r', '\n']);
    let lines: Vec<&str> = content.lines().collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 2);
    let mut replaced = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let target = is_target(line);

        if !target && !is_dropped(line) {
            out.push(line);
            i += 1;
            continue;
        }

        let end = next_heading(&lines, i + 1);
        if target && !replaced {
            out.push(block);
            // Keep one blank line before the heading that follows.
            if end < lines.len() {
                out.push("");
            }
            replaced = true;
        }
        i = end;
    }

    if !replaced {
        if out.last().is_some_and(|last| !last.trim().is_empty()) {
            out.push("");
        }
        out.push(block);
    }

    let mut result = out.join("\n");
    if !result.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Index of the first heading at or after `from`, or `lines.len()`.
fn next_heading(lines: &[&str], from: usize) -> usize {
    lines[from.min(lines.len())..]
        .iter()
        .position(|line| is_heading(line))
        .map_or(lines.len(), |offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_tasks;
    use crate::document::serializer::serialize_tasks;
    use crate::document::task::{Task, TaskStatus};

    fn headers() -> SectionHeaders {
        SectionHeaders::default()
    }

    const NOTES: &str = "## Notes\nfree-form text\n  - [ ] not a task\n# not a heading\n";

    fn full_document() -> String {
        format!(
            "# 2024-01-01\n\n## Task\n\n- [ ] a\n- [x] b\n\n## Abandoned\n\n- [~] c\n\n{}\n## Summary\n\nold summary\n",
            NOTES
        )
    }

    #[test]
    fn test_replace_task_section_in_place() {
        let doc = "# D\n\n## Task\n\n- [ ] a\n\n## Notes\nkeep me\n";
        let result = replace_task_section(doc, "## Task\n\n- [x] a", &headers());

        assert_eq!(result, "# D\n\n## Task\n\n- [x] a\n\n## Notes\nkeep me\n");
    }

    #[test]
    fn test_replace_task_section_drops_abandoned() {
        let doc = "## Task\n\n- [ ] a\n\n## Abandoned\n\n- [~] b\n\n## Notes\nx\n";
        let section = serialize_tasks(&[Task::new(1, "a", TaskStatus::Done)], &headers());
        let result = replace_task_section(doc, &section, &headers());

        assert_eq!(result, "## Task\n\n- [x] a\n\n## Notes\nx\n");
    }

    #[test]
    fn test_replace_task_section_drops_abandoned_before_task() {
        let doc = "## Abandoned\n- [~] old\n## Task\n- [ ] new\n";
        let tasks = parse_tasks(doc, &headers());
        let result = replace_task_section(doc, &serialize_tasks(&tasks, &headers()), &headers());

        assert_eq!(result, "## Task\n\n- [ ] new\n\n## Abandoned\n\n- [~] old\n");
        assert_eq!(result.matches("## Abandoned").count(), 1);
    }

    #[test]
    fn test_replace_task_section_appends_when_missing() {
        let doc = "# D\n\nsome notes";
        let result = replace_task_section(doc, "## Task\n\n- [ ] a", &headers());

        assert_eq!(result, "# D\n\nsome notes\n\n## Task\n\n- [ ] a\n");
    }

    #[test]
    fn test_append_does_not_double_blank_line() {
        let doc = "# D\n\n";
        let result = replace_task_section(doc, "## Task\n", &headers());

        assert_eq!(result, "# D\n\n## Task\n");
    }

    #[test]
    fn test_trailing_newlines_in_block_leave_one_separator() {
        let doc = "# D\n\n## Task\n\n- [ ] a\n\n## Notes\nkeep\n";

        let once = replace_task_section(doc, "## Task\n\n", &headers());
        let twice = replace_task_section(&once, "## Task\n\n", &headers());

        assert_eq!(once, "# D\n\n## Task\n\n## Notes\nkeep\n");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_append_to_empty_document() {
        assert_eq!(
            replace_task_section("", "## Task\n\n- [ ] a", &headers()),
            "## Task\n\n- [ ] a\n"
        );
    }

    #[test]
    fn test_missing_header_append_is_idempotent() {
        let doc = "# D\n\n## Notes\nremember milk\n";
        let section = "## Task\n\n- [ ] a\n- [x] b";

        let once = replace_task_section(doc, section, &headers());
        let twice = replace_task_section(&once, section, &headers());

        assert_eq!(once, twice);
        assert_eq!(twice.matches("## Task").count(), 1);
    }

    #[test]
    fn test_replace_is_idempotent_with_following_section() {
        let doc = full_document();
        let section = serialize_tasks(&parse_tasks(&doc, &headers()), &headers());

        let once = replace_task_section(&doc, &section, &headers());
        let twice = replace_task_section(&once, &section, &headers());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_duplicate_task_headers_collapse() {
        let doc = "## Task\n- [ ] a\n## Task\n- [ ] b\n";
        let result = replace_task_section(doc, "## Task\n\n- [ ] z", &headers());

        assert_eq!(result, "## Task\n\n- [ ] z\n");
    }

    #[test]
    fn test_task_replace_preserves_opaque_section() {
        let doc = full_document();
        let mut tasks = parse_tasks(&doc, &headers());
        tasks[0].status = TaskStatus::Done;
        tasks.push(Task::new(4, "new", TaskStatus::Pending));

        let result = replace_task_section(&doc, &serialize_tasks(&tasks, &headers()), &headers());

        assert!(result.contains(NOTES));
        assert!(result.starts_with("# 2024-01-01\n\n"));
        assert!(result.ends_with("## Summary\n\nold summary\n"));
    }

    #[test]
    fn test_summary_replace_preserves_opaque_section() {
        let doc = full_document();
        let result = replace_summary_section(&doc, "  new summary \n", &headers());

        assert!(result.contains(NOTES));
        assert!(result.ends_with("## Summary\n\nnew summary\n"));
        assert!(!result.contains("old summary"));
        assert_eq!(parse_tasks(&result, &headers()), parse_tasks(&doc, &headers()));
    }

    #[test]
    fn test_replace_summary_in_middle() {
        let doc = "## Summary\n\nold\n## Notes\nx\n";
        let result = replace_summary_section(doc, "fresh", &headers());

        assert_eq!(result, "## Summary\n\nfresh\n\n## Notes\nx\n");
    }

    #[test]
    fn test_replace_summary_appends_when_missing() {
        let doc = "# D\n\n## Task\n\n- [ ] a\n";
        let result = replace_summary_section(doc, "did things", &headers());

        assert_eq!(result, "# D\n\n## Task\n\n- [ ] a\n\n## Summary\n\ndid things\n");
    }

    #[test]
    fn test_replace_summary_twice_is_stable() {
        let doc = "# D\n\n## Task\n\n- [ ] a\n";
        let once = replace_summary_section(doc, "s", &headers());
        let twice = replace_summary_section(&once, "s", &headers());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_extract_task_section() {
        let doc = full_document();
        assert_eq!(
            extract_task_section(&doc, &headers()),
            "## Task\n\n- [ ] a\n- [x] b\n\n## Abandoned\n\n- [~] c\n"
        );
    }

    #[test]
    fn test_extract_task_section_without_abandoned() {
        let doc = "# D\n## Task\n- [ ] a\n## Notes\nx\n";
        assert_eq!(extract_task_section(doc, &headers()), "## Task\n- [ ] a");
    }

    #[test]
    fn test_extract_task_section_missing() {
        assert_eq!(extract_task_section("# D\n## Notes\nx\n", &headers()), "");
        assert_eq!(extract_task_section("", &headers()), "");
    }
}
