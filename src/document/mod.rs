//! Day-document model.
//!
//! A day-document is plain markdown with three recognized sections (tasks,
//! abandoned tasks, summary) among any number of opaque ones. This module
//! parses tasks out of it, renders them back, and splices sections in place
//! without disturbing the rest of the file.

pub mod editor;
pub mod headers;
pub mod parser;
pub mod serializer;
pub mod task;

pub use editor::{extract_task_section, replace_summary_section, replace_task_section};
pub use headers::{is_heading, SectionHeaders, HEADING_MARKER};
pub use parser::{parse_checklist_line, parse_tasks, ScanState};
pub use serializer::serialize_tasks;
pub use task::{single_line, Task, TaskStatus};

/// Title line placed at the top of a freshly created day file.
pub fn day_title(date: chrono::NaiveDate) -> String {
    format!("# {}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_day_title() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_title(date), "# 2024-01-01");
    }
}
