//! Section header lines recognized inside a day-document.

use serde::{Deserialize, Serialize};

/// Prefix that marks a heading line. Any trimmed line starting with this
/// closes the current section.
pub const HEADING_MARKER: &str = "## ";

/// Default header for the task section.
pub const DEFAULT_TASK_HEADER: &str = "## Task";

/// Default header for the abandoned section.
pub const DEFAULT_ABANDONED_HEADER: &str = "## Abandoned";

/// Default header for the summary section.
pub const DEFAULT_SUMMARY_HEADER: &str = "## Summary";

/// The three exact-match header lines the document model understands.
///
/// Headers are compared against trimmed lines, so `"  ## Task  "` still opens
/// the task section while `"## Tasks"` is an opaque heading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SectionHeaders {
    /// Header introducing pending and done tasks.
    pub task: String,
    /// Header introducing abandoned tasks.
    pub abandoned: String,
    /// Header introducing the daily summary.
    pub summary: String,
}

impl Default for SectionHeaders {
    fn default() -> Self {
        Self {
            task: DEFAULT_TASK_HEADER.to_string(),
            abandoned: DEFAULT_ABANDONED_HEADER.to_string(),
            summary: DEFAULT_SUMMARY_HEADER.to_string(),
        }
    }
}

impl SectionHeaders {
    /// Check that a header value can actually be found by the scanner.
    pub fn is_valid_header(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed == value
            && trimmed.starts_with(HEADING_MARKER)
            && trimmed.len() > HEADING_MARKER.len()
    }

    pub fn is_task(&self, line: &str) -> bool {
        line.trim() == self.task
    }

    pub fn is_abandoned(&self, line: &str) -> bool {
        line.trim() == self.abandoned
    }

    pub fn is_summary(&self, line: &str) -> bool {
        line.trim() == self.summary
    }
}

/// Whether a line is any heading, recognized or opaque.
pub fn is_heading(line: &str) -> bool {
    line.trim().starts_with(HEADING_MARKER)
}
