//! Task extraction from a full day-document.
//!
//! The scanner walks lines top to bottom through a three-state machine.
//! Headers switch state, any other heading returns to [`ScanState::Outside`],
//! and only lines seen inside the task or abandoned section are tried as
//! checklist lines. Anything that does not look like a checklist line is
//! skipped without consuming an index, so hand-edited prose between tasks is
//! harmless.

use crate::document::headers::{is_heading, SectionHeaders};
use crate::document::task::{Task, TaskStatus};

/// Which region of the document the scanner is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Outside,
    InTask,
    InAbandoned,
}

impl ScanState {
    /// State after seeing `line`, or `None` if the line is not a heading and
    /// the state is unchanged.
    pub fn transition(line: &str, headers: &SectionHeaders) -> Option<Self> {
        if headers.is_task(line) {
            Some(Self::InTask)
        } else if headers.is_abandoned(line) {
            Some(Self::InAbandoned)
        } else if is_heading(line) {
            Some(Self::Outside)
        } else {
            None
        }
    }
}

/// Parse every task in the task and abandoned sections, in document order.
///
/// Tasks physically located in the abandoned section are abandoned whatever
/// their checkbox says. Indices are dense, starting at 1.
pub fn parse_tasks(content: &str, headers: &SectionHeaders) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut state = ScanState::Outside;

    for line in content.lines() {
        if let Some(next) = ScanState::transition(line, headers) {
            state = next;
            continue;
        }

        if state == ScanState::Outside {
            continue;
        }

        let Some((status, title)) = parse_checklist_line(line) else {
            continue;
        };

        let status = if state == ScanState::InAbandoned {
            TaskStatus::Abandoned
        } else {
            status
        };

        tasks.push(Task {
            index: tasks.len() + 1,
            title: title.to_string(),
            status,
            raw_line: line.trim_end().to_string(),
        });
    }

    tasks
}

/// Match `-`, optional spaces, `[m]`, then the title.
///
/// Leading and trailing whitespace is ignored and the returned title is
/// trimmed. Returns `None` for anything else.
pub fn parse_checklist_line(line: &str) -> Option<(TaskStatus, &str)> {
    let rest = line.trim().strip_prefix('-')?.trim_start();
    let rest = rest.strip_prefix('[')?;

    let mut chars = rest.chars();
    let status = TaskStatus::from_marker(chars.next()?)?;
    let rest = chars.as_str().strip_prefix(']')?;

    Some((status, rest.trim()))
}
