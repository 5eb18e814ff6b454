//! Task entity: one checklist line of a day-document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task, encoded by the checkbox marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// `- [ ]`
    Pending,
    /// `- [x]`
    Done,
    /// `- [~]`
    Abandoned,
}

impl TaskStatus {
    /// Parse a checkbox marker. `x` and `X` both mean done.
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(Self::Pending),
            'x' | 'X' => Some(Self::Done),
            '~' => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// The canonical checkbox marker.
    pub fn marker(self) -> char {
        match self {
            Self::Pending => ' ',
            Self::Done => 'x',
            Self::Abandoned => '~',
        }
    }

    /// Glyph used by `list` output.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Pending => "○",
            Self::Done => "✓",
            Self::Abandoned => "~",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// A single checklist item.
///
/// `index` is 1-based and assigned by scan order across the task and
/// abandoned sections of one parsed snapshot; it is not a line number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub index: usize,
    pub title: String,
    pub status: TaskStatus,
    /// Source line with trailing whitespace removed. Empty for tasks that
    /// were added by an update rather than parsed.
    #[serde(skip)]
    pub raw_line: String,
}

impl Task {
    /// Create a task. The title is collapsed to one line by [`single_line`].
    pub fn new(index: usize, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            index,
            title: single_line(&title.into()),
            status,
            raw_line: String::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn is_abandoned(&self) -> bool {
        self.status == TaskStatus::Abandoned
    }

    /// Canonical checklist line, e.g. `- [x] email client`.
    pub fn to_line(&self) -> String {
        format!("- [{}] {}", self.status.marker(), self.title)
    }

    /// Numbered listing line, e.g. `2. [✓] email client`.
    pub fn list_line(&self) -> String {
        format!("{}. [{}] {}", self.index, self.status.glyph(), self.title)
    }
}

/// Join the lines of `title` with single spaces and trim it, so a title can
/// never span lines of a day-document.
pub fn single_line(title: &str) -> String {
    title
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
